//! Model and constraint declarations loaded from TOML.
//!
//! # Examples
//!
//! ```
//! use fieldcheck::config::ConstraintConfig;
//!
//! let config = ConstraintConfig::from_toml_str(r#"
//!     [model]
//!     name = "Product"
//!     fields = [
//!         { name = "data", type = "json" },
//!         { name = "price", type = "integer" },
//!     ]
//!
//!     [[constraints]]
//!     name = "owner_present"
//!     check = "data__owner__isnull = false"
//!
//!     [[constraints]]
//!     name = "price_positive"
//!     check = "price__gt = 0 or price__isnull = true"
//!     message = "%(name)s: price must be positive"
//! "#).unwrap();
//!
//! let constraints = config.build().unwrap();
//! assert_eq!(constraints.constraints().len(), 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    constraint::{CheckConstraint, DeclarationError, ModelConstraints},
    model::Model,
    parser::{ParseError, parse_constraint},
};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("constraint '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("constraint '{name}': {source}")]
    Declaration {
        name: String,
        #[source]
        source: DeclarationError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One `[[constraints]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConstraintDecl {
    pub name: String,

    /// Condition in constraint syntax
    pub check: String,

    /// Violation message; `%(name)s` is replaced with the constraint name
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConstraintConfig {
    pub model: Model,

    #[serde(default)]
    pub constraints: Vec<ConstraintDecl>,
}

impl ConstraintConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.check_names()?;
        Ok(config)
    }

    fn check_names(&self) -> Result<(), ConfigError> {
        let fields = &self.model.fields;
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ConfigError::Invalid(format!(
                    "field '{}' is declared twice on model '{}'",
                    field.name, self.model.name
                )));
            }
        }

        for (i, decl) in self.constraints.iter().enumerate() {
            if self.constraints[..i].iter().any(|c| c.name == decl.name) {
                return Err(ConfigError::Invalid(format!(
                    "constraint '{}' is declared twice",
                    decl.name
                )));
            }
        }
        Ok(())
    }

    /// Parses and declares every constraint against the model.
    pub fn build(&self) -> Result<ModelConstraints, ConfigError> {
        let mut constraints = ModelConstraints::new(self.model.clone());

        for decl in &self.constraints {
            let condition = parse_constraint(&decl.check).map_err(|source| ConfigError::Parse {
                name: decl.name.clone(),
                source,
            })?;

            let mut constraint = CheckConstraint::declare(&self.model, &decl.name, condition)
                .map_err(|source| ConfigError::Declaration {
                    name: decl.name.clone(),
                    source,
                })?;
            if let Some(message) = &decl.message {
                constraint = constraint.with_message(message);
            }
            constraints.push(constraint);
        }

        info!(
            event = "constraints_loaded",
            model = %self.model.name,
            constraint_count = constraints.constraints().len(),
        );
        Ok(constraints)
    }
}
