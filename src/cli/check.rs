//! Validate JSON records against declared check constraints

use serde::Serialize;

use super::CliError;
use crate::{
    CheckConstraint, ConstraintConfig, FieldType, Model, Record, Violation, parse_constraint,
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Path to the TOML model and constraint declarations
    pub config: String,
    /// JSON record
    pub input: Option<String>,
    /// Fields whose constraints are skipped
    pub exclude: Vec<String>,
}

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

/// Validate a record against every constraint in a config file
pub fn execute_check(options: &CheckOptions) -> Result<CheckReport, CliError> {
    let constraints = ConstraintConfig::load(&options.config)?.build()?;

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str)?;
    let record = Record::from_json(constraints.model(), json)?;

    let exclude: Vec<&str> = options.exclude.iter().map(String::as_str).collect();
    let violations = match constraints.validate(&record, &exclude) {
        Ok(()) => Vec::new(),
        Err(e) => e.violations,
    };

    Ok(CheckReport {
        valid: violations.is_empty(),
        violations,
    })
}

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Field declarations as `name:type`
    pub fields: Vec<String>,
    /// Constraint text
    pub constraint: String,
    /// JSON record
    pub input: Option<String>,
    /// Only declare the constraint, don't evaluate it
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalResult {
    /// The constraint parsed and type-checked
    Declared,
    /// Verdict for the record
    Verdict(bool),
}

/// Parse a `name:type` field declaration
pub fn parse_field_spec(spec: &str) -> Result<(String, FieldType), CliError> {
    let (name, ty) = spec
        .split_once(':')
        .ok_or_else(|| CliError::FieldSpec(spec.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::FieldSpec(spec.to_string()));
    }
    let field_type = ty
        .trim()
        .parse::<FieldType>()
        .map_err(|_| CliError::FieldSpec(spec.to_string()))?;
    Ok((name.to_string(), field_type))
}

/// Declare an ad-hoc constraint and evaluate it against one record
pub fn execute_eval(options: &EvalOptions) -> Result<EvalResult, CliError> {
    let model = options
        .fields
        .iter()
        .map(|spec| parse_field_spec(spec))
        .try_fold(Model::new("cli"), |model, field| {
            field.map(|(name, ty)| model.with_field(name, ty))
        })?;

    let condition = parse_constraint(&options.constraint)?;
    let constraint = CheckConstraint::declare(&model, "cli", condition)?;

    if options.syntax_only {
        return Ok(EvalResult::Declared);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str)?;
    let record = Record::from_json(&model, json)?;

    Ok(EvalResult::Verdict(constraint.check(&record)))
}
