//! Check constraints declared on a model, and validation of records against
//! them.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Expr, LookupExpr, LookupKind},
    evaluator::{BoundExpr, BoundLookup},
    model::{FieldType, Model, Record},
    registry::{self, Operand, OperandKind, Target},
    value::Value,
};

pub const DEFAULT_VIOLATION_MESSAGE: &str = "Constraint “%(name)s” is violated.";

/// Errors raised while declaring a constraint.
#[derive(Debug, Clone, Error)]
pub enum DeclarationError {
    #[error("model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    #[error("field '{field}' is {field_type}; key paths need a json field")]
    KeyPathOnScalar { field: String, field_type: FieldType },

    #[error("lookup '{lookup}' is not supported on a {target} of a {field_type} field ('{field}')")]
    UnsupportedLookup {
        field: String,
        field_type: FieldType,
        target: &'static str,
        lookup: LookupKind,
    },

    #[error("lookup '{field}__{lookup}' expects {expected}, found {found}")]
    InvalidOperand {
        field: String,
        lookup: LookupKind,
        expected: String,
        found: &'static str,
    },

    #[error("invalid regular expression for '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("constraint name must not be empty")]
    EmptyName,
}

/// A named condition every row of a model must satisfy.
///
/// Declaring binds the condition to the model: fields are resolved, lookups
/// are checked against the registry and operands are typed. Checking a
/// record afterwards cannot fail.
///
/// ```
/// use fieldcheck::{ast::F, CheckConstraint, FieldType, FieldValue, Model, Record};
///
/// let model = Model::new("Item").with_field("data", FieldType::Json);
/// let constraint =
///     CheckConstraint::declare(&model, "no_key", F::new("data").key("key").isnull(true)).unwrap();
///
/// let record = Record::new().with("data", FieldValue::Null);
/// assert!(constraint.check(&record));
/// ```
#[derive(Debug, Clone)]
pub struct CheckConstraint {
    name: String,
    condition: Expr,
    bound: BoundExpr,
    violation_error_message: Option<String>,
}

impl CheckConstraint {
    pub fn declare(
        model: &Model,
        name: impl Into<String>,
        condition: Expr,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DeclarationError::EmptyName);
        }

        let bound = bind(model, &condition)?;
        debug!(model = %model.name, constraint = %name, condition = %condition, "declared check constraint");

        Ok(CheckConstraint {
            name,
            condition,
            bound,
            violation_error_message: None,
        })
    }

    /// Replaces the default violation message. `%(name)s` is substituted
    /// with the constraint name.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.violation_error_message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn bound(&self) -> &BoundExpr {
        &self.bound
    }

    /// Fields the condition reads
    pub fn referenced_fields(&self) -> Vec<&str> {
        self.bound.fields()
    }

    pub fn violation_message(&self) -> String {
        self.violation_error_message
            .as_deref()
            .unwrap_or(DEFAULT_VIOLATION_MESSAGE)
            .replace("%(name)s", &self.name)
    }

    /// Whether `record` satisfies the constraint.
    pub fn check(&self, record: &Record) -> bool {
        let truth = self.bound.eval(record);
        trace!(constraint = %self.name, ?truth, "evaluated check constraint");
        truth.is_satisfied()
    }

    /// Checks `record` unless the condition reads one of `exclude`.
    pub fn validate(&self, record: &Record, exclude: &[&str]) -> Result<(), Violation> {
        if self
            .referenced_fields()
            .iter()
            .any(|field| exclude.contains(field))
        {
            trace!(constraint = %self.name, "skipped: references an excluded field");
            return Ok(());
        }

        if self.check(record) {
            Ok(())
        } else {
            debug!(constraint = %self.name, "check constraint violated");
            Err(Violation {
                constraint: self.name.clone(),
                message: self.violation_message(),
            })
        }
    }
}

impl fmt::Display for CheckConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<CheckConstraint: condition={} name='{}'>", self.condition, self.name)
    }
}

/// A failed constraint, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} check constraint(s) violated: {}", .violations.len(), messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A model together with all of its declared check constraints.
#[derive(Debug, Clone)]
pub struct ModelConstraints {
    model: Model,
    constraints: Vec<CheckConstraint>,
}

impl ModelConstraints {
    pub fn new(model: Model) -> Self {
        ModelConstraints {
            model,
            constraints: Vec::new(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn constraints(&self) -> &[CheckConstraint] {
        &self.constraints
    }

    /// Declares a constraint against this model and keeps it.
    pub fn add(&mut self, name: impl Into<String>, condition: Expr) -> Result<(), DeclarationError> {
        let constraint = CheckConstraint::declare(&self.model, name, condition)?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Keeps a constraint that was declared against the same model.
    pub fn push(&mut self, constraint: CheckConstraint) {
        self.constraints.push(constraint);
    }

    /// Runs every constraint and reports all violations together.
    pub fn validate(&self, record: &Record, exclude: &[&str]) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = self
            .constraints
            .iter()
            .filter_map(|c| c.validate(record, exclude).err())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn bind(model: &Model, expr: &Expr) -> Result<BoundExpr, DeclarationError> {
    Ok(match expr {
        Expr::Lookup(lookup) => BoundExpr::Lookup(bind_lookup(model, lookup)?),
        Expr::And(children) => BoundExpr::And(bind_all(model, children)?),
        Expr::Or(children) => BoundExpr::Or(bind_all(model, children)?),
        Expr::Not(inner) => BoundExpr::Not(Box::new(bind(model, inner)?)),
    })
}

fn bind_all(model: &Model, children: &[Expr]) -> Result<Vec<BoundExpr>, DeclarationError> {
    children.iter().map(|child| bind(model, child)).collect()
}

fn bind_lookup(model: &Model, expr: &LookupExpr) -> Result<BoundLookup, DeclarationError> {
    let field = &expr.field;
    let field_type = model
        .field_type(field)
        .ok_or_else(|| DeclarationError::UnknownField {
            model: model.name.clone(),
            field: field.clone(),
        })?;

    let target = if expr.path.is_empty() {
        Target::Column
    } else if field_type == FieldType::Json {
        Target::KeyPath
    } else {
        return Err(DeclarationError::KeyPathOnScalar {
            field: field.clone(),
            field_type,
        });
    };

    // `field = null` on a column means `field__isnull = true`
    let (lookup, operand) = match (expr.lookup, target, &expr.operand) {
        (LookupKind::Exact, Target::Column, Value::Null) => (LookupKind::IsNull, Value::Boolean(true)),
        (lookup, _, operand) => (lookup, operand.clone()),
    };

    let rule = registry::resolve(field_type, target, lookup).ok_or_else(|| {
        DeclarationError::UnsupportedLookup {
            field: field.clone(),
            field_type,
            target: target.name(),
            lookup,
        }
    })?;

    let operand = bind_operand(field, field_type, target, lookup, rule.operand, operand)?;

    Ok(BoundLookup {
        field: field.clone(),
        field_type,
        path: expr.path.clone(),
        lookup,
        operand,
        apply: rule.apply,
    })
}

fn bind_operand(
    field: &str,
    field_type: FieldType,
    target: Target,
    lookup: LookupKind,
    kind: OperandKind,
    operand: Value,
) -> Result<Operand, DeclarationError> {
    let invalid = |expected: String, found: &Value| DeclarationError::InvalidOperand {
        field: field.to_string(),
        lookup,
        expected,
        found: found.type_name(),
    };

    // Literal checks differ between typed columns and documents
    let literal_ok = |v: &Value| match target {
        Target::Column => field_type.accepts(v),
        Target::KeyPath => match lookup {
            LookupKind::Exact | LookupKind::In | LookupKind::Contains => true,
            _ => v.is_scalar(),
        },
    };
    let literal_expected = || match target {
        Target::Column => format!("a {field_type} literal"),
        Target::KeyPath => "a non-null scalar literal".to_string(),
    };

    match (kind, operand) {
        (OperandKind::Flag, Value::Boolean(b)) => Ok(Operand::Flag(b)),
        (OperandKind::Literal, v) if literal_ok(&v) => Ok(Operand::Literal(v)),
        (OperandKind::Literal, v) => Err(invalid(literal_expected(), &v)),
        (OperandKind::List, Value::Array(items)) => {
            let mut kept = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    // SQL NULL never matches IN; JSON null does on a key path
                    Value::Null if target == Target::Column => {}
                    v if literal_ok(&v) => kept.push(v),
                    v => return Err(invalid(literal_expected(), &v)),
                }
            }
            Ok(Operand::List(kept))
        }
        (OperandKind::Text, Value::String(s)) => Ok(Operand::Text(s)),
        (OperandKind::Pattern, Value::String(s)) => Regex::new(&s)
            .map(Operand::Pattern)
            .map_err(|source| DeclarationError::InvalidPattern {
                field: field.to_string(),
                source,
            }),
        (OperandKind::Key, Value::String(s)) => Ok(Operand::Keys(vec![s])),
        (OperandKind::Keys, Value::Array(items)) if !items.is_empty() => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(invalid("a list of key names".to_string(), &other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Operand::Keys),
        (kind, v) => Err(invalid(expected_for(kind).to_string(), &v)),
    }
}

fn expected_for(kind: OperandKind) -> &'static str {
    match kind {
        OperandKind::Flag => "true or false",
        OperandKind::Literal => "a literal",
        OperandKind::List => "a list",
        OperandKind::Text | OperandKind::Pattern | OperandKind::Key => "a string",
        OperandKind::Keys => "a non-empty list of key names",
    }
}
