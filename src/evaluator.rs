use crate::{
    ast::{KeyPath, LookupKind},
    model::{FieldType, Record},
    registry::{ApplyFn, Operand, Probe},
    value::FieldValue,
};

/// SQL truth value.
///
/// `Unknown` only arises from comparison lookups meeting SQL NULL; `isnull`
/// always resolves to `True` or `False`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    pub fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// A CHECK constraint rejects a row only when its condition is false.
    pub fn is_satisfied(self) -> bool {
        self != Truth::False
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }
}

/// A lookup leaf resolved against a model.
#[derive(Debug, Clone)]
pub struct BoundLookup {
    pub field: String,
    pub field_type: FieldType,
    pub path: KeyPath,
    pub lookup: LookupKind,
    pub operand: Operand,
    pub(crate) apply: ApplyFn,
}

impl BoundLookup {
    fn probe<'a>(&self, record: &'a Record) -> Probe<'a> {
        let value = record.get(&self.field);
        if self.path.is_empty() {
            return match value {
                FieldValue::Absent | FieldValue::Null => Probe::Null,
                FieldValue::Scalar(v) | FieldValue::Document(v) => Probe::Value(v),
            };
        }

        // Walking into a null column or a scalar finds no key
        match value {
            FieldValue::Document(document) => {
                self.path.resolve(document).map_or(Probe::Null, Probe::Value)
            }
            _ => Probe::Null,
        }
    }

    pub fn eval(&self, record: &Record) -> Truth {
        (self.apply)(self.probe(record), &self.operand)
    }
}

/// Expression tree whose leaves have been type-checked.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone)]
pub enum BoundExpr {
    Lookup(BoundLookup),
    And(Vec<BoundExpr>),
    Or(Vec<BoundExpr>),
    Not(Box<BoundExpr>),
}

impl BoundExpr {
    /// SQL truth value of the condition for `record`.
    pub fn eval(&self, record: &Record) -> Truth {
        match self {
            BoundExpr::Lookup(lookup) => lookup.eval(record),
            BoundExpr::And(children) => children
                .iter()
                .fold(Truth::True, |acc, child| acc.and(child.eval(record))),
            BoundExpr::Or(children) => children
                .iter()
                .fold(Truth::False, |acc, child| acc.or(child.eval(record))),
            BoundExpr::Not(inner) => inner.eval(record).not(),
        }
    }

    /// Fields the expression reads
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            BoundExpr::Lookup(lookup) => {
                if !out.contains(&lookup.field.as_str()) {
                    out.push(&lookup.field);
                }
            }
            BoundExpr::And(children) | BoundExpr::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            BoundExpr::Not(inner) => inner.collect_fields(out),
        }
    }
}

/// Whether `record` satisfies `expr`, exactly as a store-enforced CHECK
/// would decide for the same row.
///
/// Total and pure: the same inputs always give the same verdict.
pub fn evaluate(record: &Record, expr: &BoundExpr) -> bool {
    expr.eval(record).is_satisfied()
}
