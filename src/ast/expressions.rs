use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
};

use crate::{
    ast::{KeyPath, KeySegment, LookupKind},
    value::Value,
};

/// Unbound constraint expression.
///
/// Built by the parser or the [`F`] builder, then bound to a model with
/// [`crate::CheckConstraint::declare`], which type-checks every leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A single lookup predicate
    ///
    /// # Example
    /// ```text
    /// data__key__isnull = true
    /// ```
    Lookup(LookupExpr),

    /// All children hold (`and`, `&`)
    And(Vec<Expr>),

    /// At least one child holds (`or`, `|`)
    Or(Vec<Expr>),

    /// Negation (`not`, `~`, `!`)
    Not(Box<Expr>),
}

/// Lookup leaf: `field[__key...]__lookup = operand`
#[derive(Debug, Clone, PartialEq)]
pub struct LookupExpr {
    pub field: String,

    /// Key path into the field's document; empty for the column itself
    pub path: KeyPath,

    pub lookup: LookupKind,

    /// Right-hand side literal
    pub operand: Value,
}

impl Expr {
    pub fn and(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Or(children.into_iter().collect())
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Every lookup leaf, depth first
    pub fn lookups(&self) -> Vec<&LookupExpr> {
        let mut out = Vec::new();
        self.collect_lookups(&mut out);
        out
    }

    fn collect_lookups<'a>(&'a self, out: &mut Vec<&'a LookupExpr>) {
        match self {
            Expr::Lookup(lookup) => out.push(lookup),
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.collect_lookups(out);
                }
            }
            Expr::Not(inner) => inner.collect_lookups(out),
        }
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        match self {
            Expr::And(mut children) => {
                children.push(rhs);
                Expr::And(children)
            }
            lhs => Expr::And(vec![lhs, rhs]),
        }
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        match self {
            Expr::Or(mut children) => {
                children.push(rhs);
                Expr::Or(children)
            }
            lhs => Expr::Or(vec![lhs, rhs]),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.negate()
    }
}

/// Builder for lookup leaves.
///
/// ```
/// use fieldcheck::ast::{Expr, F, LookupKind};
///
/// let expr = F::new("data").key("tags").index(0).isnull(true);
/// let Expr::Lookup(leaf) = &expr else { unreachable!() };
/// assert_eq!(leaf.lookup, LookupKind::IsNull);
/// assert_eq!(leaf.path.to_string(), "__tags__0");
/// ```
#[derive(Debug, Clone)]
pub struct F {
    field: String,
    path: KeyPath,
}

impl F {
    pub fn new(field: impl Into<String>) -> Self {
        F {
            field: field.into(),
            path: KeyPath::default(),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.path.push(KeySegment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.path.push(KeySegment::Index(index));
        self
    }

    pub fn lookup(self, lookup: LookupKind, operand: impl Into<Value>) -> Expr {
        Expr::Lookup(LookupExpr {
            field: self.field,
            path: self.path,
            lookup,
            operand: operand.into(),
        })
    }

    pub fn isnull(self, flag: bool) -> Expr {
        self.lookup(LookupKind::IsNull, flag)
    }

    pub fn exact(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Exact, operand)
    }

    pub fn is_in(self, operands: impl IntoIterator<Item = Value>) -> Expr {
        self.lookup(LookupKind::In, Value::Array(operands.into_iter().collect()))
    }

    pub fn gt(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Gt, operand)
    }

    pub fn gte(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Gte, operand)
    }

    pub fn lt(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Lt, operand)
    }

    pub fn lte(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Lte, operand)
    }

    pub fn contains(self, operand: impl Into<Value>) -> Expr {
        self.lookup(LookupKind::Contains, operand)
    }

    pub fn has_key(self, key: impl Into<String>) -> Expr {
        self.lookup(LookupKind::HasKey, Value::String(key.into()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lookup(lookup) => write!(f, "{lookup}"),
            Expr::And(children) => write_joined(f, children, " and "),
            Expr::Or(children) => write_joined(f, children, " or "),
            Expr::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for LookupExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}__{} = ", self.field, self.path, self.lookup)?;
        write_literal(f, &self.operand)
    }
}

/// Writes a value in the literal syntax the parser accepts
pub(crate) fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Boolean(b) => write!(f, "{b}"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.1}"),
        Value::Float(n) => write!(f, "{n}"),
        Value::String(s) => write!(f, "{s:?}"),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_literal(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(obj) => {
            let mut keys: Vec<_> = obj.keys().collect();
            keys.sort();
            f.write_str("{")?;
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                write_literal(f, &obj[key])?;
            }
            f.write_str("}")
        }
    }
}
