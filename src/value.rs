use std::collections::HashMap;

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// A JSON value stored inside a semi-structured column, or carried as a
/// literal operand of a lookup.
///
/// Integers and floats are kept apart so that literals round-trip the way
/// they were written, but every comparison treats them as one numeric type.
///
/// # Examples
///
/// ```
/// use fieldcheck::Value;
/// use std::collections::HashMap;
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let document = Value::Object(obj);
///
/// assert!(document.get_key("key").is_some());
/// assert!(document.get_key("other").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Null | Value::Array(_) | Value::Object(_))
    }

    /// Object member access. Arrays and scalars have no keys.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Array element access. Objects are never indexed by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Exact decimal form of a number, if this is one.
    ///
    /// Floats that have no decimal representation (NaN, infinities) yield
    /// `None` and fall back to `f64` ordering in the comparison code.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Float(n) => Decimal::from_f64(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Text extraction of a document node, as a `->>` operator renders it.
    ///
    /// JSON null has no text (it extracts to SQL NULL). Strings are returned
    /// unquoted, everything else as jsonb text.
    pub fn extract_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(crate::convert::to_jsonb_text(other)),
        }
    }

    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// The value a candidate record holds for one field.
///
/// `Absent` and `Null` are kept apart in the record even though the store
/// sees both as SQL NULL: absent means the caller never set the field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// The record carries no value for the field
    #[default]
    Absent,

    /// Explicit SQL NULL
    Null,

    /// Value of a boolean, integer, float or text column
    Scalar(Value),

    /// Content of a JSON column. `Document(Value::Null)` is the JSON literal
    /// `null`, which is not SQL NULL.
    Document(Value),
}

impl FieldValue {
    /// True when the store would see SQL NULL in this column
    pub fn is_sql_null(&self) -> bool {
        matches!(self, FieldValue::Absent | FieldValue::Null)
    }
}
