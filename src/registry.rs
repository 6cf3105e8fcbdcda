//! Static lookup registry.
//!
//! Every supported (field type, target, lookup) combination maps to a
//! [`Rule`]: the operand it takes and the pure function that applies it.
//! Declaration consults this table, so a combination missing here is rejected
//! before any record is evaluated.

use std::cmp::Ordering;

use regex::Regex;

use crate::{
    ast::LookupKind,
    evaluator::Truth,
    model::FieldType,
    value::Value,
};

/// What a lookup is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The column value itself
    Column,
    /// A key path inside a JSON column
    KeyPath,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Column => "column",
            Target::KeyPath => "key path",
        }
    }
}

/// The left-hand side of a lookup, as the store sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe<'a> {
    /// SQL NULL: the column is null or absent, or the key path leads nowhere
    Null,
    /// A stored value. On a key path this may be JSON `null`.
    Value(&'a Value),
}

/// Shape of operand a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// `true` or `false`
    Flag,
    /// A single literal of the field's type (any JSON value on key paths)
    Literal,
    /// A list of literals
    List,
    /// A string
    Text,
    /// A string holding a regular expression
    Pattern,
    /// One key name
    Key,
    /// A non-empty list of key names
    Keys,
}

/// Operand after declaration-time checking.
#[derive(Debug, Clone)]
pub enum Operand {
    Flag(bool),
    Literal(Value),
    List(Vec<Value>),
    Text(String),
    Pattern(Regex),
    Keys(Vec<String>),
}

pub type ApplyFn = fn(Probe<'_>, &Operand) -> Truth;

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub lookup: LookupKind,
    pub target: Target,
    pub field_types: &'static [FieldType],
    pub operand: OperandKind,
    pub apply: ApplyFn,
    pub summary: &'static str,
}

const ALL_TYPES: &[FieldType] = &[
    FieldType::Boolean,
    FieldType::Integer,
    FieldType::Float,
    FieldType::Text,
    FieldType::Json,
];
const SCALAR_TYPES: &[FieldType] = &[
    FieldType::Boolean,
    FieldType::Integer,
    FieldType::Float,
    FieldType::Text,
];
const ORDERED_TYPES: &[FieldType] = &[FieldType::Integer, FieldType::Float, FieldType::Text];
const TEXT: &[FieldType] = &[FieldType::Text];
const JSON: &[FieldType] = &[FieldType::Json];

macro_rules! rule {
    ($lookup:ident, $target:ident, $types:expr, $operand:ident, $apply:expr, $summary:literal) => {
        Rule {
            lookup: LookupKind::$lookup,
            target: Target::$target,
            field_types: $types,
            operand: OperandKind::$operand,
            apply: $apply,
            summary: $summary,
        }
    };
}

pub static RULES: &[Rule] = &[
    // Column lookups
    rule!(IsNull, Column, ALL_TYPES, Flag, isnull_column, "column is SQL NULL (a JSON null document is not)"),
    rule!(Exact, Column, ALL_TYPES, Literal, exact, "column equals the literal"),
    rule!(In, Column, SCALAR_TYPES, List, is_in, "column equals one of the literals"),
    rule!(Gt, Column, ORDERED_TYPES, Literal, gt, "column > literal"),
    rule!(Gte, Column, ORDERED_TYPES, Literal, gte, "column >= literal"),
    rule!(Lt, Column, ORDERED_TYPES, Literal, lt, "column < literal"),
    rule!(Lte, Column, ORDERED_TYPES, Literal, lte, "column <= literal"),
    rule!(Contains, Column, TEXT, Text, contains, "text contains the substring"),
    rule!(StartsWith, Column, TEXT, Text, starts_with, "text starts with the prefix"),
    rule!(EndsWith, Column, TEXT, Text, ends_with, "text ends with the suffix"),
    rule!(Regex, Column, TEXT, Pattern, regex, "text matches the regular expression"),
    rule!(Contains, Column, JSON, Literal, json_contains, "document contains the literal (jsonb @>)"),
    rule!(HasKey, Column, JSON, Key, has_any_keys, "document is an object with the key"),
    rule!(HasKeys, Column, JSON, Keys, has_keys, "document is an object with every key"),
    rule!(HasAnyKeys, Column, JSON, Keys, has_any_keys, "document is an object with at least one key"),
    // Key path lookups
    rule!(IsNull, KeyPath, JSON, Flag, isnull_key, "key is missing or holds JSON null"),
    rule!(Exact, KeyPath, JSON, Literal, exact, "key holds the literal (null matches JSON null)"),
    rule!(In, KeyPath, JSON, List, is_in, "key holds one of the literals"),
    rule!(Gt, KeyPath, JSON, Literal, gt_key, "key value > literal in jsonb order"),
    rule!(Gte, KeyPath, JSON, Literal, gte_key, "key value >= literal in jsonb order"),
    rule!(Lt, KeyPath, JSON, Literal, lt_key, "key value < literal in jsonb order"),
    rule!(Lte, KeyPath, JSON, Literal, lte_key, "key value <= literal in jsonb order"),
    rule!(Contains, KeyPath, JSON, Literal, json_contains, "key value contains the literal (jsonb @>)"),
    rule!(StartsWith, KeyPath, JSON, Text, starts_with, "extracted text starts with the prefix"),
    rule!(EndsWith, KeyPath, JSON, Text, ends_with, "extracted text ends with the suffix"),
    rule!(Regex, KeyPath, JSON, Pattern, regex, "extracted text matches the regular expression"),
    rule!(HasKey, KeyPath, JSON, Key, has_any_keys, "key value is an object with the key"),
    rule!(HasKeys, KeyPath, JSON, Keys, has_keys, "key value is an object with every key"),
    rule!(HasAnyKeys, KeyPath, JSON, Keys, has_any_keys, "key value is an object with at least one key"),
];

/// Finds the rule for a combination, if the combination is supported.
pub fn resolve(field_type: FieldType, target: Target, lookup: LookupKind) -> Option<&'static Rule> {
    RULES.iter().find(|rule| {
        rule.lookup == lookup && rule.target == target && rule.field_types.contains(&field_type)
    })
}

fn isnull_column(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Flag(expected) = operand else {
        return Truth::Unknown;
    };
    Truth::from(matches!(probe, Probe::Null) == *expected)
}

fn isnull_key(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Flag(expected) = operand else {
        return Truth::Unknown;
    };
    // Missing key, null document and JSON null all extract to SQL NULL
    let is_null = matches!(probe, Probe::Null | Probe::Value(Value::Null));
    Truth::from(is_null == *expected)
}

fn exact(probe: Probe<'_>, operand: &Operand) -> Truth {
    match (probe, operand) {
        (Probe::Value(actual), Operand::Literal(expected)) => Truth::from(json_eq(actual, expected)),
        _ => Truth::Unknown,
    }
}

fn is_in(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::List(items) = operand else {
        return Truth::Unknown;
    };
    if items.is_empty() {
        return Truth::False;
    }
    match probe {
        Probe::Null => Truth::Unknown,
        Probe::Value(actual) => Truth::from(items.iter().any(|item| json_eq(actual, item))),
    }
}

fn compare(probe: Probe<'_>, operand: &Operand, accept: fn(Ordering) -> bool) -> Truth {
    match (probe, operand) {
        (Probe::Value(actual), Operand::Literal(expected)) => {
            Truth::from(compare_values(actual, expected).is_some_and(accept))
        }
        _ => Truth::Unknown,
    }
}

fn gt(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare(probe, operand, Ordering::is_gt)
}

fn gte(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare(probe, operand, Ordering::is_ge)
}

fn lt(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare(probe, operand, Ordering::is_lt)
}

fn lte(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare(probe, operand, Ordering::is_le)
}

// `->` comparisons: every pair of JSON values is ordered
fn compare_key(probe: Probe<'_>, operand: &Operand, accept: fn(Ordering) -> bool) -> Truth {
    match (probe, operand) {
        (Probe::Value(actual), Operand::Literal(expected)) => {
            Truth::from(accept(jsonb_cmp(actual, expected)))
        }
        _ => Truth::Unknown,
    }
}

fn gt_key(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare_key(probe, operand, Ordering::is_gt)
}

fn gte_key(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare_key(probe, operand, Ordering::is_ge)
}

fn lt_key(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare_key(probe, operand, Ordering::is_lt)
}

fn lte_key(probe: Probe<'_>, operand: &Operand) -> Truth {
    compare_key(probe, operand, Ordering::is_le)
}

fn json_contains(probe: Probe<'_>, operand: &Operand) -> Truth {
    match (probe, operand) {
        (Probe::Value(actual), Operand::Literal(expected)) => {
            Truth::from(jsonb_contains(actual, expected))
        }
        _ => Truth::Unknown,
    }
}

fn text_match(probe: Probe<'_>, matches: impl FnOnce(&str) -> bool) -> Truth {
    match probe {
        Probe::Value(v) => v
            .extract_text()
            .map_or(Truth::Unknown, |text| Truth::from(matches(&text))),
        Probe::Null => Truth::Unknown,
    }
}

fn contains(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Text(needle) = operand else {
        return Truth::Unknown;
    };
    text_match(probe, |text| text.contains(needle.as_str()))
}

fn starts_with(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Text(prefix) = operand else {
        return Truth::Unknown;
    };
    text_match(probe, |text| text.starts_with(prefix.as_str()))
}

fn ends_with(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Text(suffix) = operand else {
        return Truth::Unknown;
    };
    text_match(probe, |text| text.ends_with(suffix.as_str()))
}

fn regex(probe: Probe<'_>, operand: &Operand) -> Truth {
    let Operand::Pattern(pattern) = operand else {
        return Truth::Unknown;
    };
    text_match(probe, |text| pattern.is_match(text))
}

fn key_check(probe: Probe<'_>, operand: &Operand, all: bool) -> Truth {
    let Operand::Keys(keys) = operand else {
        return Truth::Unknown;
    };
    match probe {
        Probe::Null => Truth::Unknown,
        Probe::Value(Value::Object(obj)) => {
            let found = |key: &String| obj.contains_key(key);
            Truth::from(if all {
                keys.iter().all(found)
            } else {
                keys.iter().any(found)
            })
        }
        Probe::Value(_) => Truth::False,
    }
}

fn has_keys(probe: Probe<'_>, operand: &Operand) -> Truth {
    key_check(probe, operand, true)
}

fn has_any_keys(probe: Probe<'_>, operand: &Operand) -> Truth {
    key_check(probe, operand, false)
}

/// JSON equality: numbers compare by value across integer and float.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            compare_numbers(a, b) == Some(Ordering::Equal)
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| json_eq(l, r)))
        }
        _ => a == b,
    }
}

/// Ordering between two values of the same JSON type.
///
/// Values of different types are unordered; key paths use [`jsonb_cmp`].
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            compare_numbers(a, b)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order of jsonb values.
///
/// Types rank `null < string < number < boolean < array < object`. Arrays
/// and objects compare by size first, then member by member (object members
/// in jsonb storage order). An empty array sorts below everything, null
/// included. Strings compare byte-wise.
pub fn jsonb_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) if x.is_empty() || y.is_empty() => {
            x.len().cmp(&y.len())
        }
        (Value::Array(x), _) if x.is_empty() => Ordering::Less,
        (_, Value::Array(y)) if y.is_empty() => Ordering::Greater,
        _ => jsonb_order(a, b),
    }
}

fn jsonb_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            compare_numbers(a, b).unwrap_or(Ordering::Equal)
        }
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y)
                .map(|(l, r)| jsonb_order(l, r))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()).then_with(|| {
            let (xk, yk) = (storage_order(x.keys()), storage_order(y.keys()));
            xk.iter()
                .zip(&yk)
                .map(|(kx, ky)| kx.cmp(ky).then_with(|| jsonb_order(&x[*kx], &y[*ky])))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        _ => jsonb_rank(a).cmp(&jsonb_rank(b)),
    }
}

fn jsonb_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Integer(_) | Value::Float(_) => 2,
        Value::Boolean(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn storage_order<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
    let mut keys: Vec<_> = keys.collect();
    keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    keys
}

/// jsonb containment (`@>`).
///
/// Objects contain objects whose members they contain, arrays contain
/// arrays whose elements each match one of theirs, and scalars contain only
/// equal scalars. A top-level array also contains a bare scalar it holds.
pub fn jsonb_contains(container: &Value, contained: &Value) -> bool {
    match (container, contained) {
        (Value::Array(items), scalar) if !matches!(scalar, Value::Array(_) | Value::Object(_)) => {
            items.iter().any(|item| json_eq(item, scalar))
        }
        _ => contains_nested(container, contained),
    }
}

fn contains_nested(container: &Value, contained: &Value) -> bool {
    match (container, contained) {
        (Value::Object(outer), Value::Object(inner)) => inner.iter().all(|(key, value)| {
            outer
                .get(key)
                .is_some_and(|found| contains_nested(found, value))
        }),
        (Value::Array(outer), Value::Array(inner)) => inner
            .iter()
            .all(|value| outer.iter().any(|found| contains_nested(found, value))),
        _ => json_eq(container, contained),
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.as_decimal(), b.as_decimal()) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_float()?.partial_cmp(&b.as_float()?),
    }
}
