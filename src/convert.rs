//! JSON to [`Value`] conversion, and jsonb text rendering

use crate::Value;

/// Convert serde_json::Value to a document Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            // u64 beyond i64::MAX and real floats both land here
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect())
        }
    }
}

/// Text of a document node the way the store prints jsonb.
///
/// Object members are ordered the way jsonb stores them (shorter keys
/// first, then byte order), separators carry a space, and whole floats keep
/// one decimal. The original scale of a number (`2.50`, `1e3`) is not kept.
///
/// ```
/// use fieldcheck::{Value, convert::to_jsonb_text};
/// use std::collections::HashMap;
///
/// let mut obj = HashMap::new();
/// obj.insert("bb".to_string(), Value::Float(1.0));
/// obj.insert("a".to_string(), Value::Array(vec![Value::Null, Value::Integer(2)]));
///
/// assert_eq!(to_jsonb_text(&Value::Object(obj)), r#"{"a": [null, 2], "bb": 1.0}"#);
/// ```
pub fn to_jsonb_text(v: &Value) -> String {
    let mut out = String::new();
    write_jsonb(&mut out, v);
    out
}

fn write_jsonb(out: &mut String, v: &Value) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Float(n) if n.is_finite() && n.fract() == 0.0 => out.push_str(&format!("{n:.1}")),
        Value::Float(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_jsonb_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_jsonb(out, item);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_jsonb_string(out, key);
                out.push_str(": ");
                write_jsonb(out, &obj[key]);
            }
            out.push('}');
        }
    }
}

fn write_jsonb_string(out: &mut String, s: &str) {
    // serde_json escapes the same set of characters as jsonb output
    out.push_str(&serde_json::Value::String(s.to_string()).to_string());
}
