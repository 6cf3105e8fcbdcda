//! Typed field declarations and the candidate records checked against them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    convert::json_to_value,
    value::{FieldValue, Value},
};

/// Storage type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Integer,
    Float,
    Text,
    /// JSON-valued column holding an arbitrary document
    Json,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Json => "json",
        }
    }

    /// Whether `value` can be stored in a column of this type.
    ///
    /// Integers are accepted by float columns; JSON columns take anything.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Json, _) => true,
            (FieldType::Boolean, Value::Boolean(_)) => true,
            (FieldType::Integer, Value::Integer(_)) => true,
            (FieldType::Float, Value::Integer(_) | Value::Float(_)) => true,
            (FieldType::Text, Value::String(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "integer" | "int" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "text" | "string" => Ok(FieldType::Text),
            "json" => Ok(FieldType::Json),
            other => Err(format!("unknown field type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// A named set of typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Model {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            field_type,
        });
        self
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
    }
}

/// Errors raised while building a record from JSON input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    #[error("field '{field}' is {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },
}

/// One not-yet-persisted row: field name to value, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

const ABSENT: FieldValue = FieldValue::Absent;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing an earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    /// Value of a field; fields never set are [`FieldValue::Absent`].
    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map_or(&ABSENT, |(_, v)| v)
    }

    /// Builds a record from a JSON object, typed by `model`.
    ///
    /// `null` is SQL NULL for every field type, JSON fields included.
    /// Declared fields missing from the object stay absent.
    ///
    /// ```
    /// use fieldcheck::{FieldType, FieldValue, Model, Record};
    /// use serde_json::json;
    ///
    /// let model = Model::new("Item").with_field("data", FieldType::Json);
    /// let record = Record::from_json(&model, json!({"data": null})).unwrap();
    /// assert_eq!(record.get("data"), &FieldValue::Null);
    /// ```
    pub fn from_json(model: &Model, json: serde_json::Value) -> Result<Self, RecordError> {
        let serde_json::Value::Object(obj) = json else {
            return Err(RecordError::NotAnObject(json_to_value(json).type_name()));
        };

        let mut record = Record::new();
        for (name, raw) in obj {
            let Some(field_type) = model.field_type(&name) else {
                return Err(RecordError::UnknownField {
                    model: model.name.clone(),
                    field: name,
                });
            };

            let value = match json_to_value(raw) {
                Value::Null => FieldValue::Null,
                v if field_type == FieldType::Json => FieldValue::Document(v),
                v if field_type.accepts(&v) => FieldValue::Scalar(v),
                v => {
                    return Err(RecordError::TypeMismatch {
                        field: name,
                        expected: field_type,
                        found: v.type_name(),
                    });
                }
            };
            record.set(name, value);
        }
        Ok(record)
    }
}
