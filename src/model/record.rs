//! User records as returned by the collection endpoint

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder shown for a field a record does not carry
pub const MISSING_VALUE: &str = "-";

/// A single field value, either a number or free text.
///
/// Serialized untagged so that the wire format is a plain JSON number or
/// string. Email addresses are text. Anything else the server stores
/// (null, booleans, nested data) is kept as-is in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// True for text that is empty after trimming, and for null.
    /// Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Other(value) => value.is_null(),
        }
    }

    /// Finite numeric view of the value, parsing text when needed.
    /// "inf" and "NaN" parse as `f64` but are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Other(_) => None,
        };
        n.filter(|n| n.is_finite())
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Other(serde_json::Value::Null) => f.write_str(MISSING_VALUE),
            FieldValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Identifier assigned by the collection (json-server emits either kind)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A user record.
///
/// The static fields are named; every other key the server returns,
/// including values for dynamically registered fields, lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Look up a field by name, static or dynamic
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        match field {
            "name" => self.name.as_ref(),
            "surname" => self.surname.as_ref(),
            "car" => self.car.as_ref(),
            "age" => self.age.as_ref(),
            "experience" => self.experience.as_ref(),
            other => self.extra.get(other),
        }
    }

    /// Cell text for a column, with the placeholder for missing values
    pub fn display(&self, field: &str) -> String {
        self.get(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }
}
