//! Client-side field validation

use super::field::FieldType;
use super::record::FieldValue;
use regex::Regex;
use std::sync::LazyLock;

pub const MSG_EMPTY: &str = "must not be empty";
pub const MSG_EMAIL: &str = "invalid email format";
pub const MSG_AGE: &str = "age must be a positive number";

/// local@domain.tld with no whitespace and a single @
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// A validation message attached to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Check one value. The first failing rule wins; blankness is checked first.
pub fn validate_value(field: &str, field_type: FieldType, value: &FieldValue) -> Option<String> {
    if value.is_blank() {
        return Some(MSG_EMPTY.to_string());
    }

    if field_type == FieldType::Email && !EMAIL_REGEX.is_match(&value.to_string()) {
        return Some(MSG_EMAIL.to_string());
    }

    if field == "age" {
        match value.as_number() {
            Some(n) if n > 0.0 => {}
            _ => return Some(MSG_AGE.to_string()),
        }
    }

    None
}

/// Ordered error set holding at most one error per field
#[derive(Debug, Clone, Default)]
pub struct ErrorSet {
    errors: Vec<ValidationError>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the error for `field`; `None` clears it
    pub fn set(&mut self, field: &str, message: Option<String>) {
        self.errors.retain(|e| e.field != field);
        if let Some(message) = message {
            self.errors.push(ValidationError {
                field: field.to_string(),
                message,
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }
}
