//! Field descriptors and the runtime-extensible field registry

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Email,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
        }
    }

    /// Next type in selector order, wrapping around
    pub fn next(&self) -> FieldType {
        match self {
            FieldType::Text => FieldType::Number,
            FieldType::Number => FieldType::Email,
            FieldType::Email => FieldType::Text,
        }
    }

    pub fn prev(&self) -> FieldType {
        match self {
            FieldType::Text => FieldType::Email,
            FieldType::Number => FieldType::Text,
            FieldType::Email => FieldType::Number,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and type of one column/input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Human label: built-in labels for static fields, capitalized name otherwise
    pub fn label(&self) -> String {
        match self.name.as_str() {
            "experience" => "Driving experience".to_string(),
            name => capitalize(name),
        }
    }
}

/// Static fields every record form carries, in display order
pub const STATIC_FIELDS: [(&str, FieldType); 5] = [
    ("name", FieldType::Text),
    ("surname", FieldType::Text),
    ("car", FieldType::Text),
    ("age", FieldType::Number),
    ("experience", FieldType::Number),
];

/// Upper-case the first character, leave the rest alone
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The static descriptors followed by those registered at runtime
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    descriptors: Vec<FieldDescriptor>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: STATIC_FIELDS
                .iter()
                .map(|(name, ty)| FieldDescriptor::new(*name, *ty))
                .collect(),
        }
    }

    /// Append a dynamic field. Names are unique across static and dynamic fields.
    pub fn register(&mut self, name: &str, field_type: FieldType) -> Result<(), FieldError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }
        if self.contains(name) {
            return Err(FieldError::Duplicate(name.to_string()));
        }
        self.descriptors.push(FieldDescriptor::new(name, field_type));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Declared type of a field; unknown fields are plain text
    pub fn type_of(&self, name: &str) -> FieldType {
        self.get(name).map(|d| d.field_type).unwrap_or_default()
    }

    /// All descriptors, static first then registration order
    pub fn all(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Every field the form requires, which is every descriptor
    pub fn required_names(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_starts_with_static_fields() {
        let registry = FieldRegistry::new();
        let names: Vec<_> = registry.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["name", "surname", "car", "age", "experience"]);
        assert_eq!(registry.all().len(), STATIC_FIELDS.len());
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let mut registry = FieldRegistry::new();
        registry.register("bonus", FieldType::Number).unwrap();

        let err = registry.register("bonus", FieldType::Text).unwrap_err();
        assert_eq!(err, FieldError::Duplicate("bonus".to_string()));

        let bonus: Vec<_> = registry.all().iter().filter(|d| d.name == "bonus").collect();
        assert_eq!(bonus.len(), 1);
        assert_eq!(bonus[0].field_type, FieldType::Number);
    }

    #[test]
    fn test_register_static_name_is_rejected() {
        let mut registry = FieldRegistry::new();
        assert_eq!(
            registry.register("age", FieldType::Text),
            Err(FieldError::Duplicate("age".to_string()))
        );
        assert_eq!(registry.all().len(), STATIC_FIELDS.len());
    }

    #[test]
    fn test_register_blank_name_is_rejected() {
        let mut registry = FieldRegistry::new();
        assert_eq!(registry.register("   ", FieldType::Text), Err(FieldError::EmptyName));
    }

    #[test]
    fn test_unknown_field_type_is_text() {
        let mut registry = FieldRegistry::new();
        registry.register("contact", FieldType::Email).unwrap();
        assert_eq!(registry.type_of("contact"), FieldType::Email);
        assert_eq!(registry.type_of("email"), FieldType::Text);
    }

    #[test]
    fn test_field_type_cycle() {
        assert_eq!(FieldType::Number.to_string(), "number");
        assert_eq!(FieldType::Email.next(), FieldType::Text);
        assert_eq!(FieldType::Text.prev(), FieldType::Email);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FieldDescriptor::new("car", FieldType::Text).label(), "Car");
        assert_eq!(
            FieldDescriptor::new("experience", FieldType::Number).label(),
            "Driving experience"
        );
    }
}
