//! Error types for the collection client and the field registry

use thiserror::Error;

/// Failure talking to the users collection
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Rejected field registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field name must not be empty")]
    EmptyName,

    #[error("a field named '{0}' already exists")]
    Duplicate(String),
}
