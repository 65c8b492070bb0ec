//! External service interactions
//!
//! - `api` - HTTP access to the users collection
//! - `request_runner` - Runs requests off the UI thread

pub mod api;
#[cfg(test)]
pub mod mock;
pub mod request_runner;

pub use api::{HttpUserApi, UserApi};
pub use request_runner::{ApiMessage, RequestRunner};
