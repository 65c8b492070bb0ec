//! HTTP client for the users collection
//!
//! The collection is a json-server style REST resource:
//! - `GET /users?_start={offset}&_limit={limit}` returns a page of records
//! - `POST /users` with a JSON body creates a record and returns it with its id

use crate::error::ApiError;
use crate::model::{FormDraft, Record};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

/// Operations the record store needs from the remote collection
pub trait UserApi: Send + Sync {
    /// Fetch records `[start, start + limit)` in server order
    fn fetch_page(&self, start: usize, limit: usize) -> Result<Vec<Record>, ApiError>;

    /// Create a record from the draft, returning the stored record
    fn create(&self, draft: &FormDraft) -> Result<Record, ApiError>;
}

/// Blocking reqwest implementation, called from runner threads
pub struct HttpUserApi {
    client: Client,
    base_url: String,
}

impl HttpUserApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl UserApi for HttpUserApi {
    fn fetch_page(&self, start: usize, limit: usize) -> Result<Vec<Record>, ApiError> {
        let response = self
            .client
            .get(self.users_url())
            .query(&[("_start", start), ("_limit", limit)])
            .send()?;
        Self::decode(response)
    }

    fn create(&self, draft: &FormDraft) -> Result<Record, ApiError> {
        let response = self.client.post(self.users_url()).json(draft).send()?;
        Self::decode(response)
    }
}
