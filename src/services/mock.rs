//! Scripted in-memory collection for tests

use super::api::UserApi;
use crate::error::ApiError;
use crate::model::{FieldValue, FormDraft, Record, RecordId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockUserApi {
    pages: Mutex<VecDeque<Result<Vec<Record>, ApiError>>>,
    creates: Mutex<VecDeque<Result<Record, ApiError>>>,
    pub fetch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub requested: Mutex<Vec<(usize, usize)>>,
}

impl MockUserApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<Vec<Record>>) -> Self {
        let api = Self::new();
        for page in pages {
            api.push_page(Ok(page));
        }
        api
    }

    pub fn push_page(&self, page: Result<Vec<Record>, ApiError>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn push_create(&self, result: Result<Record, ApiError>) {
        self.creates.lock().unwrap().push_back(result);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl UserApi for MockUserApi {
    fn fetch_page(&self, start: usize, limit: usize) -> Result<Vec<Record>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push((start, limit));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn create(&self, _draft: &FormDraft) -> Result<Record, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Status {
                    status: 500,
                    url: "mock://users".to_string(),
                })
            })
    }
}

/// A record with every static field filled in
pub fn record(id: i64, name: &str) -> Record {
    Record {
        id: RecordId::Number(id),
        name: Some(FieldValue::text(name)),
        surname: Some(FieldValue::text("Petrov")),
        car: Some(FieldValue::text("Volga")),
        age: Some(FieldValue::Number(40.0)),
        experience: Some(FieldValue::Number(20.0)),
        extra: BTreeMap::new(),
    }
}

/// `count` records with ids starting at `first_id`
pub fn page(first_id: i64, count: usize) -> Vec<Record> {
    (0..count as i64)
        .map(|i| record(first_id + i, &format!("user{}", first_id + i)))
        .collect()
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 503,
        url: "mock://users".to_string(),
    }
}
