//! Background request runner
//!
//! Each request runs on its own thread and reports back over a channel.
//! The UI thread drains finished requests on every tick, so store state is
//! only ever mutated from one place.

use super::api::UserApi;
use crate::error::ApiError;
use crate::model::{FormDraft, Record};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Result of a finished request
#[derive(Debug)]
pub enum ApiMessage {
    Page {
        offset: usize,
        result: Result<Vec<Record>, ApiError>,
    },
    Created(Result<Record, ApiError>),
}

pub struct RequestRunner {
    api: Arc<dyn UserApi>,
    sender: Sender<ApiMessage>,
    receiver: Receiver<ApiMessage>,
}

impl RequestRunner {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            sender,
            receiver,
        }
    }

    /// Start fetching one page
    pub fn fetch_page(&self, offset: usize, limit: usize) {
        let api = Arc::clone(&self.api);
        let tx = self.sender.clone();
        thread::spawn(move || {
            let result = api.fetch_page(offset, limit);
            let _ = tx.send(ApiMessage::Page { offset, result });
        });
    }

    /// Start creating a record from a snapshot of the draft
    pub fn create(&self, draft: FormDraft) {
        let api = Arc::clone(&self.api);
        let tx = self.sender.clone();
        thread::spawn(move || {
            let result = api.create(&draft);
            let _ = tx.send(ApiMessage::Created(result));
        });
    }

    /// Collect every request that has finished since the last poll
    pub fn poll(&self) -> Vec<ApiMessage> {
        let mut finished = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => finished.push(message),
                // The runner holds a sender, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }
}
