//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `RecordStore` - Records, field registry, form draft and validation
//! - `VisibilityStore` - Whether the creation form is shown
//! - `AppState` - The container both stores live in

pub mod draft;
pub mod field;
pub mod pagination;
pub mod record;
pub mod record_store;
pub mod validation;
pub mod visibility;

// Re-export commonly used types
pub use draft::FormDraft;
pub use field::{FieldDescriptor, FieldType};
pub use record::{FieldValue, Record, RecordId};
pub use record_store::{RecordStore, StoreEvent, SubmitOutcome};
pub use visibility::VisibilityStore;

use crate::services::UserApi;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Application state, created once at startup and handed to components by reference
pub struct AppState {
    pub records: RecordStore,
    pub ui: VisibilityStore,
}

impl AppState {
    pub fn new(api: Arc<dyn UserApi>, page_size: NonZeroUsize) -> Self {
        Self {
            records: RecordStore::new(api, page_size),
            ui: VisibilityStore::new(),
        }
    }

    /// Apply finished requests
    pub fn poll(&mut self) -> Vec<StoreEvent> {
        self.records.poll(&mut self.ui)
    }
}
