//! Record store - paginated collection, dynamic fields, and the creation form
//!
//! All state lives here and is mutated on the UI thread only. Network work is
//! handed to the [`RequestRunner`] and its results are applied in [`RecordStore::poll`].

use super::draft::FormDraft;
use super::field::{FieldDescriptor, FieldRegistry, FieldType};
use super::pagination::PageCursor;
use super::record::{FieldValue, Record, RecordId};
use super::validation::{validate_value, ErrorSet};
use super::visibility::VisibilityStore;
use crate::error::FieldError;
use crate::services::{ApiMessage, RequestRunner, UserApi};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Something the UI may want to report after a poll
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    PageLoaded { offset: usize, count: usize },
    LoadFailed { message: String },
    Created { id: RecordId },
    SubmitFailed { message: String },
}

/// What `submit_form` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid,
    /// The draft is on its way to the server
    Sent,
}

pub struct RecordStore {
    records: Vec<Record>,
    cursor: PageCursor,
    fields: FieldRegistry,
    draft: FormDraft,
    errors: ErrorSet,
    loading: bool,
    submitting: bool,
    runner: RequestRunner,
}

impl RecordStore {
    pub fn new(api: Arc<dyn UserApi>, page_size: NonZeroUsize) -> Self {
        Self {
            records: Vec::new(),
            cursor: PageCursor::new(page_size),
            fields: FieldRegistry::new(),
            draft: FormDraft::new(),
            errors: ErrorSet::new(),
            loading: false,
            submitting: false,
            runner: RequestRunner::new(api),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────

    /// Request the next page. Returns false without doing anything when a
    /// page is already in flight or the collection is exhausted.
    pub fn load_next_page(&mut self) -> bool {
        if self.loading || !self.cursor.has_more {
            return false;
        }

        self.loading = true;
        tracing::debug!(
            offset = self.cursor.offset,
            limit = self.cursor.limit(),
            "loading users page"
        );
        self.runner.fetch_page(self.cursor.offset, self.cursor.limit());
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fields
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a field to the form and the table
    pub fn register_field(&mut self, name: &str, field_type: FieldType) -> Result<(), FieldError> {
        self.fields.register(name, field_type)?;
        tracing::info!(field = name.trim(), %field_type, "registered field");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a draft value and re-validate that field
    pub fn update_draft_field(&mut self, field: &str, value: FieldValue) {
        self.validate_field(field, &value);
        self.draft.set(field, value);
    }

    /// Validate one value against its field's rules, replacing any prior error
    pub fn validate_field(&mut self, field: &str, value: &FieldValue) {
        let field_type = self.fields.type_of(field);
        self.errors.set(field, validate_value(field, field_type, value));
    }

    /// Full re-check of every required field against the draft
    pub fn validate_form(&mut self) -> bool {
        let required = self.fields.required_names();
        for field in &required {
            let value = self.draft.get(field).cloned().unwrap_or_default();
            self.validate_field(field, &value);
        }
        required.iter().all(|field| self.errors.get(field).is_none())
    }

    /// Validate and, if clean, send the draft to the collection
    pub fn submit_form(&mut self) -> SubmitOutcome {
        if !self.validate_form() {
            tracing::debug!(errors = self.errors.len(), "submit blocked by validation");
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        tracing::debug!(fields = self.draft.len(), "submitting new user");
        self.runner.create(self.draft.clone());
        SubmitOutcome::Sent
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completions
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply every finished request.
    ///
    /// A finished submission hides the creation form whether it succeeded
    /// or not.
    pub fn poll(&mut self, ui: &mut VisibilityStore) -> Vec<StoreEvent> {
        self.runner
            .poll()
            .into_iter()
            .map(|message| self.apply(message, ui))
            .collect()
    }

    fn apply(&mut self, message: ApiMessage, ui: &mut VisibilityStore) -> StoreEvent {
        match message {
            ApiMessage::Page { offset, result } => {
                self.loading = false;
                match result {
                    Ok(page) => {
                        let count = page.len();
                        self.records.extend(page);
                        self.cursor.advance(count);
                        tracing::info!(
                            offset,
                            count,
                            has_more = self.cursor.has_more,
                            "loaded users page"
                        );
                        StoreEvent::PageLoaded { offset, count }
                    }
                    Err(e) => {
                        tracing::error!(offset, error = %e, "failed to load users page");
                        StoreEvent::LoadFailed {
                            message: e.to_string(),
                        }
                    }
                }
            }
            ApiMessage::Created(result) => {
                self.submitting = false;
                let event = match result {
                    Ok(record) => {
                        let id = record.id.clone();
                        self.records.insert(0, record);
                        self.draft.clear();
                        self.errors.clear();
                        tracing::info!(%id, "created user");
                        StoreEvent::Created { id }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create user");
                        StoreEvent::SubmitFailed {
                            message: e.to_string(),
                        }
                    }
                };
                ui.hide();
                event
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[cfg(test)]
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.fields.all()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    #[cfg(test)]
    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// A request is outstanding
    pub fn is_busy(&self) -> bool {
        self.loading || self.submitting
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::validation::{MSG_AGE, MSG_EMPTY};
    use crate::services::mock::{page, record, server_error, MockUserApi};
    use std::thread;
    use std::time::{Duration, Instant};

    fn store_with(api: &Arc<MockUserApi>, page_size: usize) -> RecordStore {
        let api: Arc<dyn UserApi> = api.clone();
        RecordStore::new(api, NonZeroUsize::new(page_size).unwrap())
    }

    /// Poll until no request is outstanding
    pub(crate) fn settle(store: &mut RecordStore, ui: &mut VisibilityStore) -> Vec<StoreEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while store.is_busy() && Instant::now() < deadline {
            events.extend(store.poll(ui));
            thread::sleep(Duration::from_millis(2));
        }
        events
    }

    fn fill_valid_draft(store: &mut RecordStore) {
        store.update_draft_field("name", FieldValue::text("Ivan"));
        store.update_draft_field("surname", FieldValue::text("Sidorov"));
        store.update_draft_field("car", FieldValue::text("Niva"));
        store.update_draft_field("age", FieldValue::Number(30.0));
        store.update_draft_field("experience", FieldValue::Number(8.0));
    }

    #[test]
    fn test_pages_concatenate_in_request_order() {
        let api = Arc::new(MockUserApi::with_pages(vec![page(1, 3), page(4, 3), page(7, 2)]));
        let mut store = store_with(&api, 3);
        let mut ui = VisibilityStore::new();

        for _ in 0..2 {
            assert!(store.load_next_page());
            settle(&mut store, &mut ui);
            assert!(store.has_more());
        }

        assert!(store.load_next_page());
        let events = settle(&mut store, &mut ui);
        assert_eq!(events, vec![StoreEvent::PageLoaded { offset: 6, count: 2 }]);
        assert!(!store.has_more());

        let ids: Vec<_> = store.records().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(*api.requested.lock().unwrap(), vec![(0, 3), (3, 3), (6, 3)]);

        // Exhausted collections are never fetched again
        assert!(!store.load_next_page());
        assert_eq!(api.fetches(), 3);
    }

    #[test]
    fn test_load_while_in_flight_is_ignored() {
        let api = Arc::new(MockUserApi::with_pages(vec![page(1, 5)]));
        let mut store = store_with(&api, 5);
        let mut ui = VisibilityStore::new();

        assert!(store.load_next_page());
        assert!(!store.load_next_page());
        assert_eq!(store.cursor().offset, 0);
        assert!(store.is_loading());

        settle(&mut store, &mut ui);
        assert_eq!(api.fetches(), 1);
        assert_eq!(store.cursor().offset, 5);
        assert_eq!(store.records().len(), 5);
    }

    #[test]
    fn test_load_failure_leaves_cursor_and_allows_retry() {
        let api = Arc::new(MockUserApi::new());
        api.push_page(Err(server_error()));
        api.push_page(Ok(page(1, 2)));
        let mut store = store_with(&api, 10);
        let mut ui = VisibilityStore::new();

        store.load_next_page();
        let events = settle(&mut store, &mut ui);
        assert!(matches!(events.as_slice(), [StoreEvent::LoadFailed { .. }]));
        assert!(!store.is_loading());
        assert_eq!(store.cursor().offset, 0);
        assert!(store.has_more());
        assert!(store.records().is_empty());

        assert!(store.load_next_page());
        settle(&mut store, &mut ui);
        assert_eq!(store.records().len(), 2);
        assert_eq!(*api.requested.lock().unwrap(), vec![(0, 10), (0, 10)]);
    }

    #[test]
    fn test_register_duplicate_field_keeps_first() {
        let api = Arc::new(MockUserApi::new());
        let mut store = store_with(&api, 10);

        store.register_field("bonus", FieldType::Number).unwrap();
        assert_eq!(
            store.register_field("bonus", FieldType::Text),
            Err(FieldError::Duplicate("bonus".to_string()))
        );

        let bonus: Vec<_> = store.fields().iter().filter(|d| d.name == "bonus").collect();
        assert_eq!(bonus.len(), 1);
        assert_eq!(bonus[0].field_type, FieldType::Number);
        assert_eq!(store.fields().len(), 6);
    }

    #[test]
    fn test_age_error_replaced_on_update() {
        let api = Arc::new(MockUserApi::new());
        let mut store = store_with(&api, 10);

        store.update_draft_field("age", FieldValue::Number(-5.0));
        let age_errors: Vec<_> = store.errors().iter().filter(|e| e.field == "age").collect();
        assert_eq!(age_errors.len(), 1);
        assert_eq!(age_errors[0].message, MSG_AGE);

        store.update_draft_field("age", FieldValue::Number(30.0));
        assert_eq!(store.error_for("age"), None);
        assert!(!store.has_errors());
    }

    #[test]
    fn test_validate_form_full_and_missing_surname() {
        let api = Arc::new(MockUserApi::new());
        let mut store = store_with(&api, 10);

        fill_valid_draft(&mut store);
        assert!(store.validate_form());
        assert!(store.errors().is_empty());

        store.update_draft_field("surname", FieldValue::text(""));
        assert!(!store.validate_form());
        assert_eq!(store.errors().len(), 1);
        assert_eq!(store.error_for("surname"), Some(MSG_EMPTY));
    }

    #[test]
    fn test_validate_form_requires_dynamic_fields() {
        let api = Arc::new(MockUserApi::new());
        let mut store = store_with(&api, 10);

        fill_valid_draft(&mut store);
        store.register_field("bonus", FieldType::Number).unwrap();

        assert!(!store.validate_form());
        assert_eq!(store.error_for("bonus"), Some(MSG_EMPTY));
    }

    #[test]
    fn test_submit_success_prepends_and_resets() {
        let api = Arc::new(MockUserApi::with_pages(vec![page(1, 2)]));
        let mut store = store_with(&api, 10);
        let mut ui = VisibilityStore::new();
        store.load_next_page();
        settle(&mut store, &mut ui);

        fill_valid_draft(&mut store);
        let mut response = record(101, "Ivan");
        response.surname = Some(FieldValue::text("Sidorov"));
        api.push_create(Ok(response.clone()));

        ui.toggle();
        assert_eq!(store.submit_form(), SubmitOutcome::Sent);
        assert!(store.is_submitting());

        let events = settle(&mut store, &mut ui);
        assert_eq!(
            events,
            vec![StoreEvent::Created {
                id: RecordId::Number(101)
            }]
        );
        assert_eq!(store.records()[0], response);
        assert_eq!(store.records().len(), 3);
        assert!(store.draft().is_empty());
        assert!(store.errors().is_empty());
        assert!(!store.is_submitting());
        assert!(!ui.is_visible());
    }

    #[test]
    fn test_submit_invalid_draft_sends_nothing() {
        let api = Arc::new(MockUserApi::new());
        let mut store = store_with(&api, 10);
        let mut ui = VisibilityStore::new();
        ui.toggle();

        store.update_draft_field("name", FieldValue::text("Ivan"));
        let before = store.draft().clone();

        assert_eq!(store.submit_form(), SubmitOutcome::Invalid);
        assert!(!store.is_submitting());
        thread::sleep(Duration::from_millis(20));
        assert!(store.poll(&mut ui).is_empty());

        assert_eq!(api.created(), 0);
        assert_eq!(store.draft(), &before);
        assert!(!store.is_submitting());
        assert!(ui.is_visible());
        assert_eq!(store.errors().len(), 4);
    }

    #[test]
    fn test_submit_failure_keeps_draft_but_hides_form() {
        let api = Arc::new(MockUserApi::new());
        api.push_create(Err(server_error()));
        let mut store = store_with(&api, 10);
        let mut ui = VisibilityStore::new();
        ui.toggle();

        fill_valid_draft(&mut store);
        let before = store.draft().clone();
        assert_eq!(store.submit_form(), SubmitOutcome::Sent);

        let events = settle(&mut store, &mut ui);
        assert!(matches!(events.as_slice(), [StoreEvent::SubmitFailed { .. }]));
        assert!(!store.is_submitting());
        assert_eq!(store.draft(), &before);
        assert!(store.records().is_empty());
        assert!(!ui.is_visible());
    }

    #[test]
    fn test_submit_and_load_in_flight_together() {
        let api = Arc::new(MockUserApi::with_pages(vec![page(1, 2)]));
        api.push_create(Ok(record(50, "Ivan")));
        let mut store = store_with(&api, 10);
        let mut ui = VisibilityStore::new();

        fill_valid_draft(&mut store);
        store.load_next_page();
        store.submit_form();
        settle(&mut store, &mut ui);

        assert_eq!(store.records().len(), 3);
        assert_eq!(store.records()[0].id, RecordId::Number(50));
        assert!(!store.is_busy());
    }
}
