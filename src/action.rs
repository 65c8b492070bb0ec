//! Action enum - All possible application actions
//!
//! Components emit Actions in response to key events, and the App processes
//! them to update state.

use crate::model::{FieldType, FieldValue};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; finished requests are applied here
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Table Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextRow,
    PrevRow,
    PageDown,
    PageUp,
    FirstRow,
    LastRow,
    /// Fetch the next page of users
    LoadNextPage,

    // ─────────────────────────────────────────────────────────────────────────
    // Creation Form
    // ─────────────────────────────────────────────────────────────────────────
    /// Show or hide the creation form
    ToggleForm,
    UpdateDraftField { field: String, value: FieldValue },
    SubmitForm,
    RegisterField { name: String, field_type: FieldType },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Quit => write!(f, "Quit"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::PageDown => write!(f, "PageDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::LoadNextPage => write!(f, "LoadNextPage"),
            Action::ToggleForm => write!(f, "ToggleForm"),
            Action::UpdateDraftField { field, value } => {
                write!(f, "UpdateDraftField({}, {})", field, value)
            }
            Action::SubmitForm => write!(f, "SubmitForm"),
            Action::RegisterField { name, field_type } => {
                write!(f, "RegisterField({}, {})", name, field_type)
            }
        }
    }
}
