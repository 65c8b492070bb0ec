//! UI Components
//!
//! Each component encapsulates its own presentation state, event handling,
//! and rendering logic. Components communicate through Actions rather than
//! direct state mutation.

pub mod form;
pub mod layout;
pub mod table;

pub use form::UserForm;
pub use layout::{calculate_main_layout, centered_popup};
pub use table::UserTable;
