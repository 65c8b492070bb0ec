//! Component trait - Interface for UI components
//!
//! Components own presentation state only (focus, scroll, input buffers).
//! Shared data lives in [`AppState`], which is passed in by reference, and
//! changes to it are requested by returning Actions.

use crate::action::Action;
use crate::model::AppState;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// The pattern follows:
/// 1. `handle_key_event` - Convert a key into an Action
/// 2. `update` - React to an Action, optionally returning a follow-up
/// 3. `draw` - Render from component state plus `AppState`
pub trait Component {
    /// Called once after construction, may request a first action
    fn init(&mut self, state: &AppState) -> Result<Option<Action>> {
        let _ = state;
        Ok(None)
    }

    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let _ = (key, state);
        Ok(None)
    }

    fn update(&mut self, action: &Action, state: &AppState) -> Result<Option<Action>> {
        let _ = (action, state);
        Ok(None)
    }

    /// Pure rendering apart from caching layout facts such as viewport height
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> Result<()>;
}
