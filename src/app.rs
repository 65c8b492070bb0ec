//! Root application component
//!
//! App owns the application state and the child components. It routes keys,
//! applies Actions to the stores, and turns store events into status
//! messages. It holds no business rules of its own.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, UserForm, UserTable};
use crate::model::{AppState, StoreEvent, SubmitOutcome};
use crate::services::UserApi;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// A line for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    pub status_message: Option<StatusMessage>,
    /// Shown in the header
    pub api_base_url: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub table: UserTable,
    pub form: UserForm,
}

impl App {
    pub fn new(api_base_url: &str, api: Arc<dyn UserApi>, page_size: NonZeroUsize) -> App {
        App {
            state: AppState::new(api, page_size),
            should_quit: false,
            status_message: None,
            api_base_url: api_base_url.to_string(),
            table: UserTable::new(),
            form: UserForm::new(),
        }
    }

    /// First action of the session: the table asks for its first page
    pub fn init(&mut self) -> Result<Option<Action>> {
        self.table.init(&self.state)
    }

    /// Process an action and every follow-up action it produces
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let mut current = Some(action);
        while let Some(action) = current {
            if action != Action::Tick {
                tracing::trace!(%action, "dispatch");
            }
            current = self.update(action)?;
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::Quit));
        }

        if self.state.ui.is_visible() {
            return self.form.handle_key_event(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('a') => Ok(Some(Action::ToggleForm)),
            _ => self.table.handle_key_event(key, &self.state),
        }
    }

    pub fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                let mut follow_up = None;
                for event in self.state.poll() {
                    if let Some(action) = self.handle_store_event(event) {
                        follow_up = Some(action);
                    }
                }
                Ok(follow_up)
            }
            Action::Quit => {
                self.should_quit = true;
                Ok(None)
            }
            Action::Resize(width, height) => {
                let layout = calculate_main_layout(
                    Rect::new(0, 0, width, height),
                    self.status_message.is_some(),
                );
                self.table.set_area_height(layout.table.height);
                self.table.update(&action, &self.state)
            }
            Action::NextRow
            | Action::PrevRow
            | Action::PageDown
            | Action::PageUp
            | Action::FirstRow
            | Action::LastRow => self.table.update(&action, &self.state),
            Action::LoadNextPage => {
                self.state.records.load_next_page();
                Ok(None)
            }
            Action::ToggleForm => {
                self.state.ui.toggle();
                Ok(None)
            }
            Action::UpdateDraftField { field, value } => {
                self.state.records.update_draft_field(&field, value);
                Ok(None)
            }
            Action::SubmitForm => {
                self.status_message = Some(match self.state.records.submit_form() {
                    SubmitOutcome::Invalid => StatusMessage::error("Fix the highlighted fields"),
                    SubmitOutcome::Sent => StatusMessage::info("Sending new user..."),
                });
                Ok(None)
            }
            Action::RegisterField { name, field_type } => {
                match self.state.records.register_field(&name, field_type) {
                    Ok(()) => {
                        self.form.field_registered(&name);
                        self.status_message = Some(StatusMessage::info(format!(
                            "Added {} field '{}'",
                            field_type,
                            name.trim()
                        )));
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "field registration rejected");
                        self.form.field_rejected(&e);
                        self.status_message = Some(StatusMessage::error(e.to_string()));
                    }
                }
                Ok(None)
            }
        }
    }

    fn handle_store_event(&mut self, event: StoreEvent) -> Option<Action> {
        match event {
            StoreEvent::PageLoaded { count, .. } => {
                self.status_message = Some(StatusMessage::info(format!(
                    "Loaded {} users ({} total)",
                    count,
                    self.state.records.records().len()
                )));
                // A tall viewport may still not be full
                self.table.load_request(&self.state)
            }
            StoreEvent::LoadFailed { message } => {
                self.status_message = Some(StatusMessage::error(format!(
                    "Failed to load users: {}",
                    message
                )));
                None
            }
            StoreEvent::Created { id } => {
                self.form.reset_inputs();
                self.status_message = Some(StatusMessage::info(format!("Created user {}", id)));
                None
            }
            StoreEvent::SubmitFailed { message } => {
                self.status_message = Some(StatusMessage::error(format!(
                    "Failed to create user: {}",
                    message
                )));
                None
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area, self.status_message.is_some());

        self.draw_header(frame, layout.header);
        self.table.draw(frame, layout.table, &self.state)?;

        if let (Some(status_area), Some(status)) = (layout.status, &self.status_message) {
            let color = if status.is_error { Color::Red } else { Color::Green };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", status.text),
                    Style::default().fg(color),
                )),
                status_area,
            );
        }

        self.draw_help(frame, layout.help);

        if self.state.ui.is_visible() {
            self.form.draw(frame, area, &self.state)?;
        }
        Ok(())
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let records = &self.state.records;
        let mut spans = vec![
            Span::styled(
                " User Admin ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", self.api_base_url),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if records.is_loading() {
            spans.push(Span::styled(" loading… ", Style::default().fg(Color::Yellow)));
        }
        if records.is_submitting() {
            spans.push(Span::styled(" sending… ", Style::default().fg(Color::Yellow)));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str| {
            Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        };
        let line = if self.state.ui.is_visible() {
            Line::from(vec![key(" Esc "), Span::raw("Close form  "), key(" Ctrl-c "), Span::raw("Quit")])
        } else {
            Line::from(vec![
                key(" a "),
                Span::raw("Add user or field  "),
                key(" j/k "),
                Span::raw("Move  "),
                key(" PgUp/PgDn "),
                Span::raw("Page  "),
                key(" g/G "),
                Span::raw("First/Last  "),
                key(" q "),
                Span::raw("Quit"),
            ])
        };
        frame.render_widget(
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}
