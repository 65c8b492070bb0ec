//! Creation form overlay
//!
//! Left column: one input per field descriptor plus the submit button.
//! Right column: the add-field mini form (name, type, add button).

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::error::FieldError;
use crate::model::{AppState, FieldDescriptor, FieldType, FieldValue};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::collections::HashMap;

/// Screen lines used by one field: label, input, error
const LINES_PER_FIELD: usize = 3;

/// Focusable controls, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Submit,
    NewFieldName,
    NewFieldType,
    AddField,
}

impl FormFocus {
    fn next(self, field_count: usize) -> FormFocus {
        match self {
            FormFocus::Field(i) if i + 1 < field_count => FormFocus::Field(i + 1),
            FormFocus::Field(_) => FormFocus::Submit,
            FormFocus::Submit => FormFocus::NewFieldName,
            FormFocus::NewFieldName => FormFocus::NewFieldType,
            FormFocus::NewFieldType => FormFocus::AddField,
            FormFocus::AddField => FormFocus::Field(0),
        }
    }

    fn prev(self, field_count: usize) -> FormFocus {
        match self {
            FormFocus::Field(0) => FormFocus::AddField,
            FormFocus::Field(i) => FormFocus::Field(i - 1),
            FormFocus::Submit => FormFocus::Field(field_count.saturating_sub(1)),
            FormFocus::NewFieldName => FormFocus::Submit,
            FormFocus::NewFieldType => FormFocus::NewFieldName,
            FormFocus::AddField => FormFocus::NewFieldType,
        }
    }
}

/// Turn raw input into a draft value according to the field type
pub fn parse_input(descriptor: &FieldDescriptor, raw: &str) -> FieldValue {
    if descriptor.field_type == FieldType::Number {
        if let Ok(n) = raw.trim().parse::<f64>() {
            if n.is_finite() {
                return FieldValue::Number(n);
            }
        }
    }
    FieldValue::text(raw)
}

pub struct UserForm {
    focus: FormFocus,
    /// Raw text per field, so partial numbers like "3." survive editing
    inputs: HashMap<String, String>,
    new_field_name: String,
    new_field_type: FieldType,
    /// Feedback for the add-field mini form
    notice: Option<(String, bool)>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UserForm {
    pub fn new() -> Self {
        Self {
            focus: FormFocus::Field(0),
            inputs: HashMap::new(),
            new_field_name: String::new(),
            new_field_type: FieldType::Text,
            notice: None,
        }
    }

    #[cfg(test)]
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    #[cfg(test)]
    pub fn input(&self, field: &str) -> &str {
        self.inputs.get(field).map(String::as_str).unwrap_or("")
    }

    /// Submit is blocked while sending or while any error is shown
    pub fn submit_enabled(state: &AppState) -> bool {
        !state.records.is_submitting() && !state.records.has_errors()
    }

    /// Forget typed values after a record was created
    pub fn reset_inputs(&mut self) {
        self.inputs.clear();
        self.focus = FormFocus::Field(0);
    }

    pub fn field_registered(&mut self, name: &str) {
        self.notice = Some((format!("Field '{}' added", name.trim()), false));
        self.new_field_name.clear();
        self.new_field_type = FieldType::Text;
    }

    pub fn field_rejected(&mut self, error: &FieldError) {
        self.notice = Some((error.to_string(), true));
    }

    fn edit_field(&mut self, descriptor: &FieldDescriptor, key: KeyCode) -> Option<Action> {
        let buffer = self.inputs.entry(descriptor.name.clone()).or_default();
        match key {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => return None,
        }
        Some(Action::UpdateDraftField {
            field: descriptor.name.clone(),
            value: parse_input(descriptor, buffer),
        })
    }

    fn add_field_action(&mut self) -> Option<Action> {
        if self.new_field_name.trim().is_empty() {
            self.notice = Some((FieldError::EmptyName.to_string(), true));
            return None;
        }
        Some(Action::RegisterField {
            name: self.new_field_name.clone(),
            field_type: self.new_field_type,
        })
    }
}

impl Component for UserForm {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let fields = state.records.fields();
        let field_count = fields.len();

        match key.code {
            KeyCode::Esc => return Ok(Some(Action::ToggleForm)),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next(field_count);
                return Ok(None);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev(field_count);
                return Ok(None);
            }
            _ => {}
        }

        let action = match self.focus {
            FormFocus::Field(i) => match (key.code, fields.get(i)) {
                (KeyCode::Enter, _) => {
                    self.focus = self.focus.next(field_count);
                    None
                }
                (code, Some(descriptor)) => self.edit_field(descriptor, code),
                (_, None) => None,
            },
            FormFocus::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') if Self::submit_enabled(state) => {
                    Some(Action::SubmitForm)
                }
                _ => None,
            },
            FormFocus::NewFieldName => {
                match key.code {
                    KeyCode::Char(c) => {
                        self.new_field_name.push(c);
                        self.notice = None;
                    }
                    KeyCode::Backspace => {
                        self.new_field_name.pop();
                        self.notice = None;
                    }
                    KeyCode::Enter => self.focus = self.focus.next(field_count),
                    _ => {}
                }
                None
            }
            FormFocus::NewFieldType => {
                match key.code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.new_field_type = self.new_field_type.prev()
                    }
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                        self.new_field_type = self.new_field_type.next()
                    }
                    KeyCode::Enter => self.focus = self.focus.next(field_count),
                    _ => {}
                }
                None
            }
            FormFocus::AddField => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.add_field_action(),
                _ => None,
            },
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> Result<()> {
        let width = 96u16.min(area.width.saturating_sub(4));
        let height = area.height.saturating_sub(4);
        let popup_area = centered_popup(area, width, height);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Add user or field ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        self.draw_record_fields(frame, columns[0], state);
        self.draw_new_field(frame, columns[1]);

        let help = Line::from(vec![
            Span::styled(" Tab ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Next  "),
            Span::styled(" S-Tab ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Prev  "),
            Span::styled(" Enter ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Activate  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Type  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Close"),
        ]);
        frame.render_widget(Paragraph::new(help), rows[1]);
        Ok(())
    }
}

impl UserForm {
    fn input_line(value: &str, focused: bool) -> Line<'static> {
        if focused {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", value),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(vec![Span::raw("  "), Span::raw(value.to_string())])
        }
    }

    fn button_line(label: &str, focused: bool, enabled: bool) -> Line<'static> {
        let style = match (enabled, focused) {
            (false, _) => Style::default().fg(Color::DarkGray),
            (true, true) => Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::Green),
        };
        Line::from(Span::styled(format!("[ {} ]", label), style))
    }

    fn draw_record_fields(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let records = &state.records;
        let mut lines = Vec::new();

        for (i, descriptor) in records.fields().iter().enumerate() {
            let focused = self.focus == FormFocus::Field(i);
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            lines.push(Line::from(vec![
                Span::styled(descriptor.label(), label_style),
                Span::styled(
                    format!(" ({})", descriptor.field_type),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));

            let value = match self.inputs.get(&descriptor.name) {
                Some(raw) => raw.clone(),
                None => records
                    .draft()
                    .get(&descriptor.name)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            };
            lines.push(Self::input_line(&value, focused));

            lines.push(match records.error_for(&descriptor.name) {
                Some(message) => Line::from(Span::styled(
                    format!("  {}", message),
                    Style::default().fg(Color::Red),
                )),
                None => Line::from(""),
            });
        }

        let submit_label = if records.is_submitting() {
            "Sending..."
        } else {
            "Add user"
        };
        lines.push(Self::button_line(
            submit_label,
            self.focus == FormFocus::Submit,
            Self::submit_enabled(state),
        ));

        // Keep the focused control on screen
        let focused_line = match self.focus {
            FormFocus::Field(i) => i * LINES_PER_FIELD + LINES_PER_FIELD,
            _ => records.fields().len() * LINES_PER_FIELD + 1,
        };
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = focused_line.saturating_sub(visible);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" New user ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_new_field(&self, frame: &mut Frame, area: Rect) {
        let type_focused = self.focus == FormFocus::NewFieldType;
        let type_style = if type_focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut lines = vec![
            Line::from(Span::styled("Field name", Style::default().fg(Color::Cyan))),
            Self::input_line(&self.new_field_name, self.focus == FormFocus::NewFieldName),
            Line::from(""),
            Line::from(Span::styled("Field type", Style::default().fg(Color::Cyan))),
            Line::from(vec![
                Span::raw(if type_focused { "> " } else { "  " }),
                Span::styled(format!("< {} >", self.new_field_type), type_style),
            ]),
            Line::from(""),
            Self::button_line("Add field", self.focus == FormFocus::AddField, true),
        ];

        if let Some((message, is_error)) = &self.notice {
            let color = if *is_error { Color::Red } else { Color::Green };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(color),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" New field ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
