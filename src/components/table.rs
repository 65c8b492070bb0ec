//! Virtualized users table
//!
//! Only the rows that fit in the viewport are built on each draw. When the
//! viewport gets close to the end of what has been loaded, the table asks
//! for the next page.

use crate::action::Action;
use crate::component::Component;
use crate::model::field::capitalize;
use crate::model::{AppState, FieldDescriptor, Record};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Margin, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table},
    Frame,
};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows past the visible range at which the next page is requested
pub const LOAD_THRESHOLD: usize = 15;

/// Text of the trailing row shown while more pages exist
pub const LOADING_ROW: &str = "Loading...";

/// Rows moved by PageUp/PageDown when the viewport is unknown
const DEFAULT_VIEWPORT_ROWS: usize = 20;

/// Window of row indices to materialize
pub fn visible_range(row_count: usize, offset: usize, height: usize) -> Range<usize> {
    let start = offset.min(row_count);
    let end = start.saturating_add(height).min(row_count);
    start..end
}

/// Whether the unloaded boundary lies within `LOAD_THRESHOLD` rows of the viewport
pub fn needs_more_rows(visible_end: usize, loaded: usize, has_more: bool) -> bool {
    has_more && visible_end + LOAD_THRESHOLD > loaded
}

/// Column titles: static fields then dynamic ones, first letter capitalized
pub fn header_cells(fields: &[FieldDescriptor]) -> Vec<String> {
    fields.iter().map(|f| capitalize(&f.name)).collect()
}

/// One cell per column; missing values become the placeholder
pub fn row_cells(record: &Record, fields: &[FieldDescriptor]) -> Vec<String> {
    fields.iter().map(|f| record.display(&f.name)).collect()
}

/// Cut `text` to `width` display columns, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub struct UserTable {
    /// Selected row index (may point at the loading row)
    selected: usize,
    /// First visible row
    offset: usize,
    /// Data rows that fit, measured at the last draw
    viewport_rows: usize,
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UserTable {
    pub fn new() -> Self {
        Self {
            selected: 0,
            offset: 0,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
        }
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Fit the viewport to a table area of `height` rows
    pub fn set_area_height(&mut self, height: u16) {
        // Borders and the header row are not data rows
        self.viewport_rows = (height.saturating_sub(3) as usize).max(1);
        self.scroll_to_selected();
    }

    /// Loaded records plus the loading row while more pages exist
    fn row_count(state: &AppState) -> usize {
        let loaded = state.records.records().len();
        if state.records.has_more() {
            loaded + 1
        } else {
            loaded
        }
    }

    fn window(&self, state: &AppState) -> Range<usize> {
        visible_range(Self::row_count(state), self.offset, self.viewport_rows)
    }

    /// Ask for another page if the viewport is near the loaded boundary
    pub fn load_request(&self, state: &AppState) -> Option<Action> {
        let records = &state.records;
        if records.is_loading() {
            return None;
        }
        let window = self.window(state);
        // An empty table still has to fetch its first page
        let visible_end = window.end.max(self.offset + 1);
        needs_more_rows(visible_end, records.records().len(), records.has_more())
            .then_some(Action::LoadNextPage)
    }

    fn select(&mut self, index: usize, state: &AppState) {
        let last = Self::row_count(state).saturating_sub(1);
        self.selected = index.min(last);
        self.scroll_to_selected();
    }

    fn scroll_to_selected(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.viewport_rows {
            self.offset = self.selected + 1 - self.viewport_rows;
        }
    }
}

impl Component for UserTable {
    fn init(&mut self, state: &AppState) -> Result<Option<Action>> {
        Ok(self.load_request(state))
    }

    fn handle_key_event(&mut self, key: KeyEvent, _state: &AppState) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action, state: &AppState) -> Result<Option<Action>> {
        match action {
            Action::NextRow => self.select(self.selected + 1, state),
            Action::PrevRow => self.select(self.selected.saturating_sub(1), state),
            Action::PageDown => self.select(self.selected + self.viewport_rows, state),
            Action::PageUp => {
                self.select(self.selected.saturating_sub(self.viewport_rows), state)
            }
            Action::FirstRow => self.select(0, state),
            Action::LastRow => self.select(usize::MAX, state),
            Action::Resize(_, _) => {}
            _ => return Ok(None),
        }
        Ok(self.load_request(state))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> Result<()> {
        let fields = state.records.fields();
        let records = state.records.records();

        let row_count = Self::row_count(state);
        self.selected = self.selected.min(row_count.saturating_sub(1));
        self.set_area_height(area.height);

        let columns = fields.len().max(1);
        let inner_width = area.width.saturating_sub(2) as usize;
        let col_width = (inner_width.saturating_sub(columns - 1) / columns).max(1);

        let header = Row::new(
            header_cells(fields)
                .into_iter()
                .map(|h| Cell::from(fit(&h, col_width))),
        )
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .window(state)
            .map(|index| {
                let row = match records.get(index) {
                    Some(record) => Row::new(
                        row_cells(record, fields)
                            .into_iter()
                            .map(|c| Cell::from(fit(&c, col_width))),
                    ),
                    None => Row::new(vec![Cell::from(LOADING_ROW)])
                        .style(Style::default().fg(Color::DarkGray)),
                };
                if index == self.selected {
                    row.style(Style::default().bg(Color::DarkGray).fg(Color::White))
                } else {
                    row
                }
            })
            .collect();

        let widths = vec![Constraint::Ratio(1, columns as u32); columns];
        let title = if state.records.has_more() {
            format!(" Users ({} loaded) ", records.len())
        } else {
            format!(" Users ({}) ", records.len())
        };

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(table, area);

        if row_count > self.viewport_rows {
            let mut scrollbar_state = ScrollbarState::new(row_count).position(self.selected);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
