//! Editor pane - an editable text buffer with a line-number gutter
//!
//! The editor owns the text the user types. Every change is reported as an
//! [`ViewerEvent::EditSource`] carrying the whole buffer, which the App hands to
//! the workbench. The buffer is never rewritten by analysis results.
//!
//! The editor is also the [`MarkerSurface`] the diagnostic bridge writes to:
//! marked cells are drawn with the marker style and the line number of a
//! line carrying a `compiler` marker turns red.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::model::Model;
use super::theme::Theme;
use super::viewer::{Viewer, ViewerEvent};
use crate::diagnostics::{Marker, MarkerSurface, MARKER_SOURCE};

#[derive(Debug)]
pub struct Editor {
    lines: Vec<String>,
    /// 0-indexed
    cursor_row: usize,
    /// 0-indexed, in characters
    cursor_col: usize,
    markers: BTreeMap<String, Vec<Marker>>,
}

impl Editor {
    pub fn new(text: &str) -> Self {
        Editor {
            lines: split_lines(text),
            cursor_row: 0,
            cursor_col: 0,
            markers: BTreeMap::new(),
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the buffer and put the cursor back at the top.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn markers(&self, source: &str) -> &[Marker] {
        self.markers.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the 0-indexed cell is covered by any marker.
    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        let (line, column) = (to_position(row), to_position(col));
        self.markers
            .values()
            .flatten()
            .any(|marker| marker.covers(line, column))
    }

    /// First line that is scrolled into a viewport of `height` rows.
    pub fn scroll_offset(&self, height: usize) -> usize {
        self.cursor_row.saturating_sub(height.saturating_sub(1))
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_row)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    fn byte_index(&self, row: usize, col: usize) -> usize {
        let line = &self.lines[row];
        line.char_indices()
            .nth(col)
            .map(|(index, _)| index)
            .unwrap_or(line.len())
    }

    fn insert_char(&mut self, ch: char) {
        let index = self.byte_index(self.cursor_row, self.cursor_col);
        self.lines[self.cursor_row].insert(index, ch);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let index = self.byte_index(self.cursor_row, self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(index);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.lines.insert(self.cursor_row, rest);
    }

    /// Returns whether the buffer changed.
    fn backspace(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let index = self.byte_index(self.cursor_row, self.cursor_col);
            self.lines[self.cursor_row].remove(index);
            true
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
            self.lines[self.cursor_row].push_str(&line);
            true
        } else {
            false
        }
    }

    /// Returns whether the buffer changed.
    fn delete(&mut self) -> bool {
        if self.cursor_col < self.current_line_len() {
            let index = self.byte_index(self.cursor_row, self.cursor_col);
            self.lines[self.cursor_row].remove(index);
            true
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_cursor_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_cursor_column();
        }
    }

    fn move_cursor_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_cursor_column();
        }
    }

    fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    fn clamp_cursor_column(&mut self) {
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    fn gutter_width(&self) -> usize {
        self.lines.len().to_string().len()
    }
}

impl MarkerSurface for Editor {
    fn set_markers(&mut self, source: &str, markers: Vec<Marker>) {
        if markers.is_empty() {
            self.markers.remove(source);
        } else {
            self.markers.insert(source.to_string(), markers);
        }
    }
}

impl Viewer for Editor {
    fn render(&self, frame: &mut Frame, area: Rect, _model: &Model, theme: &Theme) {
        let height = area.height as usize;
        let gutter_width = self.gutter_width();
        let text_width = (area.width as usize).saturating_sub(gutter_width + 1);
        let column_offset = self.cursor_col.saturating_sub(text_width.saturating_sub(1));
        let error_lines: Vec<u32> = self
            .markers(MARKER_SOURCE)
            .iter()
            .map(|marker| marker.start_line)
            .collect();

        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll_offset(height))
            .take(height)
            .map(|(row, text)| {
                let number = row + 1;
                let gutter_style = if error_lines.contains(&to_position(row)) {
                    theme.gutter_error()
                } else {
                    theme.gutter()
                };
                let mut spans = vec![Span::styled(
                    format!("{number:>gutter_width$} "),
                    gutter_style,
                )];

                let char_count = text.chars().count();
                for (col, ch) in text.chars().enumerate().skip(column_offset) {
                    let style = if row == self.cursor_row && col == self.cursor_col {
                        theme.editor_cursor()
                    } else if self.is_marked(row, col) {
                        theme.diagnostic_marker()
                    } else {
                        theme.editor_text()
                    };
                    spans.push(Span::styled(ch.to_string(), style));
                }
                if row == self.cursor_row && self.cursor_col >= char_count {
                    spans.push(Span::styled(" ", theme.editor_cursor()));
                }

                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, _model: &Model) -> Option<ViewerEvent> {
        let edited = match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Up => {
                self.move_cursor_up();
                return Some(ViewerEvent::CursorMoved);
            }
            KeyCode::Down => {
                self.move_cursor_down();
                return Some(ViewerEvent::CursorMoved);
            }
            KeyCode::Left => {
                self.move_cursor_left();
                return Some(ViewerEvent::CursorMoved);
            }
            KeyCode::Right => {
                self.move_cursor_right();
                return Some(ViewerEvent::CursorMoved);
            }
            KeyCode::Home => {
                self.cursor_col = 0;
                return Some(ViewerEvent::CursorMoved);
            }
            KeyCode::End => {
                self.cursor_col = self.current_line_len();
                return Some(ViewerEvent::CursorMoved);
            }
            _ => return Some(ViewerEvent::NoChange),
        };

        if edited {
            Some(ViewerEvent::EditSource(self.text()))
        } else {
            Some(ViewerEvent::NoChange)
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
