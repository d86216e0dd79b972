//! Tree viewer - displays and navigates the rendered analysis tree
//!
//! Rows come from [`Model::flattened_tree`]. Up/Down move the selection,
//! Left collapses and Right expands the selected row. Enter (or `a`) on an
//! assist offer asks for a repair suggestion; on any other row it toggles.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::model::{FlattenedTreeNode, Model, NodePath};
use super::theme::Theme;
use super::viewer::{Viewer, ViewerEvent};

const EMPTY_TREE: &str = "No analysis yet. Edit the source or press Ctrl+R.";

#[derive(Debug, Default)]
pub struct TreeViewer;

impl TreeViewer {
    pub fn new() -> Self {
        TreeViewer
    }

    /// The selected row, falling back to the first one.
    fn current<'a>(rows: &'a [FlattenedTreeNode], model: &Model) -> Option<&'a FlattenedTreeNode> {
        model
            .selected_node()
            .and_then(|path| rows.iter().find(|row| &row.path == path))
            .or_else(|| rows.first())
    }

    fn neighbour(rows: &[FlattenedTreeNode], path: &NodePath, forward: bool) -> Option<NodePath> {
        let index = rows.iter().position(|row| &row.path == path)?;
        let target = if forward {
            index.checked_add(1)?
        } else {
            index.checked_sub(1)?
        };
        rows.get(target).map(|row| row.path.clone())
    }

    /// Screen lines for one row. Wrapping rows may take several.
    fn row_lines(row: &FlattenedTreeNode, width: usize) -> Vec<String> {
        let indent = "  ".repeat(row.depth);
        let prefix = format!("{indent}{} ", row.icon);
        let label_width = width.saturating_sub(prefix.chars().count()).max(1);

        if row.wraps {
            let continuation = " ".repeat(prefix.chars().count());
            wrap(&row.label, label_width)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    if i == 0 {
                        format!("{prefix}{chunk}")
                    } else {
                        format!("{continuation}{chunk}")
                    }
                })
                .collect()
        } else {
            let first = row.label.lines().next().unwrap_or_default();
            let truncated: String = first.chars().take(label_width).collect();
            vec![format!("{prefix}{truncated}")]
        }
    }
}

impl Viewer for TreeViewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
        let rows = model.flattened_tree();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(EMPTY_TREE).style(theme.tree_collapsed()),
                area,
            );
            return;
        }

        let selected = TreeViewer::current(&rows, model).map(|row| row.path.clone());
        let mut lines: Vec<Line> = Vec::new();
        let mut selected_line = 0;

        for row in &rows {
            let is_selected = Some(&row.path) == selected.as_ref();
            if is_selected {
                selected_line = lines.len();
            }
            let style = if is_selected {
                theme.tree_selected()
            } else if row.is_error {
                theme.tree_error()
            } else if row.has_children && !row.is_expanded {
                theme.tree_collapsed()
            } else {
                theme.tree_normal()
            };
            for text in TreeViewer::row_lines(row, area.width as usize) {
                lines.push(Line::from(text).style(style));
            }
        }

        let height = area.height as usize;
        let offset = selected_line.saturating_sub(height.saturating_sub(1));
        let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
        frame.render_widget(Paragraph::new(visible).style(Style::default()), area);
    }

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent> {
        let rows = model.flattened_tree();
        let Some(current) = TreeViewer::current(&rows, model) else {
            return Some(ViewerEvent::NoChange);
        };

        let event = match key.code {
            KeyCode::Up => TreeViewer::neighbour(&rows, &current.path, false)
                .map(ViewerEvent::SelectNode),
            KeyCode::Down => TreeViewer::neighbour(&rows, &current.path, true)
                .map(ViewerEvent::SelectNode),
            KeyCode::Left if current.has_children && current.is_expanded => {
                Some(ViewerEvent::CollapseNode(current.path.clone()))
            }
            // Left on a leaf or collapsed row jumps to its parent.
            KeyCode::Left => current.path.parent().map(ViewerEvent::SelectNode),
            KeyCode::Right if current.has_children && !current.is_expanded => {
                Some(ViewerEvent::ExpandNode(current.path.clone()))
            }
            KeyCode::Enter | KeyCode::Char('a') => match &current.trigger {
                Some(trigger) => Some(ViewerEvent::RequestAssist(trigger.clone())),
                None if current.has_children => {
                    Some(ViewerEvent::ToggleNodeExpansion(current.path.clone()))
                }
                None => None,
            },
            _ => None,
        };
        Some(event.unwrap_or(ViewerEvent::NoChange))
    }
}

/// Greedy word wrap on character counts. Explicit newlines are kept.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            while line.chars().count() > width {
                let head: String = line.chars().take(width).collect();
                let tail: String = line.chars().skip(width).collect();
                out.push(head);
                line = tail;
            }
        }
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
