//! Viewer trait
//!
//! A viewer renders one pane from the model and turns key presses into
//! [`ViewerEvent`]s. Viewers never mutate the model directly; the App applies
//! the events they return.

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::model::{Model, NodePath};
use super::theme::Theme;
use crate::render::AssistTrigger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The editor buffer changed; carries the full new text.
    EditSource(String),
    /// The editor cursor moved.
    CursorMoved,
    SelectNode(NodePath),
    ToggleNodeExpansion(NodePath),
    CollapseNode(NodePath),
    ExpandNode(NodePath),
    /// The user asked for a repair suggestion.
    RequestAssist(AssistTrigger),
    NoChange,
}

pub trait Viewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model, theme: &Theme);

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent>;
}
