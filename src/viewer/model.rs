//! Data model for the viewer
//!
//! The Model holds application state that is independent of any widget:
//! - The workbench (sessions and engine plumbing)
//! - Which tree rows are collapsed and which one is selected
//! - The file being edited and a one-line status notice
//!
//! Rendering and key handling live in the viewers; the model is plain data
//! and can be tested without a terminal.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::render::{AssistTrigger, VisualKind, VisualNode};
use crate::session::Workbench;

/// Which pane currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Tree,
}

impl Focus {
    pub fn toggle(&self) -> Focus {
        match self {
            Focus::Editor => Focus::Tree,
            Focus::Tree => Focus::Editor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Focus::Editor => "EDITOR",
            Focus::Tree => "TREE",
        }
    }
}

/// Position of a row in the visual tree, as child indices from the root.
///
/// The root itself is the empty path. Paths stay valid across re-analysis as
/// long as the tree keeps its shape, so collapse state survives most edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn new(path: &[usize]) -> Self {
        NodePath(path.to_vec())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.0.split_last()?;
        Some(NodePath(rest.to_vec()))
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }
}

/// One visible row of the tree pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedTreeNode {
    pub path: NodePath,
    pub depth: usize,
    pub icon: &'static str,
    pub label: String,
    pub is_expanded: bool,
    pub has_children: bool,
    /// Long free text that should wrap instead of being truncated.
    pub wraps: bool,
    pub is_error: bool,
    /// Set on the row that starts an assist request.
    pub trigger: Option<AssistTrigger>,
}

pub struct Model {
    workbench: Workbench,
    file: Option<PathBuf>,
    collapsed: HashSet<NodePath>,
    selected: Option<NodePath>,
    notice: Option<String>,
}

impl Model {
    pub fn new(workbench: Workbench, file: Option<PathBuf>) -> Self {
        Model {
            workbench,
            file,
            collapsed: HashSet::new(),
            selected: None,
            notice: None,
        }
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    pub fn workbench_mut(&mut self) -> &mut Workbench {
        &mut self.workbench
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Display name for the title bar.
    pub fn file_name(&self) -> String {
        self.file
            .as_deref()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("untitled")
            .to_string()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Reset the session for `dialect`. Tree state is dropped with the tree.
    pub fn switch_dialect(&mut self, dialect: Dialect) {
        self.workbench.switch_dialect(dialect);
        self.collapsed.clear();
        self.selected = None;
    }

    /// Write the current source back to the opened file.
    pub fn save(&self) -> io::Result<Option<&Path>> {
        match self.file.as_deref() {
            Some(path) => {
                fs::write(path, self.workbench.source())?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    pub fn selected_node(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    pub fn select_node(&mut self, path: NodePath) {
        self.selected = Some(path);
    }

    pub fn is_node_expanded(&self, path: &NodePath) -> bool {
        !self.collapsed.contains(path)
    }

    pub fn toggle_node_expansion(&mut self, path: NodePath) {
        if !self.collapsed.remove(&path) {
            self.collapsed.insert(path);
        }
    }

    pub fn collapse_node(&mut self, path: NodePath) {
        self.collapsed.insert(path);
    }

    pub fn expand_node(&mut self, path: &NodePath) {
        self.collapsed.remove(path);
    }

    /// Visible rows of the current tree in display order.
    ///
    /// Children of collapsed rows are skipped. Empty until the first
    /// analysis has been applied.
    pub fn flattened_tree(&self) -> Vec<FlattenedTreeNode> {
        let mut rows = Vec::new();
        if let Some(root) = self.workbench.visual_tree() {
            self.flatten(&root, NodePath::root(), &mut rows);
        }
        rows
    }

    fn flatten(&self, node: &VisualNode, path: NodePath, rows: &mut Vec<FlattenedTreeNode>) {
        let is_expanded = self.is_node_expanded(&path);
        rows.push(FlattenedTreeNode {
            depth: path.depth(),
            icon: node.kind.icon(),
            label: node.kind.label(),
            is_expanded,
            has_children: !node.children.is_empty(),
            wraps: matches!(
                node.kind,
                VisualKind::AssistSuggestion(_) | VisualKind::AssistUnavailable(_)
            ),
            is_error: matches!(node.kind, VisualKind::ErrorPanel { .. }),
            trigger: node.trigger().cloned(),
            path: path.clone(),
        });
        if is_expanded {
            for (index, child) in node.children.iter().enumerate() {
                self.flatten(child, path.child(index), rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_path_parent_and_child() {
        let path = NodePath::new(&[0, 1, 2]);
        assert_eq!(path.parent(), Some(NodePath::new(&[0, 1])));
        assert_eq!(path.child(4).indices(), &[0, 1, 2, 4]);
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_focus_toggle() {
        assert_eq!(Focus::Editor.toggle(), Focus::Tree);
        assert_eq!(Focus::Tree.toggle(), Focus::Editor);
    }
}
