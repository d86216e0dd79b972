//! Main application state and event handling
//!
//! The App brings together:
//! - Model (workbench plus tree state)
//! - Editor and TreeViewer (the panes)
//! - The diagnostic bridge that keeps editor markers in step with the tree
//! - Focus and global keys (quit, focus, dialect, re-analyze, save)

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use super::editor::Editor;
use super::model::{Focus, Model};
use super::theme::Theme;
use super::treeviewer::TreeViewer;
use super::viewer::{Viewer, ViewerEvent};
use crate::diagnostics::DiagnosticBridge;

pub struct App {
    pub model: Model,
    pub editor: Editor,
    pub tree_viewer: TreeViewer,
    pub theme: Theme,
    pub focus: Focus,
    pub should_quit: bool,
    bridge: DiagnosticBridge,
}

impl App {
    pub fn new(model: Model) -> Self {
        let editor = Editor::new(model.workbench().source());
        let mut app = App {
            model,
            editor,
            tree_viewer: TreeViewer::new(),
            theme: Theme::default(),
            focus: Focus::default(),
            should_quit: false,
            bridge: DiagnosticBridge::new(),
        };
        app.sync_diagnostics();
        app
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Handle a keyboard event
    ///
    /// Returns whether the state changed (needed for re-rendering)
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if control => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('q') if key.modifiers.is_empty() && self.focus == Focus::Tree => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Tab => {
                self.toggle_focus();
                return true;
            }
            KeyCode::F(2) => {
                self.switch_dialect();
                return true;
            }
            KeyCode::Char('r') if control => {
                self.model.workbench_mut().reanalyze();
                self.model.set_notice("re-analyzing");
                return true;
            }
            KeyCode::Char('s') if control => {
                self.save();
                return true;
            }
            _ => {}
        }

        let event = match self.focus {
            Focus::Editor => self.editor.handle_key(key, &self.model),
            Focus::Tree => self.tree_viewer.handle_key(key, &self.model),
        };

        match event {
            Some(event) => self.process_viewer_event(event),
            None => false,
        }
    }

    /// Apply engine responses that arrived since the last tick.
    ///
    /// Returns whether anything visible changed.
    pub fn tick(&mut self) -> bool {
        let updates = self.model.workbench_mut().poll_completions();
        let markers_changed = self.sync_diagnostics();
        // Even a stale update changes the in-flight indicator.
        markers_changed || !updates.is_empty()
    }

    fn sync_diagnostics(&mut self) -> bool {
        let error = self.model.workbench().current_error();
        self.bridge.sync(error.as_ref(), &mut self.editor)
    }

    fn switch_dialect(&mut self) {
        let dialect = self.model.workbench().dialect().toggle();
        self.model.switch_dialect(dialect);
        self.editor.set_text(self.model.workbench().source());
        // The reset tree stays empty until the resubmitted example comes back.
        self.model.workbench_mut().reanalyze();
        self.model
            .set_notice(format!("{} example loaded, resubmitted", dialect.label()));
        self.sync_diagnostics();
        info!(dialect:% = dialect; "switched dialect");
    }

    fn save(&mut self) {
        let saved = self.model.save().map(|path| path.map(Path::to_path_buf));
        match saved {
            Ok(Some(path)) => {
                let notice = format!("saved {}", path.display());
                info!(path:% = path.display(); "saved source");
                self.model.set_notice(notice);
            }
            Ok(None) => self.model.set_notice("no file to save to"),
            Err(err) => {
                warn!(error:% = err; "save failed");
                self.model.set_notice(format!("save failed: {err}"));
            }
        }
    }

    fn process_viewer_event(&mut self, event: ViewerEvent) -> bool {
        match event {
            ViewerEvent::EditSource(text) => {
                self.model.clear_notice();
                self.model.workbench_mut().edit_source(text);
                self.sync_diagnostics();
                true
            }
            ViewerEvent::CursorMoved => true,
            ViewerEvent::SelectNode(path) => {
                self.model.select_node(path);
                true
            }
            ViewerEvent::ToggleNodeExpansion(path) => {
                self.model.toggle_node_expansion(path);
                true
            }
            ViewerEvent::CollapseNode(path) => {
                self.model.collapse_node(path);
                true
            }
            ViewerEvent::ExpandNode(path) => {
                self.model.expand_node(&path);
                true
            }
            ViewerEvent::RequestAssist(trigger) => {
                match self.model.workbench_mut().request_assist(&trigger) {
                    Ok(()) => self.model.clear_notice(),
                    Err(rejected) => self.model.set_notice(rejected.to_string()),
                }
                true
            }
            ViewerEvent::NoChange => false,
        }
    }
}
