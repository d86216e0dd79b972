//! Interactive terminal viewer
//!
//! Editor on the left, analysis tree on the right. Each keystroke in the
//! editor is sent to the engine; responses are applied on the next tick and
//! the tree, token strip and diagnostic markers follow.

pub mod app;
pub mod editor;
pub mod model;
pub mod runner;
pub mod theme;
pub mod treeviewer;
pub mod ui;
#[allow(clippy::module_inception)]
pub mod viewer;


pub use app::App;
pub use model::Model;
pub use runner::run_viewer;
