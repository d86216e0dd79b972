//! # structura
//!
//! A terminal workbench for flex scanner and bison grammar sources. Text is
//! sent to a remote analysis engine on every edit; the tokens and the syntax
//! tree it returns are rendered next to the editor, and the first syntax
//! error in the tree is mirrored as an editor diagnostic. Error panels can
//! ask the engine's assistant for a repair suggestion.
//!
//! The pieces, bottom up:
//!
//! - [`ast`] and [`dialect`]: the tree the engine returns and the two grammars
//! - [`locate`]: first-error search that drives diagnostics
//! - [`render`]: tree to visual tree
//! - [`engine`]: the engine seam and its HTTP client
//! - [`session`]: analysis and assist controllers, coordinated by the workbench
//! - [`diagnostics`]: keeps editor markers in step with the located error
//! - [`viewer`], [`report`], [`cli`]: the interactive and print front ends

pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod locate;
pub mod render;
pub mod report;
pub mod session;
pub mod viewer;

pub use dialect::Dialect;
pub use error::{EngineError, StructuraError};
