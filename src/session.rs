//! Session state
//!
//! Two independent controllers, [`AnalysisSession`] and [`AssistSession`],
//! each owning its own state. Neither performs I/O. [`Workbench`] ties them to
//! the engine: it spawns requests on the runtime and applies their completions
//! as messages, one at a time, on the caller's thread.

pub mod analysis;
pub mod assist;
pub mod workbench;

pub use analysis::{AnalysisSession, AnalyzeTicket, ApplyOutcome, Generation};
pub use assist::{AssistRejected, AssistSession, AssistState, AssistTicket, CONNECTIVITY_FAILURE};
pub use workbench::{Completion, Update, UpdateKind, Workbench};
