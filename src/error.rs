//! Error types
//!
//! [`EngineError`] covers a failed round trip to the analysis engine.
//! [`StructuraError`] is what the binary reports before exiting; nothing in
//! the session core produces it.

use std::io;

use thiserror::Error;

/// A request to the analysis engine that could not be completed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine answered with HTTP status {0}")]
    Status(u16),

    #[error("malformed engine response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid engine url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("engine went away before answering")]
    Disconnected,
}

/// Top-level error for the `structura` binary.
#[derive(Debug, Error)]
pub enum StructuraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("analysis failed: {0}")]
    Analysis(String),
}
