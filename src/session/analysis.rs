//! Analysis session controller
//!
//! Owns the dialect, the source text and the last accepted analysis. Network
//! I/O happens elsewhere: [`AnalysisSession::edit_source`] hands back a ticket
//! describing the request to send, and [`AnalysisSession::apply`] takes the
//! result when it comes back.

use log::{debug, warn};

use crate::ast::{AstNode, Token};
use crate::dialect::Dialect;
use crate::engine::{AnalyzeRequest, AnalyzeResponse};
use crate::error::EngineError;
use crate::locate::{find_first_error, LocatedError};

/// Monotonic request counter. Only the latest generation may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

/// An analysis request stamped with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeTicket {
    pub generation: Generation,
    pub request: AnalyzeRequest,
}

/// What happened to a completion handed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The completion replaced the controller's state.
    Applied,
    /// A newer request was issued since; the completion was dropped.
    Stale,
    /// The request itself failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    dialect: Dialect,
    source: String,
    tokens: Vec<Token>,
    ast: Option<AstNode>,
    generation: Generation,
}

impl AnalysisSession {
    /// A session showing the dialect's example text, not yet analyzed.
    pub fn new(dialect: Dialect) -> Self {
        AnalysisSession::with_source(dialect, dialect.example_source())
    }

    pub fn with_source(dialect: Dialect, source: impl Into<String>) -> Self {
        AnalysisSession {
            dialect,
            source: source.into(),
            tokens: Vec::new(),
            ast: None,
            generation: Generation::default(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn ast(&self) -> Option<&AstNode> {
        self.ast.as_ref()
    }

    /// First error in the current tree. Recomputed on every call.
    pub fn current_error(&self) -> Option<LocatedError> {
        self.ast.as_ref().and_then(find_first_error)
    }

    /// Reset to the example text of `dialect`, dropping the analysis.
    ///
    /// Advances the generation so no in-flight response can land afterwards.
    pub fn switch_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
        self.source = dialect.example_source().to_string();
        self.tokens.clear();
        self.ast = None;
        self.generation = self.generation.next();
        debug!(dialect:% = dialect, generation = self.generation.value(); "dialect switched");
    }

    /// Store `text` and issue a request for it.
    pub fn edit_source(&mut self, text: impl Into<String>) -> AnalyzeTicket {
        self.source = text.into();
        self.submit()
    }

    /// Issue a request for the current text without changing it.
    pub fn submit(&mut self) -> AnalyzeTicket {
        self.generation = self.generation.next();
        debug!(
            generation = self.generation.value(),
            bytes = self.source.len();
            "analysis submitted"
        );
        AnalyzeTicket {
            generation: self.generation,
            request: AnalyzeRequest {
                code: self.source.clone(),
                language: self.dialect,
            },
        }
    }

    /// Apply the result of the request issued under `generation`.
    ///
    /// Failures leave tokens and tree untouched.
    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<AnalyzeResponse, EngineError>,
    ) -> ApplyOutcome {
        if generation != self.generation {
            debug!(
                generation = generation.value(),
                latest = self.generation.value();
                "discarding stale analysis"
            );
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(response) => {
                self.tokens = response.tokens;
                self.ast = Some(response.ast);
                ApplyOutcome::Applied
            }
            Err(err) => {
                warn!(generation = generation.value(), error:% = err; "analysis failed");
                ApplyOutcome::Failed
            }
        }
    }
}
