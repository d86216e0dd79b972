//! Analysis engine collaborators
//!
//! The lexer/parser engine and the repair assistant are remote services. The
//! session controllers only see them through [`AnalysisEngine`] and
//! [`AssistEngine`]; [`HttpEngine`] is the production implementation of both.

pub mod http;
pub mod protocol;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use http::HttpEngine;
pub use protocol::{AnalyzeRequest, AnalyzeResponse, AssistRequest, AssistResponse};

use crate::error::EngineError;

/// Turns source text into tokens and a tree.
#[async_trait]
pub trait AnalysisEngine: Send + Sync + 'static {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, EngineError>;
}

/// Produces a repair suggestion for a located error.
#[async_trait]
pub trait AssistEngine: Send + Sync + 'static {
    async fn assist(&self, request: &AssistRequest) -> Result<AssistResponse, EngineError>;
}
