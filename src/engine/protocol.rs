//! Wire types for the `/analyze` and `/assist` endpoints.

use serde::{Deserialize, Serialize};

use crate::ast::{AstNode, Token};
use crate::dialect::Dialect;

/// Body of an `/analyze` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub code: String,
    pub language: Dialect,
}

/// Body of a successful `/analyze` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub tokens: Vec<Token>,
    pub ast: AstNode,
}

/// Body of an `/assist` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistRequest {
    pub code: String,
    pub language: Dialect,
    pub error_message: String,
    pub error_line: u32,
}

/// Body of a successful `/assist` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistResponse {
    pub suggestion: String,
}
