//! Engine doubles for unit tests.
//!
//! [`CannedEngine`] answers immediately from closures. [`ScriptedEngine`]
//! parks every request until the test replies to it, which lets tests choose
//! the order in which concurrent requests complete.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::protocol::{AnalyzeRequest, AnalyzeResponse, AssistRequest, AssistResponse};
use super::{AnalysisEngine, AssistEngine};
use crate::ast::AstNode;
use crate::error::EngineError;

type AnalyzeFn = dyn Fn(&AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> + Send + Sync;
type AssistFn = dyn Fn(&AssistRequest) -> Result<AssistResponse, EngineError> + Send + Sync;

/// Answers every request synchronously and records what it was asked.
pub struct CannedEngine {
    analyze: Box<AnalyzeFn>,
    assist: Box<AssistFn>,
    pub analyze_log: Mutex<Vec<AnalyzeRequest>>,
    pub assist_log: Mutex<Vec<AssistRequest>>,
}

impl CannedEngine {
    pub fn new<A, S>(analyze: A, assist: S) -> Arc<Self>
    where
        A: Fn(&AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> + Send + Sync + 'static,
        S: Fn(&AssistRequest) -> Result<AssistResponse, EngineError> + Send + Sync + 'static,
    {
        Arc::new(CannedEngine {
            analyze: Box::new(analyze),
            assist: Box::new(assist),
            analyze_log: Mutex::new(Vec::new()),
            assist_log: Mutex::new(Vec::new()),
        })
    }

    /// Every analysis returns `ast`; every assist returns `suggestion`.
    pub fn fixed(ast: AstNode, suggestion: &str) -> Arc<Self> {
        let suggestion = suggestion.to_string();
        CannedEngine::new(
            move |_| {
                Ok(AnalyzeResponse {
                    tokens: Vec::new(),
                    ast: ast.clone(),
                })
            },
            move |_| {
                Ok(AssistResponse {
                    suggestion: suggestion.clone(),
                })
            },
        )
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_log.lock().map(|log| log.len()).unwrap_or_default()
    }

    pub fn assist_count(&self) -> usize {
        self.assist_log.lock().map(|log| log.len()).unwrap_or_default()
    }
}

#[async_trait]
impl AnalysisEngine for CannedEngine {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> {
        if let Ok(mut log) = self.analyze_log.lock() {
            log.push(request.clone());
        }
        (self.analyze)(request)
    }
}

#[async_trait]
impl AssistEngine for CannedEngine {
    async fn assist(&self, request: &AssistRequest) -> Result<AssistResponse, EngineError> {
        if let Ok(mut log) = self.assist_log.lock() {
            log.push(request.clone());
        }
        (self.assist)(request)
    }
}

/// A request waiting for the test to answer it.
pub struct Pending<Req, Resp> {
    pub request: Req,
    reply: oneshot::Sender<Result<Resp, EngineError>>,
}

impl<Req, Resp> Pending<Req, Resp> {
    pub fn reply(self, result: Result<Resp, EngineError>) {
        let _ = self.reply.send(result);
    }
}

pub type PendingAnalysis = Pending<AnalyzeRequest, AnalyzeResponse>;
pub type PendingAssist = Pending<AssistRequest, AssistResponse>;

pub struct ScriptedEngine {
    analyses: mpsc::UnboundedSender<PendingAnalysis>,
    assists: mpsc::UnboundedSender<PendingAssist>,
}

/// Test-side end of a [`ScriptedEngine`].
pub struct Script {
    analyses: mpsc::UnboundedReceiver<PendingAnalysis>,
    assists: mpsc::UnboundedReceiver<PendingAssist>,
}

impl ScriptedEngine {
    pub fn new() -> (Arc<ScriptedEngine>, Script) {
        let (analysis_tx, analysis_rx) = mpsc::unbounded_channel();
        let (assist_tx, assist_rx) = mpsc::unbounded_channel();
        (
            Arc::new(ScriptedEngine {
                analyses: analysis_tx,
                assists: assist_tx,
            }),
            Script {
                analyses: analysis_rx,
                assists: assist_rx,
            },
        )
    }
}

impl Script {
    pub async fn next_analysis(&mut self) -> PendingAnalysis {
        self.analyses
            .recv()
            .await
            .expect("scripted engine dropped")
    }

    pub async fn next_assist(&mut self) -> PendingAssist {
        self.assists.recv().await.expect("scripted engine dropped")
    }

    /// An assist request that is already waiting, if any.
    pub fn try_next_assist(&mut self) -> Option<PendingAssist> {
        self.assists.try_recv().ok()
    }
}

#[async_trait]
impl AnalysisEngine for ScriptedEngine {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> {
        let (reply, answer) = oneshot::channel();
        self.analyses
            .send(Pending {
                request: request.clone(),
                reply,
            })
            .map_err(|_| EngineError::Disconnected)?;
        answer.await.unwrap_or(Err(EngineError::Disconnected))
    }
}

#[async_trait]
impl AssistEngine for ScriptedEngine {
    async fn assist(&self, request: &AssistRequest) -> Result<AssistResponse, EngineError> {
        let (reply, answer) = oneshot::channel();
        self.assists
            .send(Pending {
                request: request.clone(),
                reply,
            })
            .map_err(|_| EngineError::Disconnected)?;
        answer.await.unwrap_or(Err(EngineError::Disconnected))
    }
}
