//! Session coordination
//!
//! The workbench is the only place where the controllers meet the engine.
//! Requests run as tasks on a tokio runtime and report back through an
//! unbounded channel; completions are applied on whichever thread drains the
//! channel, so the controllers themselves never see concurrent mutation.

use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::analysis::{AnalysisSession, AnalyzeTicket, ApplyOutcome, Generation};
use super::assist::{AssistRejected, AssistSession, AssistState, AssistTicket};
use crate::dialect::Dialect;
use crate::engine::{AnalysisEngine, AnalyzeResponse, AssistEngine, AssistResponse};
use crate::error::EngineError;
use crate::locate::LocatedError;
use crate::render::{render_with_assist, AssistTrigger, VisualNode};

/// A finished request on its way back to the controllers.
#[derive(Debug)]
pub enum Completion {
    Analysis {
        generation: Generation,
        result: Result<AnalyzeResponse, EngineError>,
    },
    Assist {
        epoch: u64,
        result: Result<AssistResponse, EngineError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Analysis,
    Assist,
}

/// Result of applying one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub kind: UpdateKind,
    pub outcome: ApplyOutcome,
}

impl Update {
    /// Whether anything visible changed.
    ///
    /// A failed analysis keeps the old tree; a failed assist shows a message.
    pub fn changed(&self) -> bool {
        match self.outcome {
            ApplyOutcome::Applied => true,
            ApplyOutcome::Failed => self.kind == UpdateKind::Assist,
            ApplyOutcome::Stale => false,
        }
    }
}

pub struct Workbench {
    analysis: AnalysisSession,
    assist: AssistSession,
    analyzer: Arc<dyn AnalysisEngine>,
    assistant: Arc<dyn AssistEngine>,
    runtime: Handle,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Workbench {
    pub fn new(
        analyzer: Arc<dyn AnalysisEngine>,
        assistant: Arc<dyn AssistEngine>,
        dialect: Dialect,
        runtime: Handle,
    ) -> Self {
        Workbench::with_session(analyzer, assistant, AnalysisSession::new(dialect), runtime)
    }

    pub fn with_session(
        analyzer: Arc<dyn AnalysisEngine>,
        assistant: Arc<dyn AssistEngine>,
        analysis: AnalysisSession,
        runtime: Handle,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Workbench {
            analysis,
            assist: AssistSession::new(),
            analyzer,
            assistant,
            runtime,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn analysis(&self) -> &AnalysisSession {
        &self.analysis
    }

    pub fn assist_state(&self) -> &AssistState {
        self.assist.state()
    }

    pub fn dialect(&self) -> Dialect {
        self.analysis.dialect()
    }

    pub fn source(&self) -> &str {
        self.analysis.source()
    }

    pub fn current_error(&self) -> Option<LocatedError> {
        self.analysis.current_error()
    }

    /// Rendered form of the current tree, if there is one.
    pub fn visual_tree(&self) -> Option<VisualNode> {
        self.analysis
            .ast()
            .map(|ast| render_with_assist(ast, self.assist.state()))
    }

    /// Requests spawned but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Reset both controllers for `dialect`. Sends nothing.
    pub fn switch_dialect(&mut self, dialect: Dialect) {
        self.analysis.switch_dialect(dialect);
        self.assist.reset();
    }

    /// Store the new text, drop any suggestion and submit it for analysis.
    pub fn edit_source(&mut self, text: impl Into<String>) {
        let ticket = self.analysis.edit_source(text);
        self.assist.reset();
        self.spawn_analysis(ticket);
    }

    /// Submit the current text again.
    pub fn reanalyze(&mut self) {
        let ticket = self.analysis.submit();
        self.spawn_analysis(ticket);
    }

    pub fn request_assist(&mut self, trigger: &AssistTrigger) -> Result<(), AssistRejected> {
        let ticket = self
            .assist
            .begin(trigger, self.analysis.source(), self.analysis.dialect())?;
        self.spawn_assist(ticket);
        Ok(())
    }

    /// Apply every completion that has already arrived.
    pub fn poll_completions(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            updates.push(self.apply(completion));
        }
        updates
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` straight away when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Update> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    fn apply(&mut self, completion: Completion) -> Update {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Analysis { generation, result } => Update {
                kind: UpdateKind::Analysis,
                outcome: self.analysis.apply(generation, result),
            },
            Completion::Assist { epoch, result } => Update {
                kind: UpdateKind::Assist,
                outcome: self.assist.apply(epoch, result),
            },
        }
    }

    fn spawn_analysis(&mut self, ticket: AnalyzeTicket) {
        let engine = Arc::clone(&self.analyzer);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let AnalyzeTicket {
                generation,
                request,
            } = ticket;
            let result = engine.analyze(&request).await;
            if tx.send(Completion::Analysis { generation, result }).is_err() {
                debug!(generation = generation.value(); "workbench gone, dropping analysis");
            }
        });
    }

    fn spawn_assist(&mut self, ticket: AssistTicket) {
        let engine = Arc::clone(&self.assistant);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let AssistTicket { epoch, request } = ticket;
            let result = engine.assist(&request).await;
            if tx.send(Completion::Assist { epoch, result }).is_err() {
                debug!(epoch = epoch; "workbench gone, dropping assist response");
            }
        });
    }
}
