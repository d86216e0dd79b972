//! Assist session controller
//!
//! `Idle → Loading → Success | Failure`, back to `Idle` on [`AssistSession::reset`].
//! Only one request may be outstanding, and a request may only start from
//! `Idle`. Every reset opens a new epoch; a response carrying an older epoch is
//! dropped so a late suggestion never reappears after an edit.

use log::{debug, warn};
use thiserror::Error;

use super::analysis::ApplyOutcome;
use crate::dialect::Dialect;
use crate::engine::{AssistRequest, AssistResponse};
use crate::error::EngineError;
use crate::render::AssistTrigger;

/// Shown instead of a suggestion when the assistant could not be reached.
pub const CONNECTIVITY_FAILURE: &str =
    "⚠ Could not connect to the assistant. Make sure the analysis engine is running and reachable.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssistState {
    #[default]
    Idle,
    Loading {
        message: String,
        line: u32,
    },
    Success(String),
    Failure(String),
}

impl AssistState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AssistState::Loading { .. })
    }
}

/// Why a trigger did not start a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssistRejected {
    #[error("an assist request is already in flight")]
    InFlight,
    #[error("the assistant already answered; edit the source to ask again")]
    AlreadyAnswered,
}

/// An assist request stamped with the epoch it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistTicket {
    pub epoch: u64,
    pub request: AssistRequest,
}

#[derive(Debug, Clone, Default)]
pub struct AssistSession {
    state: AssistState,
    epoch: u64,
}

impl AssistSession {
    pub fn new() -> Self {
        AssistSession::default()
    }

    pub fn state(&self) -> &AssistState {
        &self.state
    }

    /// Move to `Loading` and describe the request to send.
    pub fn begin(
        &mut self,
        trigger: &AssistTrigger,
        code: &str,
        dialect: Dialect,
    ) -> Result<AssistTicket, AssistRejected> {
        match self.state {
            AssistState::Idle => {}
            AssistState::Loading { .. } => return Err(AssistRejected::InFlight),
            AssistState::Success(_) | AssistState::Failure(_) => {
                return Err(AssistRejected::AlreadyAnswered)
            }
        }
        self.state = AssistState::Loading {
            message: trigger.message.clone(),
            line: trigger.line,
        };
        debug!(epoch = self.epoch, line = trigger.line; "assist requested");
        Ok(AssistTicket {
            epoch: self.epoch,
            request: AssistRequest {
                code: code.to_string(),
                language: dialect,
                error_message: trigger.message.clone(),
                error_line: trigger.line,
            },
        })
    }

    /// Back to `Idle`, invalidating anything in flight.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = AssistState::Idle;
    }

    pub fn apply(
        &mut self,
        epoch: u64,
        result: Result<AssistResponse, EngineError>,
    ) -> ApplyOutcome {
        if epoch != self.epoch || !self.state.is_loading() {
            debug!(epoch = epoch, latest = self.epoch; "discarding stale assist response");
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(response) => {
                self.state = AssistState::Success(response.suggestion);
                ApplyOutcome::Applied
            }
            Err(err) => {
                warn!(error:% = err; "assist request failed");
                self.state = AssistState::Failure(CONNECTIVITY_FAILURE.to_string());
                ApplyOutcome::Failed
            }
        }
    }
}
