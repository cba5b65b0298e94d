//! Thin per-stage result type.
//!
//! Every publish stage returns a [`StageReport`] instead of propagating
//! errors; presentation of the message and any captured response body is
//! handled centrally by the orchestrator.

use crate::error::PublishError;

/// Terminal state of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    Failed,
}

/// What a stage has to say for itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub outcome: StageOutcome,
    pub message: String,
    /// Server-provided error body, when one was captured.
    pub response_body: Option<String>,
}

impl StageReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: StageOutcome::Success,
            message: message.into(),
            response_body: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: StageOutcome::Failed,
            message: message.into(),
            response_body: None,
        }
    }

    /// Builds a failure report from a caught error, keeping the response
    /// body around for diagnostics.
    pub fn from_error(context: &str, err: &PublishError) -> Self {
        Self {
            outcome: StageOutcome::Failed,
            message: format!("{}: {}", context, err),
            response_body: err.response_body().map(str::to_string),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == StageOutcome::Success
    }
}
