//! Error taxonomy for publish operations.

use reqwest::StatusCode;
use std::path::PathBuf;

/// Failures a publish stage can run into.
///
/// Stages catch these at their own boundary and convert them into a
/// [`crate::report::StageReport`]; raw transport errors never reach the
/// orchestrator.
#[derive(Debug)]
pub enum PublishError {
    /// The local artifact file is missing. Checked before any network call.
    FileNotFound(PathBuf),
    /// The remote API answered with a non-2xx status. The response body is
    /// kept for diagnostics.
    Remote { status: StatusCode, body: String },
    /// Transport-level failure: DNS, timeout, connection reset.
    Network(String),
    /// The tag-suffix search exceeded its safety bound.
    Exhausted { base: String },
}

impl PublishError {
    /// Server-provided response body, when one was captured.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            PublishError::Remote { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::FileNotFound(path) => {
                write!(f, "File does not exist: '{}'", path.display())
            }
            PublishError::Remote { status, .. } => {
                write!(f, "Remote API returned {}", status)
            }
            PublishError::Network(msg) => {
                write!(f, "Network error: {}", msg)
            }
            PublishError::Exhausted { base } => {
                write!(f, "No free tag suffix for '{}' within 1000 attempts", base)
            }
        }
    }
}

impl std::error::Error for PublishError {}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Network(err.to_string())
    }
}
