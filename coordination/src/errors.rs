//! Error taxonomy for a court session.
//!
//! Component boundaries never let these escape a session: the resolver maps
//! them to a degraded [`Resolution`](crate::resolver::Resolution), collectors
//! map them to [`ToolStatus::Error`], and persistence maps them to
//! [`PersistOutcome::Failed`](crate::verdict::PersistOutcome).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trial::TrialPhase;

/// Errors raised inside the court core.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CourtError {
    /// Topic input was blank after trimming.
    #[error("topic input is empty")]
    EmptyInput,

    /// External reference lookup failed.
    #[error("reference lookup failed: {0}")]
    Lookup(String),

    /// Verdict document could not be written.
    #[error("verdict write failed: {0}")]
    Write(String),

    /// Language generation (summary or clerk draft) failed.
    #[error("generation failed: {0}")]
    Generation(String),

    /// The trial state machine rejected a phase change.
    #[error("invalid transition {from} → {to}: {reason}")]
    Transition {
        from: TrialPhase,
        to: TrialPhase,
        reason: String,
    },
}

impl CourtError {
    /// Whether the session can continue after this error.
    ///
    /// Only a blank topic and a broken state machine stop a session.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Lookup(_) | Self::Write(_) | Self::Generation(_))
    }
}

/// Result alias for court operations.
pub type CourtResult<T> = Result<T, CourtError>;

/// Status payload returned by tool-like operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
}

impl ToolStatus {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}
