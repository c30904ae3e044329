//! Trial state machine: phases, transitions, and round tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checker::CheckAction;
use crate::errors::{CourtError, CourtResult, ToolStatus};

/// Phase of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialPhase {
    /// Trial created but not started.
    Idle,
    /// Both collectors are gathering evidence for the current round.
    Investigating,
    /// Balance checker is weighing the evidence.
    Deliberating,
    /// Checker found the evidence balanced.
    TerminatedByChecker,
    /// Round limit reached without a balanced verdict.
    TerminatedByLimit,
}

impl TrialPhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::TerminatedByChecker | Self::TerminatedByLimit)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [TrialPhase] {
        match self {
            Self::Idle => &[Self::Investigating],
            Self::Investigating => &[Self::Deliberating],
            Self::Deliberating => &[
                Self::Investigating,
                Self::TerminatedByChecker,
                Self::TerminatedByLimit,
            ],
            Self::TerminatedByChecker | Self::TerminatedByLimit => &[],
        }
    }
}

impl std::fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Investigating => write!(f, "investigating"),
            Self::Deliberating => write!(f, "deliberating"),
            Self::TerminatedByChecker => write!(f, "terminated_by_checker"),
            Self::TerminatedByLimit => write!(f, "terminated_by_limit"),
        }
    }
}

/// Record of a single round (parallel collection + balance check).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-indexed).
    pub round: u32,
    pub supporting_status: ToolStatus,
    pub opposing_status: ToolStatus,
    /// Checker decision at the end of the round.
    pub action: CheckAction,
    /// Checker rationale.
    pub notes: String,
    /// Round duration in milliseconds.
    pub duration_ms: u64,
    /// When this round started.
    pub started_at: DateTime<Utc>,
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialTransition {
    pub from: TrialPhase,
    pub to: TrialPhase,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// A trial tracking phase and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSession {
    /// Topic under trial.
    pub topic: String,
    /// Current phase.
    pub phase: TrialPhase,
    /// Current round number; 0 before the trial starts.
    pub current_round: u32,
    /// Maximum rounds allowed.
    pub max_rounds: u32,
    /// Round history.
    pub rounds: Vec<RoundRecord>,
    /// Transition history.
    pub transitions: Vec<TrialTransition>,
    pub created_at: DateTime<Utc>,
}

impl TrialSession {
    /// Create a new trial. `max_rounds` is raised to at least 1.
    pub fn new(topic: &str, max_rounds: u32) -> Self {
        Self {
            topic: topic.to_string(),
            phase: TrialPhase::Idle,
            current_round: 0,
            max_rounds: max_rounds.max(1),
            rounds: Vec::new(),
            transitions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Transition to a new phase with a reason.
    pub fn transition(&mut self, to: TrialPhase, reason: &str) -> CourtResult<()> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(CourtError::Transition {
                from: self.phase,
                to,
                reason: format!(
                    "not a valid transition (allowed: {:?})",
                    self.phase.valid_transitions()
                ),
            });
        }
        if to == TrialPhase::Investigating && !self.has_rounds_remaining() {
            return Err(CourtError::Transition {
                from: self.phase,
                to,
                reason: format!("round limit {} exhausted", self.max_rounds),
            });
        }

        self.transitions.push(TrialTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;

        if to == TrialPhase::Investigating {
            self.current_round += 1;
        }

        Ok(())
    }

    /// Start the trial (Idle → Investigating, round 1).
    pub fn start(&mut self) -> CourtResult<()> {
        self.transition(TrialPhase::Investigating, "trial opened")
    }

    pub fn record_round(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Whether another round may start.
    pub fn has_rounds_remaining(&self) -> bool {
        self.current_round < self.max_rounds
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | {} rounds recorded | topic={}",
            self.phase,
            self.current_round,
            self.max_rounds,
            self.rounds.len(),
            self.topic
        )
    }
}
