//! Iteration controller: drives the investigate→deliberate loop.
//!
//! Each round runs both collectors concurrently on disjoint ledgers, waits
//! for both, then runs the balance checker once. The loop ends when the
//! checker terminates or the round limit is hit; either way the trial
//! outcome is handed on to report compilation.

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::{RoundRecord, TrialPhase, TrialSession, TrialTransition};
use crate::checker::{BalanceChecker, CheckAction};
use crate::collector::{EvidenceCollector, EvidenceSummarizer};
use crate::errors::CourtResult;
use crate::lookup::ReferenceLookup;
use crate::state::{SessionState, Side};

/// Configuration for the trial loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Maximum rounds before a forced stop.
    pub max_rounds: u32,
    /// Evidence entries each side needs for a balanced case.
    pub min_entries: usize,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            min_entries: 2,
        }
    }
}

/// Outcome of a completed trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Phase the trial ended in.
    pub terminal_phase: TrialPhase,
    /// Total rounds executed.
    pub rounds_completed: u32,
    pub max_rounds: u32,
    pub rounds: Vec<RoundRecord>,
    pub transitions: Vec<TrialTransition>,
}

impl TrialOutcome {
    /// Whether the checker declared the evidence balanced.
    pub fn is_balanced(&self) -> bool {
        self.terminal_phase == TrialPhase::TerminatedByChecker
    }

    /// Number of collector calls that failed across all rounds.
    pub fn failed_collections(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|r| [r.supporting_status, r.opposing_status])
            .filter(|s| !s.is_success())
            .count()
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        let status = if self.is_balanced() {
            "BALANCED"
        } else {
            "ROUND LIMIT"
        };
        format!(
            "[{}] {}/{} rounds | {} failed collections",
            status,
            self.rounds_completed,
            self.max_rounds,
            self.failed_collections()
        )
    }
}

impl From<TrialSession> for TrialOutcome {
    fn from(session: TrialSession) -> Self {
        Self {
            terminal_phase: session.phase,
            rounds_completed: session.current_round,
            max_rounds: session.max_rounds,
            rounds: session.rounds,
            transitions: session.transitions,
        }
    }
}

/// Runs rounds of {parallel collection, balance check}.
pub struct IterationController {
    config: TrialConfig,
    checker: BalanceChecker,
    supporting: EvidenceCollector,
    opposing: EvidenceCollector,
}

impl Default for IterationController {
    fn default() -> Self {
        Self::new(TrialConfig::default())
    }
}

impl IterationController {
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            checker: BalanceChecker::new(config.min_entries),
            supporting: EvidenceCollector::new(Side::Supporting),
            opposing: EvidenceCollector::new(Side::Opposing),
        }
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// Run the trial to a terminal phase.
    ///
    /// Only a state machine fault returns `Err`; collector failures are
    /// recorded in the round history and the round still counts.
    pub async fn run(
        &self,
        state: &mut SessionState,
        lookup: &dyn ReferenceLookup,
        summarizer: &dyn EvidenceSummarizer,
    ) -> CourtResult<TrialOutcome> {
        let mut trial = TrialSession::new(&state.topic, self.config.max_rounds);
        trial.start()?;

        while !trial.is_complete() {
            let round = trial.current_round;
            let started_at = Utc::now();
            let clock = Instant::now();
            info!(round, max_rounds = trial.max_rounds, "Round started");

            let (topic, pos, neg) = state.ledgers_mut();
            let (supporting_status, opposing_status) = tokio::join!(
                self.supporting.collect(pos, topic, lookup, summarizer),
                self.opposing.collect(neg, topic, lookup, summarizer),
            );

            trial.transition(TrialPhase::Deliberating, "investigation complete")?;
            let check = self.checker.check(state, round);

            trial.record_round(RoundRecord {
                round,
                supporting_status,
                opposing_status,
                action: check.action,
                notes: check.notes,
                duration_ms: clock.elapsed().as_millis() as u64,
                started_at,
            });

            let (next, reason) = match check.action {
                CheckAction::Terminate => (TrialPhase::TerminatedByChecker, "evidence balanced"),
                CheckAction::Continue if !trial.has_rounds_remaining() => {
                    (TrialPhase::TerminatedByLimit, "round limit reached")
                }
                CheckAction::Continue => (TrialPhase::Investigating, "more evidence requested"),
            };
            trial.transition(next, reason)?;
            info!(status = %trial.status_line(), "Round finished");
        }

        let outcome = TrialOutcome::from(trial);
        info!(summary = %outcome.summary_line(), "Trial closed");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::collector::ExtractiveSummarizer;
    use crate::errors::{CourtError, ToolStatus};
    use crate::lookup::ReferenceDocument;

    struct StaticLookup;

    #[async_trait]
    impl ReferenceLookup for StaticLookup {
        async fn load(&self, query: &str) -> CourtResult<Vec<ReferenceDocument>> {
            Ok(vec![ReferenceDocument::new(
                query,
                format!("Facts about {query}. More facts."),
            )])
        }
    }

    struct DownLookup;

    #[async_trait]
    impl ReferenceLookup for DownLookup {
        async fn load(&self, _query: &str) -> CourtResult<Vec<ReferenceDocument>> {
            Err(CourtError::Lookup("unreachable".into()))
        }
    }

    fn opened(topic: &str) -> SessionState {
        let mut state = SessionState::new();
        state.open_case(topic);
        state
    }

    #[tokio::test]
    async fn test_terminates_by_checker_after_two_rounds() {
        let mut state = opened("Ada");
        let outcome = IterationController::default()
            .run(&mut state, &StaticLookup, &ExtractiveSummarizer::default())
            .await
            .unwrap();

        assert_eq!(outcome.terminal_phase, TrialPhase::TerminatedByChecker);
        assert_eq!(outcome.rounds_completed, 2);
        assert_eq!(state.judge_notes.len(), 2);
        assert_eq!(state.supporting.evidence.len(), 2);
        assert!(outcome.is_balanced());
    }

    #[tokio::test]
    async fn test_terminates_by_limit_when_lookups_fail() {
        let mut state = opened("Ada");
        let outcome = IterationController::default()
            .run(&mut state, &DownLookup, &ExtractiveSummarizer::default())
            .await
            .unwrap();

        assert_eq!(outcome.terminal_phase, TrialPhase::TerminatedByLimit);
        assert_eq!(outcome.rounds_completed, 3);
        assert_eq!(outcome.failed_collections(), 6);
        assert_eq!(state.judge_notes.len(), 3);
        assert!(state.supporting.evidence.is_empty());
        assert!(outcome
            .rounds
            .iter()
            .all(|r| r.supporting_status == ToolStatus::Error));
    }

    #[tokio::test]
    async fn test_single_round_limit() {
        let mut state = opened("Ada");
        let config = TrialConfig {
            max_rounds: 1,
            min_entries: 2,
        };
        let outcome = IterationController::new(config)
            .run(&mut state, &StaticLookup, &ExtractiveSummarizer::default())
            .await
            .unwrap();
        assert_eq!(outcome.terminal_phase, TrialPhase::TerminatedByLimit);
        assert_eq!(outcome.rounds_completed, 1);
        assert_eq!(outcome.summary_line(), "[ROUND LIMIT] 1/1 rounds | 0 failed collections");
    }

    #[tokio::test]
    async fn test_transition_trail() {
        let mut state = opened("Ada");
        let outcome = IterationController::default()
            .run(&mut state, &StaticLookup, &ExtractiveSummarizer::default())
            .await
            .unwrap();
        let phases: Vec<TrialPhase> = outcome.transitions.iter().map(|t| t.to).collect();
        assert_eq!(
            phases,
            vec![
                TrialPhase::Investigating,
                TrialPhase::Deliberating,
                TrialPhase::Investigating,
                TrialPhase::Deliberating,
                TrialPhase::TerminatedByChecker,
            ]
        );
    }
}
