//! Balance checker: decides whether the evidence is sufficient.
//!
//! Re-evaluated once per round with no memory beyond what the session state
//! shows. Every invocation appends exactly one note to `judge_notes`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::{SessionState, Side};

/// Note recorded when both sides meet the threshold.
pub const SUFFICIENT_NOTE: &str = "evidence sufficient";

/// What the controller should do after a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckAction {
    /// Evidence is unbalanced; run another round.
    Continue,
    /// Evidence is balanced; stop the loop.
    Terminate,
}

impl std::fmt::Display for CheckAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Terminate => write!(f, "terminate"),
        }
    }
}

/// Outcome of one balance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub action: CheckAction,
    /// The rationale appended to `judge_notes` (without timestamp).
    pub notes: String,
    /// Queries enqueued by this check, per side.
    pub requested: Vec<(Side, String)>,
}

/// Balance policy: every side needs `min_entries` evidence entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChecker {
    pub min_entries: usize,
}

impl Default for BalanceChecker {
    fn default() -> Self {
        Self { min_entries: 2 }
    }
}

impl BalanceChecker {
    pub fn new(min_entries: usize) -> Self {
        Self { min_entries }
    }

    /// Sides below the threshold, in fixed order.
    pub fn deficient_sides(&self, state: &SessionState) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|side| state.evidence_count(*side) < self.min_entries)
            .collect()
    }

    /// Inspect the state, enqueue refined queries if needed, record a note.
    pub fn check(&self, state: &mut SessionState, round: u32) -> CheckOutcome {
        let deficient = self.deficient_sides(state);

        if deficient.is_empty() {
            state.judge_notes.append(SUFFICIENT_NOTE);
            info!(
                round,
                pos = state.evidence_count(Side::Supporting),
                neg = state.evidence_count(Side::Opposing),
                "Evidence balanced"
            );
            return CheckOutcome {
                action: CheckAction::Terminate,
                notes: SUFFICIENT_NOTE.to_string(),
                requested: Vec::new(),
            };
        }

        let mut requested = Vec::with_capacity(deficient.len());
        let mut reasons = Vec::with_capacity(deficient.len());
        for side in deficient {
            let have = state.evidence_count(side);
            let query = refine_query(state, side, round);
            state.enqueue_query(side, query.clone());
            reasons.push(format!(
                "{side} evidence insufficient ({have}/{}), requested '{query}'",
                self.min_entries
            ));
            requested.push((side, query));
        }

        let notes = format!("round {round}: {}", reasons.join("; "));
        state.judge_notes.append(&notes);
        info!(round, requests = requested.len(), "Evidence unbalanced; refining queries");

        CheckOutcome {
            action: CheckAction::Continue,
            notes,
            requested,
        }
    }
}

/// Pick a refined query for `side` that is thematically new.
///
/// Takes the first theme not yet queued; once all are used, cycles the
/// themes with a round suffix so the lookup text still changes.
fn refine_query(state: &SessionState, side: Side, round: u32) -> String {
    let topic = &state.topic;
    let queue = &state.ledger(side).queries;
    let themes = side.refinement_themes();

    themes
        .iter()
        .map(|theme| format!("{topic} {theme}"))
        .find(|candidate| !queue.contains(candidate))
        .unwrap_or_else(|| {
            let theme = themes[queue.len() % themes.len()];
            format!("{topic} {theme} round {round}")
        })
}
