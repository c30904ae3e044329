//! Session state: the single owned context shared by every component.
//!
//! Each component writes only its own fields: collectors write their side's
//! [`SideLedger::evidence`], the balance checker writes queries and
//! [`SessionState::judge_notes`], the resolver writes the candidate list.
//! [`SessionState::ledgers_mut`] hands out disjoint borrows of the two
//! ledgers so both collectors can run in the same round without a lock.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::queue::QueryQueue;

/// Which side of the case an evidence stream argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Defence: achievements, contributions, influence.
    Supporting,
    /// Prosecution: controversies, criticism, negative impact.
    Opposing,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Supporting, Side::Opposing];

    /// Suffixes used to seed the query queue when a case opens.
    pub fn seed_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Supporting => &["achievements", "awards", "legacy"],
            Self::Opposing => &["controversy", "criticism", "scandals"],
        }
    }

    /// Themes the balance checker draws refined queries from.
    pub fn refinement_themes(self) -> &'static [&'static str] {
        match self {
            Self::Supporting => &[
                "reforms",
                "contributions",
                "policy",
                "influence",
                "recognition",
            ],
            Self::Opposing => &[
                "allegations",
                "controversy",
                "criticism",
                "lawsuits",
                "investigations",
            ],
        }
    }

    /// Short key used in logs and snapshots (`pos` / `neg`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Supporting => "pos",
            Self::Opposing => "neg",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supporting => write!(f, "supporting"),
            Self::Opposing => write!(f, "opposing"),
        }
    }
}

/// Append-only list of timestamped entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accumulator {
    entries: Vec<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` stamped with the current local time.
    pub fn append(&mut self, text: &str) {
        self.append_at(text, Local::now());
    }

    /// Append `text` as `"[HH:MM:SS] text"` using the given instant.
    pub fn append_at(&mut self, text: &str, at: DateTime<Local>) {
        self.entries
            .push(format!("[{}] {}", at.format("%H:%M:%S"), text));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Queries and evidence for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLedger {
    pub side: Side,
    pub queries: QueryQueue,
    pub evidence: Accumulator,
}

impl SideLedger {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            queries: QueryQueue::new(),
            evidence: Accumulator::new(),
        }
    }

    /// Fresh ledger seeded with the side's opening queries for `topic`.
    pub fn opened(side: Side, topic: &str) -> Self {
        Self {
            side,
            queries: QueryQueue::seeded(
                side.seed_suffixes()
                    .iter()
                    .map(|suffix| format!("{topic} {suffix}")),
            ),
            evidence: Accumulator::new(),
        }
    }
}

/// All state for one court session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Canonical title of the case.
    pub topic: String,
    pub supporting: SideLedger,
    pub opposing: SideLedger,
    /// One rationale entry per balance check.
    pub judge_notes: Accumulator,
    /// Ranked titles from the last resolution; first is canonical.
    pub official_title_candidates: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Empty state, as created at session start.
    pub fn new() -> Self {
        Self {
            topic: String::new(),
            supporting: SideLedger::new(Side::Supporting),
            opposing: SideLedger::new(Side::Opposing),
            judge_notes: Accumulator::new(),
            official_title_candidates: Vec::new(),
        }
    }

    /// Record the canonical topic and seed both query queues.
    ///
    /// This is the only place queues, evidence and notes are reset.
    pub fn open_case(&mut self, official_topic: &str) {
        self.topic = official_topic.to_string();
        self.supporting = SideLedger::opened(Side::Supporting, official_topic);
        self.opposing = SideLedger::opened(Side::Opposing, official_topic);
        self.judge_notes = Accumulator::new();
        info!(topic = %official_topic, "Case opened");
    }

    pub fn ledger(&self, side: Side) -> &SideLedger {
        match side {
            Side::Supporting => &self.supporting,
            Side::Opposing => &self.opposing,
        }
    }

    pub fn ledger_mut(&mut self, side: Side) -> &mut SideLedger {
        match side {
            Side::Supporting => &mut self.supporting,
            Side::Opposing => &mut self.opposing,
        }
    }

    /// Disjoint borrows for one investigation round: the topic plus both
    /// ledgers.
    pub fn ledgers_mut(&mut self) -> (&str, &mut SideLedger, &mut SideLedger) {
        (&self.topic, &mut self.supporting, &mut self.opposing)
    }

    /// Latest queued query for `side`, falling back to the topic.
    pub fn latest_query(&self, side: Side) -> &str {
        self.ledger(side).queries.latest(&self.topic)
    }

    /// Append a query to `side`'s queue.
    pub fn enqueue_query(&mut self, side: Side, query: impl Into<String>) {
        self.ledger_mut(side).queries.enqueue(query);
    }

    /// Number of evidence entries collected for `side`.
    pub fn evidence_count(&self, side: Side) -> usize {
        self.ledger(side).evidence.len()
    }

    /// Compact status line for logs.
    pub fn status_line(&self) -> String {
        format!(
            "topic={} | pos {}q/{}e | neg {}q/{}e | notes {}",
            self.topic,
            self.supporting.queries.len(),
            self.supporting.evidence.len(),
            self.opposing.queries.len(),
            self.opposing.evidence.len(),
            self.judge_notes.len()
        )
    }
}
