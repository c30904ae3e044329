//! Mock Court Coordination Library
//!
//! This library provides the deterministic core of a mock-court session:
//! - Title resolution against a reference lookup ("first ranked wins")
//! - Per-side evidence collection into append-only accumulators
//! - A balance checker that requests refined searches until both sides
//!   have enough evidence
//! - A bounded trial state machine that runs both collectors in parallel
//!   each round
//! - Report compilation and verdict file persistence
//!
//! External collaborators (reference lookup, summarizer, clerk) are traits;
//! the `court-agents` crate provides network-backed implementations.
//!
//! # Session Flow
//!
//! ```text
//! resolve(raw) → open_case(title) → trial loop (≤ 3 rounds) → compile → persist
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod checker;
pub mod collector;
pub mod errors;
pub mod lookup;
pub mod queue;
pub mod report;
pub mod resolver;
pub mod session;
pub mod state;
pub mod trial;
pub mod verdict;

pub use checker::{BalanceChecker, CheckAction, CheckOutcome, SUFFICIENT_NOTE};
pub use collector::{EvidenceBrief, EvidenceCollector, EvidenceSummarizer, ExtractiveSummarizer};
pub use errors::{CourtError, CourtResult, ToolStatus};
pub use lookup::{render_documents, ReferenceDocument, ReferenceLookup};
pub use queue::QueryQueue;
pub use report::{Leaning, Opinion, OpinionDrafter, ReportCompiler, VerdictReport, SECTION_TITLES};
pub use resolver::{resolve, Resolution};
pub use session::{SessionCoordinator, SessionSummary};
pub use state::{Accumulator, SessionState, Side, SideLedger};
pub use trial::{
    IterationController, RoundRecord, TrialConfig, TrialOutcome, TrialPhase, TrialSession,
    TrialTransition,
};
pub use verdict::{sanitize_topic, verdict_filename, PersistOutcome, VerdictWriter, OUTPUT_DIR_NAME};
