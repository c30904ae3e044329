//! Trial loop: the bounded investigate/deliberate cycle.
//!
//! # Trial Flow
//!
//! ```text
//! Idle → Investigating(round) → Deliberating → [balanced?]
//!           ▲                                     │
//!           │                                     ├─ Yes → TerminatedByChecker
//!           └──── No, rounds left ────────────────┤
//!                                                 └─ No, max rounds → TerminatedByLimit
//! ```
//!
//! Both terminal phases hand off to report compilation; hitting the round
//! limit is a safety stop, not an error.

pub mod controller;
pub mod state;

pub use controller::{IterationController, TrialConfig, TrialOutcome};
pub use state::{RoundRecord, TrialPhase, TrialSession, TrialTransition};
