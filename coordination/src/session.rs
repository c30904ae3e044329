//! Session coordinator: the entry point for one court session.
//!
//! resolve title → open case → trial loop → compile report → persist.
//! Nothing after title resolution can abort the session: every later
//! failure degrades into a thinner report.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collector::EvidenceSummarizer;
use crate::errors::CourtResult;
use crate::lookup::ReferenceLookup;
use crate::report::{OpinionDrafter, ReportCompiler};
use crate::resolver::{resolve, Resolution};
use crate::state::SessionState;
use crate::trial::{IterationController, TrialConfig, TrialOutcome};
use crate::verdict::{PersistOutcome, VerdictWriter};

/// Everything a finished session produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub resolution: Resolution,
    pub outcome: TrialOutcome,
    pub persisted: PersistOutcome,
    /// Final session state, before it is discarded.
    pub state: SessionState,
}

/// Wires the collaborators for a session.
pub struct SessionCoordinator<'a> {
    lookup: &'a dyn ReferenceLookup,
    summarizer: &'a dyn EvidenceSummarizer,
    drafter: Option<&'a dyn OpinionDrafter>,
    writer: VerdictWriter,
    controller: IterationController,
}

impl<'a> SessionCoordinator<'a> {
    pub fn new(
        lookup: &'a dyn ReferenceLookup,
        summarizer: &'a dyn EvidenceSummarizer,
        writer: VerdictWriter,
    ) -> Self {
        Self {
            lookup,
            summarizer,
            drafter: None,
            writer,
            controller: IterationController::default(),
        }
    }

    /// Let a clerk draft the analysis and verdict sections.
    pub fn with_drafter(mut self, drafter: &'a dyn OpinionDrafter) -> Self {
        self.drafter = Some(drafter);
        self
    }

    pub fn with_trial_config(mut self, config: TrialConfig) -> Self {
        self.controller = IterationController::new(config);
        self
    }

    /// Run a full session for `raw_input`.
    ///
    /// Every degradable failure (lookup, generation, write) is absorbed and
    /// the session still produces a report. The one exception is a blank
    /// topic: with no title there is no case to open, so this returns
    /// `Err(EmptyInput)` and writes no verdict file.
    pub async fn run(&self, raw_input: &str) -> CourtResult<SessionSummary> {
        let mut state = SessionState::new();

        let resolution = resolve(&mut state, self.lookup, raw_input).await;
        if let Some(e) = resolution.error.as_ref().filter(|e| !e.is_degradable()) {
            return Err(e.clone());
        }
        state.open_case(&resolution.title);

        let outcome = self
            .controller
            .run(&mut state, self.lookup, self.summarizer)
            .await?;

        let mut report = ReportCompiler.compile(&state, &outcome);
        if let Some(drafter) = self.drafter {
            match drafter.draft(&report).await {
                Ok(opinion) => report = report.with_opinion(&opinion.analysis, &opinion.verdict),
                Err(e) => warn!(error = %e, "Clerk draft failed; keeping compiled opinion"),
            }
        }

        let persisted = self.writer.persist(&state.topic, &report.render());
        info!(
            topic = %state.topic,
            rounds = outcome.rounds_completed,
            saved = persisted.is_saved(),
            "Court session adjourned"
        );

        Ok(SessionSummary {
            resolution,
            outcome,
            persisted,
            state,
        })
    }
}
