//! Verdict report: the six-section document written at the end of a trial.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CourtResult;
use crate::state::{SessionState, Side};
use crate::trial::{TrialOutcome, TrialPhase};

/// Section headings, in the fixed order they are rendered.
pub const SECTION_TITLES: [&str; 6] = [
    "Introduction",
    "Supporting Evidence",
    "Opposing Evidence",
    "Deliberation Notes",
    "Analysis",
    "Verdict",
];

/// Which way the evidence leans, by entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaning {
    Supporting,
    Opposing,
    Even,
}

impl Leaning {
    fn from_counts(pos: usize, neg: usize) -> Self {
        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Self::Supporting,
            std::cmp::Ordering::Less => Self::Opposing,
            std::cmp::Ordering::Equal => Self::Even,
        }
    }
}

/// Compiled report, section by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReport {
    pub topic: String,
    pub introduction: String,
    pub supporting: Vec<String>,
    pub opposing: Vec<String>,
    pub deliberation: String,
    pub analysis: String,
    pub verdict: String,
    pub leaning: Leaning,
}

impl VerdictReport {
    /// Replace the default analysis and verdict with drafted prose.
    ///
    /// Blank drafts are ignored so the deterministic text survives.
    pub fn with_opinion(mut self, analysis: &str, verdict: &str) -> Self {
        if !analysis.trim().is_empty() {
            self.analysis = analysis.trim().to_string();
        }
        if !verdict.trim().is_empty() {
            self.verdict = verdict.trim().to_string();
        }
        self
    }

    /// Render as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "MOCK COURT VERDICT: {}", self.topic);
        let _ = writeln!(out, "{}", "=".repeat(60));

        let bodies = [
            self.introduction.clone(),
            render_entries(&self.supporting),
            render_entries(&self.opposing),
            self.deliberation.clone(),
            self.analysis.clone(),
            self.verdict.clone(),
        ];
        for (i, (title, body)) in SECTION_TITLES.iter().zip(bodies).enumerate() {
            let _ = writeln!(out, "\n{}. {}", i + 1, title);
            let _ = writeln!(out, "{}", "-".repeat(title.len() + 3));
            let _ = writeln!(out, "{}", body.trim_end());
        }
        out
    }
}

fn render_entries(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No evidence was entered for this side.".to_string();
    }
    entries.join("\n\n")
}

/// Drafted prose for the closing sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    pub analysis: String,
    pub verdict: String,
}

/// Writes analysis and verdict prose from a compiled report (the clerk).
#[async_trait]
pub trait OpinionDrafter: Send + Sync {
    async fn draft(&self, report: &VerdictReport) -> CourtResult<Opinion>;
}

/// Builds a [`VerdictReport`] from the final session state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportCompiler;

impl ReportCompiler {
    pub fn compile(&self, state: &SessionState, outcome: &TrialOutcome) -> VerdictReport {
        let pos = state.evidence_count(Side::Supporting);
        let neg = state.evidence_count(Side::Opposing);
        let leaning = Leaning::from_counts(pos, neg);

        VerdictReport {
            topic: state.topic.clone(),
            introduction: introduction(state, outcome),
            supporting: state.supporting.evidence.entries().to_vec(),
            opposing: state.opposing.evidence.entries().to_vec(),
            deliberation: deliberation(state, pos, neg),
            analysis: analysis(outcome, pos, neg),
            verdict: verdict(&state.topic, outcome, leaning),
            leaning,
        }
    }
}

fn introduction(state: &SessionState, outcome: &TrialOutcome) -> String {
    let closing = match outcome.terminal_phase {
        TrialPhase::TerminatedByChecker => "the court found the evidence sufficient",
        _ => "the round limit was reached",
    };
    format!(
        "This mock court examined \"{}\" using public reference material. \
         Evidence was gathered over {} of at most {} rounds, after which {}.",
        state.topic, outcome.rounds_completed, outcome.max_rounds, closing
    )
}

fn deliberation(state: &SessionState, pos: usize, neg: usize) -> String {
    let mut out = String::new();
    for note in state.judge_notes.entries() {
        let _ = writeln!(out, "- {note}");
    }
    let _ = write!(
        out,
        "\nWeighing: {pos} supporting entr{} against {neg} opposing entr{}.",
        if pos == 1 { "y" } else { "ies" },
        if neg == 1 { "y" } else { "ies" },
    );
    out
}

fn analysis(outcome: &TrialOutcome, pos: usize, neg: usize) -> String {
    let failed = outcome.failed_collections();
    let mut text = if pos == 0 && neg == 0 {
        "Neither side produced admissible evidence, so no substantive analysis is possible."
            .to_string()
    } else {
        format!(
            "The record holds {pos} supporting and {neg} opposing entries drawn only from \
             retrieved reference text."
        )
    };
    if failed > 0 {
        let _ = write!(
            text,
            " {failed} lookup{} returned nothing usable and contributed no evidence.",
            if failed == 1 { "" } else { "s" }
        );
    }
    if !outcome.is_balanced() {
        text.push_str(" The record is incomplete because the trial stopped at its round limit.");
    }
    text
}

fn verdict(topic: &str, outcome: &TrialOutcome, leaning: Leaning) -> String {
    let weight = match leaning {
        Leaning::Supporting => "the supporting case carries more documented weight",
        Leaning::Opposing => "the opposing case carries more documented weight",
        Leaning::Even => "both sides carry comparable documented weight",
    };
    let qualifier = if outcome.is_balanced() {
        "On a balanced record"
    } else {
        "On a provisional record"
    };
    format!("{qualifier}, the court finds that for \"{topic}\" {weight}.")
}
