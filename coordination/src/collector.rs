//! Evidence collectors: one per side.
//!
//! A collector reads its side's latest query, performs exactly one lookup,
//! asks the summarizer to condense only what came back, and appends the
//! summary to its side's accumulator. Failures are reported as
//! [`ToolStatus::Error`] and leave the accumulator untouched.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::{CourtError, CourtResult, ToolStatus};
use crate::lookup::{render_documents, ReferenceLookup};
use crate::state::{Side, SideLedger};

/// Everything a summarizer is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceBrief {
    pub side: Side,
    pub topic: String,
    pub query: String,
    /// Rendered lookup output. The summary must be grounded in this alone.
    pub source_text: String,
}

/// Condenses fetched reference text into an evidence entry.
#[async_trait]
pub trait EvidenceSummarizer: Send + Sync {
    async fn summarize(&self, brief: &EvidenceBrief) -> CourtResult<String>;
}

/// Summarizer that quotes the leading sentences of each page as bullets.
///
/// Needs no model, so it backs offline runs and tests. Output is always a
/// substring selection of the source text.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    /// Upper bound on bullets per brief.
    pub max_bullets: usize,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self { max_bullets: 6 }
    }
}

#[async_trait]
impl EvidenceSummarizer for ExtractiveSummarizer {
    async fn summarize(&self, brief: &EvidenceBrief) -> CourtResult<String> {
        let bullets: Vec<String> = brief
            .source_text
            .lines()
            .filter_map(|line| line.strip_prefix("Summary: "))
            .flat_map(|body| body.split_terminator(". ").take(2))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(self.max_bullets)
            .map(|s| format!("- {}", s.trim_end_matches('.')))
            .collect();

        if bullets.is_empty() {
            return Err(CourtError::Generation(format!(
                "nothing to extract for query '{}'",
                brief.query
            )));
        }
        Ok(bullets.join("\n"))
    }
}

/// Collector bound to one side of the case.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceCollector {
    side: Side,
}

impl EvidenceCollector {
    pub fn new(side: Side) -> Self {
        Self { side }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Run one collection against `ledger`, which must belong to this side.
    pub async fn collect(
        &self,
        ledger: &mut SideLedger,
        topic: &str,
        lookup: &dyn ReferenceLookup,
        summarizer: &dyn EvidenceSummarizer,
    ) -> ToolStatus {
        debug_assert_eq!(ledger.side, self.side);
        let query = ledger.queries.latest(topic).to_string();

        match self.gather(&query, topic, lookup, summarizer).await {
            Ok(summary) => {
                ledger.evidence.append(&summary);
                info!(
                    side = %self.side,
                    query = %query,
                    entries = ledger.evidence.len(),
                    "Evidence recorded"
                );
                ToolStatus::Success
            }
            Err(e) => {
                warn!(side = %self.side, query = %query, error = %e, "Evidence collection failed");
                ToolStatus::Error
            }
        }
    }

    async fn gather(
        &self,
        query: &str,
        topic: &str,
        lookup: &dyn ReferenceLookup,
        summarizer: &dyn EvidenceSummarizer,
    ) -> CourtResult<String> {
        let docs = lookup.load(query).await?;
        let source_text = render_documents(&docs)
            .ok_or_else(|| CourtError::Lookup(format!("no results for '{query}'")))?;

        let brief = EvidenceBrief {
            side: self.side,
            topic: topic.to_string(),
            query: query.to_string(),
            source_text,
        };
        let summary = summarizer.summarize(&brief).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(CourtError::Generation("empty summary".into()));
        }
        Ok(summary.to_string())
    }
}
