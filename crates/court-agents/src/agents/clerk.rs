//! Clerk agent: drafts the analysis and verdict sections.

use async_trait::async_trait;
use coordination::{CourtError, CourtResult, Opinion, OpinionDrafter, VerdictReport};
use rig::client::CompletionClient;
use rig::providers::openai;

use super::OaiAgent;
use crate::prompts;
use crate::retry::{prompt_with_retry, RetryPolicy};

const ANALYSIS_MARKER: &str = "ANALYSIS:";
const VERDICT_MARKER: &str = "VERDICT:";

/// Build the clerk agent. NO tools; it only sees the compiled record.
pub fn build_clerk(client: &openai::CompletionsClient, model: &str) -> OaiAgent {
    client
        .agent(model)
        .name("clerk")
        .description("Court clerk. Drafts a neutral analysis and verdict from the record.")
        .preamble(prompts::CLERK_PREAMBLE)
        .temperature(0.3)
        .build()
}

/// Split a clerk response into analysis and verdict.
///
/// Both markers must be present, in order, with non-empty text after each.
pub fn parse_opinion(response: &str) -> Option<Opinion> {
    let analysis_at = response.find(ANALYSIS_MARKER)?;
    let after_analysis = &response[analysis_at + ANALYSIS_MARKER.len()..];
    let verdict_at = after_analysis.find(VERDICT_MARKER)?;

    let analysis = after_analysis[..verdict_at].trim();
    let verdict = after_analysis[verdict_at + VERDICT_MARKER.len()..].trim();
    if analysis.is_empty() || verdict.is_empty() {
        return None;
    }
    Some(Opinion {
        analysis: analysis.to_string(),
        verdict: verdict.to_string(),
    })
}

/// [`OpinionDrafter`] backed by the clerk agent.
pub struct LlmClerk {
    agent: OaiAgent,
    retry: RetryPolicy,
}

impl LlmClerk {
    pub fn new(agent: OaiAgent, retry: RetryPolicy) -> Self {
        Self { agent, retry }
    }
}

#[async_trait]
impl OpinionDrafter for LlmClerk {
    async fn draft(&self, report: &VerdictReport) -> CourtResult<Opinion> {
        let prompt = prompts::clerk_prompt(report);
        let response = prompt_with_retry(&self.agent, &prompt, self.retry, "clerk")
            .await
            .map_err(|e| CourtError::Generation(e.to_string()))?;

        parse_opinion(&response).ok_or_else(|| {
            CourtError::Generation("clerk response missing ANALYSIS/VERDICT sections".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_opinion() {
        let response = "ANALYSIS:\nBoth sides cite records.\n\nVERDICT:\nEvenly balanced.";
        let opinion = parse_opinion(response).unwrap();
        assert_eq!(opinion.analysis, "Both sides cite records.");
        assert_eq!(opinion.verdict, "Evenly balanced.");
    }

    #[test]
    fn test_parse_tolerates_leading_chatter() {
        let response = "Sure.\nANALYSIS: short\nVERDICT: final";
        let opinion = parse_opinion(response).unwrap();
        assert_eq!(opinion.analysis, "short");
        assert_eq!(opinion.verdict, "final");
    }

    #[test]
    fn test_parse_rejects_missing_or_empty_sections() {
        assert!(parse_opinion("VERDICT: only").is_none());
        assert!(parse_opinion("ANALYSIS: only").is_none());
        assert!(parse_opinion("ANALYSIS:\nVERDICT: x").is_none());
        assert!(parse_opinion("ANALYSIS: x\nVERDICT:   ").is_none());
    }
}
