//! Counsel agents: defence and prosecution evidence summarizers.

use async_trait::async_trait;
use coordination::{CourtError, CourtResult, EvidenceBrief, EvidenceSummarizer, Side};
use rig::client::CompletionClient;
use rig::providers::openai;
use tracing::debug;

use super::OaiAgent;
use crate::prompts;
use crate::retry::{prompt_with_retry, RetryPolicy};

/// Build the counsel agent for one side.
///
/// NO tools. The lookup happens in code before the agent is prompted, so
/// the agent only ever sees the fetched reference text.
pub fn build_counsel(client: &openai::CompletionsClient, model: &str, side: Side) -> OaiAgent {
    let (name, description) = match side {
        Side::Supporting => ("advocate", "Defence counsel. Summarizes supporting evidence."),
        Side::Opposing => ("prosecutor", "Prosecutor. Summarizes opposing evidence."),
    };
    client
        .agent(model)
        .name(name)
        .description(description)
        .preamble(prompts::preamble_for(side))
        .temperature(0.2)
        .build()
}

/// [`EvidenceSummarizer`] that prompts the counsel agent for the brief's side.
pub struct LlmSummarizer {
    advocate: OaiAgent,
    prosecutor: OaiAgent,
    retry: RetryPolicy,
}

impl LlmSummarizer {
    pub fn new(advocate: OaiAgent, prosecutor: OaiAgent, retry: RetryPolicy) -> Self {
        Self {
            advocate,
            prosecutor,
            retry,
        }
    }

    fn counsel(&self, side: Side) -> &OaiAgent {
        match side {
            Side::Supporting => &self.advocate,
            Side::Opposing => &self.prosecutor,
        }
    }
}

#[async_trait]
impl EvidenceSummarizer for LlmSummarizer {
    async fn summarize(&self, brief: &EvidenceBrief) -> CourtResult<String> {
        let prompt = prompts::evidence_prompt(brief);
        let label = format!("{}-counsel", brief.side.key());
        debug!(side = %brief.side, query = %brief.query, chars = prompt.len(), "Prompting counsel");

        prompt_with_retry(self.counsel(brief.side), &prompt, self.retry, &label)
            .await
            .map_err(|e| CourtError::Generation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::agents::AgentFactory;
    use crate::config::CourtConfig;

    async fn rejecting_endpoint() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;
        server
    }

    fn summarizer_for(server: &MockServer) -> LlmSummarizer {
        let url = server.uri();
        let mut config = CourtConfig::from_vars(|key| match key {
            "COURT_LLM_URL" => Some(url.clone()),
            "COURT_LLM_API_KEY" => Some("test-key".into()),
            _ => None,
        });
        config.retry.max_attempts = 1;
        AgentFactory::new(&config).unwrap().summarizer()
    }

    fn brief(side: Side) -> EvidenceBrief {
        EvidenceBrief {
            side,
            topic: "Ada".into(),
            query: "Ada legacy".into(),
            source_text: "Page: Ada\nSummary: Ada wrote notes.".into(),
        }
    }

    async fn request_bodies(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_provider_error_maps_to_generation() {
        let server = rejecting_endpoint().await;
        let summarizer = summarizer_for(&server);

        let err = summarizer.summarize(&brief(Side::Opposing)).await.unwrap_err();
        assert!(matches!(err, CourtError::Generation(_)), "got {err:?}");
        assert_eq!(request_bodies(&server).await.len(), 1);
    }

    #[tokio::test]
    async fn test_brief_is_routed_to_its_side() {
        let server = rejecting_endpoint().await;
        let summarizer = summarizer_for(&server);

        let _ = summarizer.summarize(&brief(Side::Supporting)).await;
        let _ = summarizer.summarize(&brief(Side::Opposing)).await;

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("defence counsel"));
        assert!(!bodies[0].contains("the prosecutor"));
        assert!(bodies[1].contains("the prosecutor"));
        assert!(bodies[1].contains("Ada legacy"));
    }
}
