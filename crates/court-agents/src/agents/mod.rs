//! Agent builders for the courtroom roles.
//!
//! Each agent is built via a free function that returns
//! `Agent<openai::completion::CompletionModel>`. The `AgentFactory` ties them
//! together using one client built from `CourtConfig`.

pub mod advocate;
pub mod clerk;

use anyhow::Result;
use coordination::Side;
use rig::agent::Agent;
use rig::providers::openai;

use crate::config::CourtConfig;

pub use advocate::LlmSummarizer;
pub use clerk::{parse_opinion, LlmClerk};

/// Type alias for agents built from OpenAI-compatible endpoints.
pub type OaiAgent = Agent<openai::completion::CompletionModel>;

/// Factory that builds every courtroom agent from a `CourtConfig`.
pub struct AgentFactory {
    pub client: openai::CompletionsClient,
    pub config: CourtConfig,
}

impl AgentFactory {
    pub fn new(config: &CourtConfig) -> Result<Self> {
        let client = config.llm_client()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the collector agent for `side` (defence or prosecution).
    pub fn build_counsel(&self, side: Side) -> OaiAgent {
        advocate::build_counsel(&self.client, &self.config.llm.model, side)
    }

    /// Build the clerk who drafts the closing sections.
    pub fn build_clerk(&self) -> OaiAgent {
        clerk::build_clerk(&self.client, &self.config.llm.model)
    }

    /// Summarizer backed by one counsel agent per side.
    pub fn summarizer(&self) -> LlmSummarizer {
        LlmSummarizer::new(
            self.build_counsel(Side::Supporting),
            self.build_counsel(Side::Opposing),
            self.config.retry,
        )
    }

    pub fn clerk(&self) -> LlmClerk {
        LlmClerk::new(self.build_clerk(), self.config.retry)
    }
}
