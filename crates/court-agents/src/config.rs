use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use coordination::TrialConfig;
use rig::providers::openai;

use crate::retry::RetryPolicy;

const DEFAULT_MODEL: &str = "gemini-1.5-pro-preview-0409";
const DEFAULT_LLM_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";

/// Language model endpoint (any OpenAI-compatible chat completions API).
#[derive(Debug, Clone)]
pub struct LlmEndpoint {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

/// Reference lookup settings.
#[derive(Debug, Clone)]
pub struct WikiSettings {
    /// Language edition, e.g. `en` → en.wikipedia.org.
    pub lang: String,
    /// Documents fetched per lookup.
    pub top_k: usize,
    /// Per-document content cap, in characters.
    pub max_chars: usize,
    pub timeout: Duration,
}

/// Top-level court configuration.
#[derive(Debug, Clone)]
pub struct CourtConfig {
    pub llm: LlmEndpoint,
    pub wiki: WikiSettings,
    pub trial: TrialConfig,
    /// Applied to every model invocation.
    pub retry: RetryPolicy,
    /// Verdicts go to `<output_base>/final_verdicts_output/`.
    pub output_base: Option<PathBuf>,
    /// Use the extractive summarizer and skip the clerk (no model calls).
    pub offline_summaries: bool,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }
}

impl CourtConfig {
    /// Load an optional `.env`, then read the environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::default()
    }

    /// Build from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse::<usize>().ok());
        let defaults = TrialConfig::default();

        Self {
            llm: LlmEndpoint {
                url: var("COURT_LLM_URL").unwrap_or_else(|| DEFAULT_LLM_URL.into()),
                api_key: var("COURT_LLM_API_KEY")
                    .or_else(|| var("GEMINI_API_KEY"))
                    .unwrap_or_else(|| "not-needed".into()),
                model: var("MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            },
            wiki: WikiSettings {
                lang: var("COURT_WIKI_LANG").unwrap_or_else(|| "en".into()),
                top_k: parsed("COURT_TOP_K").filter(|v| *v > 0).unwrap_or(3),
                max_chars: parsed("COURT_MAX_CHARS").filter(|v| *v > 0).unwrap_or(5000),
                timeout: Duration::from_secs(30),
            },
            trial: TrialConfig {
                max_rounds: parsed("COURT_MAX_ROUNDS")
                    .filter(|v| *v > 0)
                    .map(|v| v as u32)
                    .unwrap_or(defaults.max_rounds),
                min_entries: parsed("COURT_MIN_ENTRIES").unwrap_or(defaults.min_entries),
            },
            retry: RetryPolicy::default(),
            output_base: var("COURT_OUTPUT_BASE").map(PathBuf::from),
            offline_summaries: var("COURT_OFFLINE_SUMMARIES")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Build the rig client for the configured endpoint.
    pub fn llm_client(&self) -> Result<openai::CompletionsClient> {
        openai::CompletionsClient::builder()
            .api_key(&self.llm.api_key)
            .base_url(&self.llm.url)
            .build()
            .context("Failed to build language model client")
    }
}
