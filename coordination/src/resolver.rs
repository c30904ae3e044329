//! Title resolver: maps free text to a canonical reference title.
//!
//! Policy is "first ranked result wins". The remaining titles are kept as
//! candidates on the session state but nothing downstream consumes them.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{CourtError, CourtResult, ToolStatus};
use crate::lookup::ReferenceLookup;
use crate::state::SessionState;

/// Result of one resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub status: ToolStatus,
    /// Canonical title; the trimmed raw input in degraded mode, empty on
    /// blank input.
    pub title: String,
    /// Cause of an error status, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CourtError>,
}

impl Resolution {
    fn success(title: String) -> Self {
        Self {
            status: ToolStatus::Success,
            title,
            error: None,
        }
    }

    fn failed(title: String, error: CourtError) -> Self {
        Self {
            status: ToolStatus::Error,
            title,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Resolve `raw_input` to a canonical title.
///
/// Never fails outright: a blank input yields `{error, ""}`, a lookup failure
/// yields `{error, raw_input}` so the session can proceed with the user's
/// own wording.
pub async fn resolve(
    state: &mut SessionState,
    lookup: &dyn ReferenceLookup,
    raw_input: &str,
) -> Resolution {
    let query = raw_input.trim();
    if query.is_empty() {
        return Resolution::failed(String::new(), CourtError::EmptyInput);
    }

    match ranked_titles(lookup, query).await {
        Ok(titles) => {
            let official = titles.first().cloned().unwrap_or_else(|| query.to_string());
            info!(
                user_input = %query,
                official = %official,
                candidates = titles.len(),
                "Topic normalized"
            );
            state.official_title_candidates = titles;
            Resolution::success(official)
        }
        Err(e) => {
            error!(user_input = %query, error = %e, "Topic lookup failed; using raw input");
            Resolution::failed(query.to_string(), e)
        }
    }
}

/// Non-empty titles in lookup rank order.
async fn ranked_titles(lookup: &dyn ReferenceLookup, query: &str) -> CourtResult<Vec<String>> {
    let docs = lookup.load(query).await?;
    Ok(docs
        .into_iter()
        .map(|d| d.title)
        .filter(|t| !t.is_empty())
        .collect())
}
