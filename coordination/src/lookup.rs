//! Reference lookup seam.
//!
//! The court never talks to an encyclopedia directly; it goes through
//! [`ReferenceLookup`]. The runtime crate backs it with Wikipedia, tests back
//! it with fixed documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CourtResult;

/// One ranked document returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub title: String,
    pub content: String,
}

impl ReferenceDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// External reference service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Ranked documents for `query`, best match first.
    async fn load(&self, query: &str) -> CourtResult<Vec<ReferenceDocument>>;
}

/// Render documents the way an evidence brief presents them to a summarizer.
///
/// Returns `None` when there is nothing to ground a summary on.
pub fn render_documents(docs: &[ReferenceDocument]) -> Option<String> {
    let blocks: Vec<String> = docs
        .iter()
        .filter(|d| !d.content.trim().is_empty())
        .map(|d| format!("Page: {}\nSummary: {}", d.title, d.content.trim()))
        .collect();
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_documents_joins_pages() {
        let docs = vec![
            ReferenceDocument::new("A", "first"),
            ReferenceDocument::new("B", " second "),
        ];
        let rendered = render_documents(&docs).unwrap();
        assert_eq!(rendered, "Page: A\nSummary: first\n\nPage: B\nSummary: second");
    }

    #[test]
    fn test_render_documents_skips_blank_content() {
        let docs = vec![ReferenceDocument::new("Empty", "  ")];
        assert!(render_documents(&docs).is_none());
        assert!(render_documents(&[]).is_none());
    }
}
