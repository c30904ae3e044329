//! Per-side search query queue.

use serde::{Deserialize, Serialize};

/// Ordered list of search queries for one side.
///
/// Consumers read the most recent entry; the balance checker appends
/// refined queries. Appends are unconditional: no de-duplication and no
/// length bound, since the trial loop itself is bounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryQueue {
    queries: Vec<String>,
}

impl QueryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from seed queries, in order.
    pub fn seeded<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queries: seeds.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a query.
    pub fn enqueue(&mut self, query: impl Into<String>) {
        self.queries.push(query.into());
    }

    /// Most recently queued query, or `fallback` when the queue is empty.
    pub fn latest<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.queries.last().map(String::as_str).unwrap_or(fallback)
    }

    /// Whether `query` has been queued before.
    pub fn contains(&self, query: &str) -> bool {
        self.queries.iter().any(|q| q == query)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_falls_back_to_topic() {
        let queue = QueryQueue::new();
        assert_eq!(queue.latest("Ada Lovelace"), "Ada Lovelace");
    }

    #[test]
    fn test_latest_returns_last_enqueued() {
        let mut queue = QueryQueue::seeded(["a", "b"]);
        assert_eq!(queue.latest("topic"), "b");
        queue.enqueue("c");
        assert_eq!(queue.latest("topic"), "c");
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_enqueue_keeps_duplicates() {
        let mut queue = QueryQueue::new();
        queue.enqueue("same");
        queue.enqueue("same");
        assert_eq!(queue.as_slice(), &["same".to_string(), "same".to_string()]);
        assert!(queue.contains("same"));
        assert!(!queue.contains("other"));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let queue = QueryQueue::seeded(["x awards"]);
        let json = serde_json::to_string(&queue).unwrap();
        assert_eq!(json, r#"["x awards"]"#);
    }
}
