//! Live tests against Wikipedia and the configured model endpoint.
//!
//! All tests are `#[ignore]`. Run with `cargo test -p court-agents -- --ignored`.
//! The session test needs `GEMINI_API_KEY` (or `COURT_LLM_API_KEY`).

use coordination::{
    EvidenceBrief, EvidenceSummarizer, ReferenceLookup, SessionCoordinator, Side, VerdictWriter,
};
use court_agents::agents::AgentFactory;
use court_agents::config::CourtConfig;
use court_agents::tools::WikipediaLookup;

#[tokio::test]
#[ignore]
async fn test_wikipedia_lookup_returns_ranked_documents() {
    let config = CourtConfig::from_env();
    let lookup = WikipediaLookup::new(&config.wiki).expect("http client");

    let docs = lookup.load("Ada Lovelace").await.expect("lookup");
    assert!(!docs.is_empty(), "Wikipedia returned no pages");
    assert!(docs.len() <= config.wiki.top_k);
    assert!(docs[0].title.contains("Lovelace"));
    assert!(docs
        .iter()
        .all(|d| d.content.chars().count() <= config.wiki.max_chars));
}

#[tokio::test]
#[ignore]
async fn test_counsel_summarizes_reference_text() {
    let config = CourtConfig::from_env();
    let factory = AgentFactory::new(&config).expect("factory");
    let summarizer = factory.summarizer();

    let brief = EvidenceBrief {
        side: Side::Supporting,
        topic: "Ada Lovelace".into(),
        query: "Ada Lovelace achievements".into(),
        source_text: "Page: Ada Lovelace\nSummary: Ada Lovelace was an English \
                      mathematician. She wrote the first published algorithm for \
                      the Analytical Engine."
            .into(),
    };
    let summary = summarizer.summarize(&brief).await.expect("summary");
    assert!(summary.contains("- "), "expected bullets, got: {summary}");
}

#[tokio::test]
#[ignore]
async fn test_full_session_writes_verdict() {
    let config = CourtConfig::from_env();
    let lookup = WikipediaLookup::new(&config.wiki).expect("http client");
    let factory = AgentFactory::new(&config).expect("factory");
    let summarizer = factory.summarizer();
    let clerk = factory.clerk();
    let dir = tempfile::tempdir().unwrap();

    let summary = SessionCoordinator::new(&lookup, &summarizer, VerdictWriter::new(dir.path()))
        .with_drafter(&clerk)
        .run("Ada Lovelace")
        .await
        .expect("session");

    assert!(summary.resolution.status.is_success());
    assert!(summary.persisted.is_saved());
    let text = std::fs::read_to_string(summary.persisted.path().unwrap()).unwrap();
    assert!(text.starts_with("MOCK COURT VERDICT: "));
}
