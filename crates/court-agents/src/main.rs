use anyhow::{Context, Result};
use coordination::{
    EvidenceSummarizer, ExtractiveSummarizer, OpinionDrafter, PersistOutcome, SessionCoordinator,
    VerdictWriter,
};
use court_agents::agents::AgentFactory;
use court_agents::config::CourtConfig;
use court_agents::prompts::PROMPT_VERSION;
use court_agents::tools::WikipediaLookup;
use tracing::{info, warn};

/// Case heard by the demo session.
const DEMO_TOPIC: &str = "ธรรมนัส พรหมเผ่า";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = CourtConfig::from_env();
    info!(
        model = %config.llm.model,
        endpoint = %config.llm.url,
        wiki = %config.wiki.lang,
        max_rounds = config.trial.max_rounds,
        offline = config.offline_summaries,
        prompt_version = PROMPT_VERSION,
        "Mock court starting"
    );

    let lookup = WikipediaLookup::new(&config.wiki)?;
    let writer = match &config.output_base {
        Some(base) => VerdictWriter::new(base),
        None => VerdictWriter::in_current_dir().context("Cannot determine working directory")?,
    };

    let extractive = ExtractiveSummarizer::default();
    let factory = if config.offline_summaries {
        None
    } else {
        Some(AgentFactory::new(&config)?)
    };
    let llm_summarizer = factory.as_ref().map(AgentFactory::summarizer);
    let clerk = factory.as_ref().map(AgentFactory::clerk);

    let summarizer: &dyn EvidenceSummarizer = match &llm_summarizer {
        Some(s) => s,
        None => &extractive,
    };

    let mut coordinator = SessionCoordinator::new(&lookup, summarizer, writer)
        .with_trial_config(config.trial);
    if let Some(clerk) = &clerk {
        coordinator = coordinator.with_drafter(clerk as &dyn OpinionDrafter);
    }

    println!("System Ready...");
    let summary = coordinator.run(DEMO_TOPIC).await?;

    if let Some(e) = &summary.resolution.error {
        warn!(error = %e, "Title resolution failed; used the raw topic");
    }
    println!("{}", summary.outcome.summary_line());
    match &summary.persisted {
        PersistOutcome::Saved { path } => println!("Verdict saved to {}", path.display()),
        PersistOutcome::Failed { message } => println!("Verdict not saved: {message}"),
    }
    println!("Court Session Adjourned.");

    Ok(())
}
