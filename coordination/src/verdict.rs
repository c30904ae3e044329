//! Verdict persistence: one plain-text file per session.
//!
//! Files land in `<base>/final_verdicts_output/<topic>_<YYYYMMDD_HHMMSS>.txt`.
//! Write failures are reported as [`PersistOutcome::Failed`] and never
//! propagate.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{CourtError, CourtResult};

/// Directory created under the base path.
pub const OUTPUT_DIR_NAME: &str = "final_verdicts_output";

/// Filename stem used when the topic sanitizes to nothing.
const FALLBACK_STEM: &str = "Report";

/// Result of a persist attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    Saved { path: PathBuf },
    Failed { message: String },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Saved { path } => Some(path),
            Self::Failed { .. } => None,
        }
    }
}

/// Keep alphanumerics, spaces, hyphens and underscores; trim the rest.
///
/// Idempotent: the output contains only kept characters and no edge
/// whitespace, so a second pass changes nothing.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `<sanitized topic>_<YYYYMMDD_HHMMSS>.txt`
pub fn verdict_filename(topic: &str, at: DateTime<Local>) -> String {
    let stem = sanitize_topic(topic);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem };
    format!("{}_{}.txt", stem, at.format("%Y%m%d_%H%M%S"))
}

/// Writes verdict documents under a base directory.
#[derive(Debug, Clone)]
pub struct VerdictWriter {
    base_dir: PathBuf,
}

impl VerdictWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Writer rooted at the process working directory.
    pub fn in_current_dir() -> CourtResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| CourtError::Write(e.to_string()))?;
        Ok(Self::new(cwd))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(OUTPUT_DIR_NAME)
    }

    /// Persist `document` for `topic`, stamped with the current time.
    pub fn persist(&self, topic: &str, document: &str) -> PersistOutcome {
        self.persist_at(topic, document, Local::now())
    }

    /// Persist with an explicit timestamp.
    pub fn persist_at(&self, topic: &str, document: &str, at: DateTime<Local>) -> PersistOutcome {
        match self.write(topic, document, at) {
            Ok(path) => {
                info!(path = %path.display(), bytes = document.len(), "Verdict written");
                PersistOutcome::Saved { path }
            }
            Err(e) => {
                error!(error = %e, "Verdict write failed");
                PersistOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn write(&self, topic: &str, document: &str, at: DateTime<Local>) -> CourtResult<PathBuf> {
        let dir = self.output_dir();
        std::fs::create_dir_all(&dir)
            .map_err(|e| CourtError::Write(format!("create {}: {e}", dir.display())))?;

        let path = dir.join(verdict_filename(topic, at));
        std::fs::write(&path, document)
            .map_err(|e| CourtError::Write(format!("write {}: {e}", path.display())))?;
        Ok(path)
    }
}
