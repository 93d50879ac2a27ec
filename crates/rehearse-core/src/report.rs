//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::EvaluationResult;
use crate::score::{AggregateScore, Tier};

/// The complete outcome of one reviewed interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the review was produced.
    pub created_at: DateTime<Utc>,
    /// The role that was practiced.
    pub role: String,
    /// Identifier of the question bank used.
    pub bank_id: String,
    /// Model that judged the answers.
    pub model: String,
    /// One entry per answered question, in question order.
    pub entries: Vec<ReviewEntry>,
    /// The aggregate score over all scored entries.
    pub aggregate: AggregateScore,
    /// Qualitative tier derived from the aggregate.
    pub tier: Tier,
}

/// One question, the answer given, and the evaluation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub question: String,
    pub answer: String,
    pub result: EvaluationResult,
}

impl SessionReport {
    /// Number of entries whose evaluation failed.
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_failed()).count()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
