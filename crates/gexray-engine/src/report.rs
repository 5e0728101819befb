//! Analysis reporting utilities (offline)

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::analyzer::GexAnalysis;

/// Wrapper written to disk for downstream consumers and postmortems.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub created_at: DateTime<Utc>,
    pub engine: String,
    pub analysis: GexAnalysis,
    pub notes: Vec<String>,
}

impl AnalysisReport {
    pub fn new(analysis: GexAnalysis) -> Self {
        Self {
            created_at: Utc::now(),
            engine: format!("gexray-engine {}", env!("CARGO_PKG_VERSION")),
            analysis,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Writes `<dir>/<SYMBOL>_gex.json`, creating the directory if needed.
    pub fn write(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}_gex.json", self.analysis.symbol));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
