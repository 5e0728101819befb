//! File-cache-backed chain provider.
//!
//! Serves `ChainSnapshot`s from `<root>/<SYMBOL>.json`, optionally refusing
//! snapshots older than a configured age. Useful for offline analysis and as
//! the hand-off point from whatever process captures chains upstream.

use std::path::{Path, PathBuf};

use chrono::Utc;
use gexray_engine::ChainProvider;
use gexray_models::ChainSnapshot;
use thiserror::Error;
use tracing::info;

/// Failures of the file-backed provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no snapshot on disk for {0}")]
    Missing(String),
    #[error("snapshot for {symbol} is stale: {age_minutes} min old, max {max_minutes}")]
    Stale {
        symbol: String,
        age_minutes: i64,
        max_minutes: i64,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Chain provider reading snapshots from a directory of JSON files.
pub struct FileChainProvider {
    root: PathBuf,
    max_age_minutes: Option<i64>,
}

impl FileChainProvider {
    /// Creates a provider over `root` with no freshness requirement.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_age_minutes: None,
        }
    }

    /// Rejects snapshots captured more than `minutes` ago.
    pub fn with_max_age_minutes(mut self, minutes: i64) -> Self {
        self.max_age_minutes = Some(minutes);
        self
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}.json"))
    }

    /// Loads and freshness-checks the snapshot for a symbol.
    pub fn load(&self, symbol: &str) -> Result<ChainSnapshot, ProviderError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ProviderError::Missing(symbol.to_string()));
        }

        let raw = std::fs::read_to_string(&path)?;
        let snapshot: ChainSnapshot = serde_json::from_str(&raw)?;

        if let Some(max_minutes) = self.max_age_minutes {
            let age_minutes = snapshot.age(Utc::now()).num_minutes();
            if age_minutes > max_minutes {
                return Err(ProviderError::Stale {
                    symbol: symbol.to_string(),
                    age_minutes,
                    max_minutes,
                });
            }
        }

        info!(
            symbol,
            strikes = snapshot.strike_count(),
            path = %path.display(),
            "loaded chain snapshot"
        );
        Ok(snapshot)
    }

    /// Writes a snapshot to the provider's directory (pretty JSON), creating
    /// the directory if needed.
    pub fn save(&self, snapshot: &ChainSnapshot) -> Result<PathBuf, ProviderError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(&snapshot.symbol);
        std::fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
        info!(symbol = %snapshot.symbol, path = %path.display(), "cached chain snapshot");
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ChainProvider for FileChainProvider {
    fn option_chain(&self, symbol: &str) -> anyhow::Result<ChainSnapshot> {
        Ok(self.load(symbol)?)
    }

    fn spot_price(&self, symbol: &str) -> anyhow::Result<f64> {
        Ok(self.load(symbol)?.spot_price)
    }

    fn name(&self) -> &'static str {
        "file-cache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gexray_models::OptionRecord;

    fn sample_snapshot() -> ChainSnapshot {
        ChainSnapshot::new("SPY", 450.0).with_records(vec![
            OptionRecord::new(445.0, 1).with_put(0.02, 1500.0),
            OptionRecord::new(455.0, 1).with_call(0.02, 1200.0),
        ])
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileChainProvider::new(dir.path());

        provider.save(&sample_snapshot()).unwrap();
        let loaded = provider.load("SPY").unwrap();
        assert_eq!(loaded.symbol, "SPY");
        assert_eq!(loaded.spot_price, 450.0);
        assert_eq!(loaded.records, sample_snapshot().records);
        assert_eq!(provider.spot_price("SPY").unwrap(), 450.0);
    }

    #[test]
    fn test_missing_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileChainProvider::new(dir.path());
        assert!(matches!(
            provider.load("NOPE"),
            Err(ProviderError::Missing(_))
        ));
    }

    #[test]
    fn test_stale_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileChainProvider::new(dir.path()).with_max_age_minutes(30);

        let mut snapshot = sample_snapshot();
        snapshot.captured_at = Utc::now() - Duration::hours(2);
        provider.save(&snapshot).unwrap();

        assert!(matches!(
            provider.load("SPY"),
            Err(ProviderError::Stale { .. })
        ));
    }

    #[test]
    fn test_fresh_snapshot_accepted_within_max_age() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileChainProvider::new(dir.path()).with_max_age_minutes(30);
        provider.save(&sample_snapshot()).unwrap();
        assert!(provider.load("SPY").is_ok());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BAD.json"), "{not json").unwrap();
        let provider = FileChainProvider::new(dir.path());
        assert!(matches!(
            provider.load("BAD"),
            Err(ProviderError::Malformed(_))
        ));
    }
}
