//! Engine configuration schema.
//!
//! All knobs deserialize from the runner's TOML config; every field has a
//! default so a missing or partial `[engine]` section still yields a working
//! engine.

use serde::Deserialize;

use crate::regime::RegimeThresholds;
use crate::specs::MultiplierStore;

/// Configuration surface consumed by the gamma-exposure engine.
///
/// # Fields
/// * `multipliers` - Per-symbol contract multiplier table.
/// * `use_0dte_multiplier` - Whether same-day expiries are amplified.
/// * `dte_multiplier` - Amplification factor applied when `dte == 0`.
/// * `min_gex_threshold` - Minimum `|GEX|` for a strike to qualify as a wall.
/// * `regime_thresholds` - Dollar-notional breakpoints for regime buckets.
/// * `cache_ttl_minutes` - Lifetime of cached analyses per `(symbol, spot)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub multipliers: MultiplierStore,
    pub use_0dte_multiplier: bool,
    pub dte_multiplier: f64,
    pub min_gex_threshold: f64,
    pub regime_thresholds: RegimeThresholds,
    pub cache_ttl_minutes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            multipliers: MultiplierStore::default(),
            use_0dte_multiplier: true,
            dte_multiplier: 8.0,
            min_gex_threshold: 1_000_000.0,
            regime_thresholds: RegimeThresholds::default(),
            cache_ttl_minutes: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.use_0dte_multiplier);
        assert_eq!(config.dte_multiplier, 8.0);
        assert_eq!(config.cache_ttl_minutes, 5);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"dte_multiplier": 6.0}"#).unwrap();
        assert_eq!(config.dte_multiplier, 6.0);
        assert_eq!(config.min_gex_threshold, 1_000_000.0);
        assert_eq!(config.regime_thresholds.high, 1e9);
    }
}
