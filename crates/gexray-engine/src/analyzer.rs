//! # Analysis Orchestrator
//!
//! Sequences calculator → level finder → regime analyzer behind a TTL cache.
//!
//! ## Description
//! [`GexAnalyzer`] is the single entry point of the engine. It resolves the
//! per-symbol contract multiplier, runs the three pure stages, and assembles
//! the JSON-serializable [`GexAnalysis`] consumed by the scoring
//! collaborator. Results are cached per `(symbol, spot price rounded to
//! cents)` for the configured TTL; expired entries are recomputed from
//! scratch, never patched.
//!
//! The chain provider is injected at construction time and only used by
//! [`GexAnalyzer::analyze_symbol`]; callers that already hold a snapshot go
//! through [`GexAnalyzer::analyze`] directly.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gexray_models::OptionRecord;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::exposure::{calculate_gex, CalcParams, DistributionStats, GammaRegime, StrikeExposure};
use crate::levels::{find_levels, Levels};
use crate::provider::ChainProvider;
use crate::regime::{analyze_regime, RegimeAnalysis};

/// Complete output of one analysis pass, shaped for the scoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GexAnalysis {
    pub symbol: String,
    pub spot_price: f64,
    pub net_gex: f64,
    pub total_call_gex: f64,
    pub total_put_gex: f64,
    /// Regime after the analyzer's negligible-magnitude refinement.
    pub regime: GammaRegime,
    /// Per-strike exposures, serialized as a map keyed by the strike.
    #[serde(serialize_with = "serialize_strike_map")]
    pub strike_exposure: Vec<StrikeExposure>,
    pub levels: Levels,
    pub regime_analysis: RegimeAnalysis,
    pub stats: DistributionStats,
    pub timestamp: DateTime<Utc>,
}

/// Serializes the exposure list as `{"<strike>": {...}}` with the strike
/// rendered through `f64`'s shortest display form ("4500", "4502.5").
fn serialize_strike_map<S: Serializer>(
    strikes: &[StrikeExposure],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(strikes.len()))?;
    for exposure in strikes {
        map.serialize_entry(&exposure.strike.to_string(), exposure)?;
    }
    map.end()
}

/// Orchestrator over the three analysis stages plus the result cache.
pub struct GexAnalyzer {
    config: EngineConfig,
    provider: Arc<dyn ChainProvider>,
    cache: TtlCache<(String, i64), GexAnalysis>,
}

impl GexAnalyzer {
    /// Builds an analyzer around an injected chain provider.
    pub fn new(provider: Arc<dyn ChainProvider>, config: EngineConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_minutes * 60);
        Self {
            config,
            provider,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spot component of the cache key: rounded to cents so float jitter
    /// from a provider does not defeat the cache.
    fn cache_key(symbol: &str, spot_price: f64) -> (String, i64) {
        (symbol.to_string(), (spot_price * 100.0).round() as i64)
    }

    /// Analyzes a chain the caller already holds, with caching.
    ///
    /// # Errors
    /// [`EngineError::InvalidSpot`] for a non-positive or non-finite spot.
    pub fn analyze(
        &self,
        symbol: &str,
        spot_price: f64,
        records: &[OptionRecord],
    ) -> Result<GexAnalysis, EngineError> {
        if !(spot_price > 0.0) || !spot_price.is_finite() {
            return Err(EngineError::InvalidSpot(spot_price));
        }
        self.cache
            .get_or_try_compute(Self::cache_key(symbol, spot_price), || {
                self.run_pipeline(symbol, spot_price, records)
            })
    }

    /// Fetches the chain from the injected provider, then analyzes it.
    pub fn analyze_symbol(&self, symbol: &str) -> Result<GexAnalysis, EngineError> {
        let snapshot =
            self.provider
                .option_chain(symbol)
                .map_err(|source| EngineError::Provider {
                    symbol: symbol.to_string(),
                    provider: self.provider.name(),
                    source,
                })?;
        debug!(
            symbol,
            strikes = snapshot.strike_count(),
            spot = snapshot.spot_price,
            "chain snapshot fetched"
        );
        self.analyze(symbol, snapshot.spot_price, &snapshot.records)
    }

    fn run_pipeline(
        &self,
        symbol: &str,
        spot_price: f64,
        records: &[OptionRecord],
    ) -> Result<GexAnalysis, EngineError> {
        let params = CalcParams {
            contract_multiplier: self.config.multipliers.multiplier(symbol),
            use_0dte_multiplier: self.config.use_0dte_multiplier,
            dte_multiplier: self.config.dte_multiplier,
        };

        let result = calculate_gex(spot_price, records, &params)?;
        let levels = find_levels(&result.strikes, spot_price, self.config.min_gex_threshold);
        let analysis = analyze_regime(&result, &levels, spot_price, &self.config.regime_thresholds);

        info!(
            symbol,
            net_gex = result.net_gex,
            regime = analysis.regime.as_str(),
            magnitude = analysis.magnitude.as_str(),
            call_wall = ?levels.call_wall,
            put_wall = ?levels.put_wall,
            "gamma exposure analyzed"
        );

        Ok(GexAnalysis {
            symbol: symbol.to_string(),
            spot_price,
            net_gex: result.net_gex,
            total_call_gex: result.total_call_gex,
            total_put_gex: result.total_put_gex,
            regime: analysis.regime,
            strike_exposure: result.strikes,
            levels,
            regime_analysis: analysis,
            stats: result.stats,
            timestamp: result.timestamp,
        })
    }
}
