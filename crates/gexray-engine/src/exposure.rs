//! # Gamma Exposure Calculator
//!
//! Converts per-strike option records into signed dollar gamma exposure.
//!
//! ## Description
//! Implements the canonical GEX formula with the dealer-positioning sign
//! convention: dealers are modeled net-short calls (negative exposure) and
//! net-long puts (positive exposure). Per-strike values aggregate into net,
//! call, and put totals plus a set of distribution metrics (ATM-band
//! exposure, OTM band sums, Herfindahl concentration) consumed by the level
//! finder and regime analyzer.
//!
//! Same-day (0DTE) contracts can be amplified by a configurable multiplier;
//! the factor applies only when `dte == 0`, not to near-dated contracts.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gexray_models::OptionRecord;
use serde::Serialize;
use tracing::warn;

use crate::error::EngineError;

/// Relative half-width of the at-the-money band used by the distribution
/// metrics (±2% of spot).
const ATM_BAND_PCT: f64 = 0.02;

/// Gamma regime as seen by the calculator alone.
///
/// The calculator classifies strictly by sign; only the regime analyzer
/// applies the negligible-magnitude threshold that widens `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GammaRegime {
    Positive,
    Negative,
    Neutral,
}

impl GammaRegime {
    /// Human-readable label matching the wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            GammaRegime::Positive => "positive",
            GammaRegime::Negative => "negative",
            GammaRegime::Neutral => "neutral",
        }
    }
}

/// Signed dollar gamma exposure at a single strike.
///
/// Invariant: `net_gex == call_gex + put_gex`, always. Open interest and
/// days-to-expiry are retained as provenance for downstream diagnostics.
/// When serialized the strike itself is carried by the enclosing map key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeExposure {
    #[serde(skip_serializing)]
    pub strike: f64,
    pub call_gex: f64,
    pub put_gex: f64,
    pub net_gex: f64,
    pub call_oi: f64,
    pub put_oi: f64,
    pub dte: i32,
}

/// Shape metrics of the exposure distribution across strikes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Net GEX summed over strikes within ±2% of spot.
    pub atm_gex: f64,
    /// Put-side GEX summed over strikes below the ATM band.
    pub otm_put_gex: f64,
    /// Call-side GEX summed over strikes above the ATM band.
    pub otm_call_gex: f64,
    /// Herfindahl index of `|net_gex|` across strikes: 0 with no exposure,
    /// `1/N` when split equally across N strikes, 1 when one strike holds
    /// everything.
    pub concentration: f64,
}

/// Aggregate output of one calculator pass.
#[derive(Debug, Clone)]
pub struct GexResult {
    pub net_gex: f64,
    pub total_call_gex: f64,
    pub total_put_gex: f64,
    pub regime: GammaRegime,
    /// Per-strike exposures, ascending by strike, one entry per strike.
    pub strikes: Vec<StrikeExposure>,
    pub stats: DistributionStats,
    pub timestamp: DateTime<Utc>,
}

impl GexResult {
    /// Well-formed zero result for an empty chain.
    pub fn empty() -> Self {
        Self {
            net_gex: 0.0,
            total_call_gex: 0.0,
            total_put_gex: 0.0,
            regime: GammaRegime::Neutral,
            strikes: Vec::new(),
            stats: DistributionStats::default(),
            timestamp: Utc::now(),
        }
    }

    /// Number of distinct strikes carrying exposure data.
    pub fn strike_count(&self) -> usize {
        self.strikes.len()
    }
}

/// Scaling parameters for one calculator pass.
#[derive(Debug, Clone, Copy)]
pub struct CalcParams {
    /// Contract multiplier for the underlying (shares per contract).
    pub contract_multiplier: f64,
    /// Whether same-day expiries are amplified.
    pub use_0dte_multiplier: bool,
    /// Amplification factor applied when `dte == 0`.
    pub dte_multiplier: f64,
}

impl Default for CalcParams {
    fn default() -> Self {
        Self {
            contract_multiplier: 100.0,
            use_0dte_multiplier: true,
            dte_multiplier: 8.0,
        }
    }
}

/// True when the record is usable for exposure math. Logs and counts the
/// reason otherwise.
fn validate_record(record: &OptionRecord) -> bool {
    let reason = if !(record.strike > 0.0) || !record.strike.is_finite() {
        Some("bad_strike")
    } else if record.dte < 0 {
        Some("negative_dte")
    } else if !record.call_gamma.is_finite() || !record.put_gamma.is_finite() {
        Some("non_finite_gamma")
    } else if !record.call_oi.is_finite() || !record.put_oi.is_finite() {
        Some("non_finite_oi")
    } else if record.call_oi < 0.0 || record.put_oi < 0.0 {
        Some("negative_oi")
    } else {
        None
    };

    if let Some(reason) = reason {
        warn!(
            strike = record.strike,
            dte = record.dte,
            reason, "skipping malformed chain record"
        );
        metrics::counter!("gexray_records_skipped_total", "reason" => reason).increment(1);
        return false;
    }
    true
}

/// Computes per-strike and aggregate dealer gamma exposure.
///
/// # Parameters
/// * `spot_price` - Current underlying price; must be positive and finite.
/// * `records` - Raw chain rows; malformed rows are skipped, never fatal.
/// * `params` - Contract multiplier and 0DTE amplification settings.
///
/// # Returns
/// A [`GexResult`] with strikes ascending. An empty (or fully skipped) chain
/// yields the zero-valued neutral result rather than an error.
///
/// # Errors
/// [`EngineError::InvalidSpot`] when `spot_price` is non-positive or
/// non-finite — a caller contract violation, not a market condition.
pub fn calculate_gex(
    spot_price: f64,
    records: &[OptionRecord],
    params: &CalcParams,
) -> Result<GexResult, EngineError> {
    if !(spot_price > 0.0) || !spot_price.is_finite() {
        return Err(EngineError::InvalidSpot(spot_price));
    }

    // Keyed by strike in cents so records landing on the same strike
    // (e.g. several expiries) merge additively and iteration stays sorted.
    let mut by_strike: BTreeMap<i64, StrikeExposure> = BTreeMap::new();

    for record in records {
        if !validate_record(record) {
            continue;
        }

        let multiplier = if record.dte == 0 && params.use_0dte_multiplier {
            params.dte_multiplier
        } else {
            1.0
        };

        // Dealers modeled net-short calls, net-long puts.
        let call_gex =
            -record.call_gamma * record.call_oi * params.contract_multiplier * spot_price * multiplier;
        let put_gex =
            record.put_gamma * record.put_oi * params.contract_multiplier * spot_price * multiplier;

        let key = (record.strike * 100.0).round() as i64;
        let entry = by_strike.entry(key).or_insert(StrikeExposure {
            strike: record.strike,
            call_gex: 0.0,
            put_gex: 0.0,
            net_gex: 0.0,
            call_oi: 0.0,
            put_oi: 0.0,
            dte: record.dte,
        });
        entry.call_gex += call_gex;
        entry.put_gex += put_gex;
        entry.net_gex = entry.call_gex + entry.put_gex;
        entry.call_oi += record.call_oi;
        entry.put_oi += record.put_oi;
        entry.dte = entry.dte.min(record.dte);
    }

    if by_strike.is_empty() {
        return Ok(GexResult::empty());
    }

    let strikes: Vec<StrikeExposure> = by_strike.into_values().collect();
    let total_call_gex: f64 = strikes.iter().map(|e| e.call_gex).sum();
    let total_put_gex: f64 = strikes.iter().map(|e| e.put_gex).sum();
    let net_gex = total_call_gex + total_put_gex;

    let regime = if net_gex > 0.0 {
        GammaRegime::Positive
    } else if net_gex < 0.0 {
        GammaRegime::Negative
    } else {
        GammaRegime::Neutral
    };

    Ok(GexResult {
        net_gex,
        total_call_gex,
        total_put_gex,
        regime,
        stats: distribution_stats(&strikes, spot_price),
        strikes,
        timestamp: Utc::now(),
    })
}

/// Distribution metrics over the per-strike exposures.
pub fn distribution_stats(strikes: &[StrikeExposure], spot_price: f64) -> DistributionStats {
    let band = ATM_BAND_PCT * spot_price;
    let mut stats = DistributionStats::default();

    let total_abs: f64 = strikes.iter().map(|e| e.net_gex.abs()).sum();

    for exposure in strikes {
        let distance = exposure.strike - spot_price;
        if distance.abs() <= band {
            stats.atm_gex += exposure.net_gex;
        } else if distance < 0.0 {
            stats.otm_put_gex += exposure.put_gex;
        } else {
            stats.otm_call_gex += exposure.call_gex;
        }

        if total_abs > 0.0 {
            let share = exposure.net_gex.abs() / total_abs;
            stats.concentration += share * share;
        }
    }

    stats
}
