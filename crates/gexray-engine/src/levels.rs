//! # Structural Level Finder
//!
//! Locates the strikes where dealer gamma exposure concentrates.
//!
//! ## Description
//! From the per-strike exposure map this module derives the call wall and put
//! wall (largest-magnitude exposure on each side of spot, subject to an
//! inclusion floor), the zero-gamma flip strike by linear interpolation, a
//! flip zone where net exposure is thin, the top high-gamma strikes, and a
//! gamma distribution profile (skew and near-spot concentration).
//!
//! Degenerate inputs (empty map, all-zero exposure, no sign crossing) yield
//! `None` fields — indeterminate, not errors.

use serde::Serialize;
use std::cmp::Ordering;

use crate::exposure::StrikeExposure;

/// Fraction of the peak `|net_gex|` below which a strike counts as inside
/// the flip zone.
const FLIP_ZONE_FRACTION: f64 = 0.2;

/// Relative half-width of the near-spot band used by the gamma profile
/// (±5% of spot).
const NEAR_SPOT_BAND_PCT: f64 = 0.05;

/// Number of strikes reported in `high_gamma_strikes`.
const HIGH_GAMMA_COUNT: usize = 5;

/// Which option leg dominates a strike's exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

/// Band of strikes where `|net_gex|` is within 20% of the observed peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlipZone {
    pub lower: f64,
    pub upper: f64,
    pub width: f64,
    pub spot_in_zone: bool,
}

/// One of the top strikes ranked by `|net_gex|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighGammaStrike {
    pub strike: f64,
    pub net_gex: f64,
    pub dominant_side: OptionSide,
}

/// Shape of the exposure distribution relative to spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GammaProfile {
    /// |GEX|-weighted mean strike minus spot, normalized by spot.
    /// Positive means exposure sits call-heavy above spot.
    pub skew: f64,
    /// Fraction of total |GEX| within ±5% of spot.
    pub concentration_near_spot: f64,
}

/// Structurally significant levels derived from the exposure curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Levels {
    pub call_wall: Option<f64>,
    pub put_wall: Option<f64>,
    pub zero_gamma: Option<f64>,
    pub flip_zone: Option<FlipZone>,
    pub high_gamma_strikes: Vec<HighGammaStrike>,
    pub gamma_profile: Option<GammaProfile>,
}

/// Selects the wall strike on one side of spot.
///
/// Candidates are filtered by side and the inclusion floor, then ranked by
/// magnitude. Exact-magnitude ties break toward the strike closer to spot so
/// the pick never depends on iteration order.
fn find_wall(
    strikes: &[StrikeExposure],
    spot_price: f64,
    min_gex_threshold: f64,
    side: OptionSide,
) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None; // (strike, magnitude)

    for exposure in strikes {
        let (above, magnitude) = match side {
            OptionSide::Call => (exposure.strike > spot_price, exposure.call_gex.abs()),
            OptionSide::Put => (exposure.strike < spot_price, exposure.put_gex.abs()),
        };
        if !above || magnitude < min_gex_threshold {
            continue;
        }
        best = match best {
            None => Some((exposure.strike, magnitude)),
            Some((best_strike, best_magnitude)) => {
                let closer = (exposure.strike - spot_price).abs()
                    < (best_strike - spot_price).abs();
                if magnitude > best_magnitude || (magnitude == best_magnitude && closer) {
                    Some((exposure.strike, magnitude))
                } else {
                    Some((best_strike, best_magnitude))
                }
            }
        };
    }

    best.map(|(strike, _)| strike)
}

/// Locates the zero-gamma flip by scanning sorted strikes for the first sign
/// change in `net_gex` and interpolating linearly between the bracketing
/// pair. A strike sitting exactly at zero is itself the flip.
fn find_zero_gamma(sorted: &[&StrikeExposure]) -> Option<f64> {
    for (i, exposure) in sorted.iter().enumerate() {
        if exposure.net_gex == 0.0 {
            return Some(exposure.strike);
        }
        if i + 1 < sorted.len() {
            let next = sorted[i + 1];
            if exposure.net_gex * next.net_gex < 0.0 {
                let fraction = (0.0 - exposure.net_gex) / (next.net_gex - exposure.net_gex);
                return Some(exposure.strike + fraction * (next.strike - exposure.strike));
            }
        }
    }
    None
}

fn find_flip_zone(sorted: &[&StrikeExposure], spot_price: f64) -> Option<FlipZone> {
    let peak = sorted
        .iter()
        .map(|e| e.net_gex.abs())
        .fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return None;
    }

    let threshold = FLIP_ZONE_FRACTION * peak;
    let mut lower = f64::INFINITY;
    let mut upper = f64::NEG_INFINITY;
    for exposure in sorted {
        if exposure.net_gex.abs() <= threshold {
            lower = lower.min(exposure.strike);
            upper = upper.max(exposure.strike);
        }
    }
    if lower > upper {
        return None;
    }

    Some(FlipZone {
        lower,
        upper,
        width: upper - lower,
        spot_in_zone: lower <= spot_price && spot_price <= upper,
    })
}

fn find_high_gamma_strikes(strikes: &[StrikeExposure]) -> Vec<HighGammaStrike> {
    let mut ranked: Vec<&StrikeExposure> =
        strikes.iter().filter(|e| e.net_gex != 0.0).collect();
    ranked.sort_by(|a, b| {
        b.net_gex
            .abs()
            .partial_cmp(&a.net_gex.abs())
            .unwrap_or(Ordering::Equal)
    });

    ranked
        .into_iter()
        .take(HIGH_GAMMA_COUNT)
        .map(|e| HighGammaStrike {
            strike: e.strike,
            net_gex: e.net_gex,
            dominant_side: if e.call_gex.abs() > e.put_gex.abs() {
                OptionSide::Call
            } else {
                OptionSide::Put
            },
        })
        .collect()
}

fn gamma_profile(strikes: &[StrikeExposure], spot_price: f64) -> Option<GammaProfile> {
    let total_abs: f64 = strikes.iter().map(|e| e.net_gex.abs()).sum();
    if total_abs <= 0.0 {
        return None;
    }

    let weighted_strike: f64 = strikes
        .iter()
        .map(|e| e.strike * e.net_gex.abs())
        .sum::<f64>()
        / total_abs;

    let band = NEAR_SPOT_BAND_PCT * spot_price;
    let near_spot: f64 = strikes
        .iter()
        .filter(|e| (e.strike - spot_price).abs() <= band)
        .map(|e| e.net_gex.abs())
        .sum();

    Some(GammaProfile {
        skew: (weighted_strike - spot_price) / spot_price,
        concentration_near_spot: near_spot / total_abs,
    })
}

/// Derives all structural levels from the per-strike exposure map.
///
/// # Parameters
/// * `strikes` - Per-strike exposures (any order; sorted internally).
/// * `spot_price` - Current underlying price.
/// * `min_gex_threshold` - Minimum `|GEX|` for wall candidacy.
///
/// # Returns
/// A [`Levels`] value; an empty input yields the all-`None` default and
/// never an error.
pub fn find_levels(strikes: &[StrikeExposure], spot_price: f64, min_gex_threshold: f64) -> Levels {
    if strikes.is_empty() {
        return Levels::default();
    }

    let mut sorted: Vec<&StrikeExposure> = strikes.iter().collect();
    sorted.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap_or(Ordering::Equal));

    Levels {
        call_wall: find_wall(strikes, spot_price, min_gex_threshold, OptionSide::Call),
        put_wall: find_wall(strikes, spot_price, min_gex_threshold, OptionSide::Put),
        zero_gamma: find_zero_gamma(&sorted),
        flip_zone: find_flip_zone(&sorted, spot_price),
        high_gamma_strikes: find_high_gamma_strikes(strikes),
        gamma_profile: gamma_profile(strikes, spot_price),
    }
}
