//! # Gamma Regime Analyzer
//!
//! Interprets the exposure curve into a trading posture.
//!
//! ## Description
//! Classifies the net exposure into a regime (positive/negative/neutral gamma
//! with a negligible-magnitude band), buckets its magnitude against
//! configurable dollar thresholds, derives a directional bias from where spot
//! sits between the walls, and emits expected-behavior text, ordered strategy
//! recommendations, and qualitative risk flags. Every function here is a pure
//! function of its inputs — no history, no state machine; regime-change
//! detection is a stateless diff of two snapshots.

use serde::Serialize;

use crate::exposure::{GammaRegime, GexResult};
use crate::levels::Levels;

/// Herfindahl concentration at or above which exposure counts as
/// concentrated for gap-risk purposes.
const GAP_RISK_CONCENTRATION: f64 = 0.30;

/// Relative distance from spot to a wall that reads as a pinning setup.
const WALL_PIN_PCT: f64 = 0.01;

/// Dollar-notional breakpoints for regime classification.
///
/// Bucket lower bounds are inclusive: `|net_gex| == high` classifies as
/// `High`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, Serialize)]
#[serde(default)]
pub struct RegimeThresholds {
    /// Below this absolute net GEX the regime is `Neutral`.
    pub negligible: f64,
    pub moderate: f64,
    pub high: f64,
    pub extreme: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            negligible: 1e6,
            moderate: 5e8,
            high: 1e9,
            extreme: 5e9,
        }
    }
}

/// Magnitude bucket of the absolute net exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeMagnitude {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RegimeMagnitude {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegimeMagnitude::Low => "low",
            RegimeMagnitude::Moderate => "moderate",
            RegimeMagnitude::High => "high",
            RegimeMagnitude::Extreme => "extreme",
        }
    }
}

/// Directional bias from spot's position within the wall range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeBias {
    SupportTest,
    ResistanceTest,
    RangeBound,
    Bearish,
    Bullish,
    Volatile,
    Neutral,
}

impl RegimeBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegimeBias::SupportTest => "support test",
            RegimeBias::ResistanceTest => "resistance test",
            RegimeBias::RangeBound => "range bound",
            RegimeBias::Bearish => "bearish",
            RegimeBias::Bullish => "bullish",
            RegimeBias::Volatile => "volatile",
            RegimeBias::Neutral => "neutral",
        }
    }
}

/// Qualitative risk grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

/// Risk flags derived from the exposure structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Proximity of spot to the zero-gamma flip (1% / 2% breakpoints).
    pub gamma_flip_risk: RiskLevel,
    pub volatility_expansion_risk: RiskLevel,
    /// Elevated when exposure is concentrated and the regime is negative.
    pub gap_risk: RiskLevel,
    /// Moderate while spot sits inside the flip zone.
    pub liquidity_risk: RiskLevel,
}

/// Descriptive read of how price is expected to behave in this regime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedBehavior {
    pub volatility: String,
    pub trend: String,
    pub reversal: String,
    /// Bias annotation appended by the analyzer.
    pub note: String,
}

/// Option structure family suggested by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    IronCondor,
    ShortStrangle,
    CreditSpread,
    LongStraddle,
    DirectionalSpread,
    Butterfly,
    Calendar,
    ReduceSize,
}

/// One ordered entry of the recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRecommendation {
    pub strategy: StrategyKind,
    pub rationale: String,
    /// Normalized suggestion confidence (0.0 to 1.0).
    pub confidence: f64,
}

/// Full regime read for one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeAnalysis {
    pub regime: GammaRegime,
    pub magnitude: RegimeMagnitude,
    pub bias: RegimeBias,
    pub expected_behavior: ExpectedBehavior,
    pub recommendations: Vec<StrategyRecommendation>,
    pub risk_metrics: RiskMetrics,
    /// Overall confidence in the read, in [0, 1].
    pub confidence: f64,
}

/// Field-level difference between two regime snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegimeDelta {
    pub regime_changed: bool,
    pub magnitude_changed: bool,
    pub bias_changed: bool,
    /// True when the regime flipped or the magnitude crossed into or out of
    /// the {high, extreme} band.
    pub significant: bool,
}

/// Buckets `|net_gex|` against the configured thresholds.
pub fn classify_magnitude(net_gex: f64, thresholds: &RegimeThresholds) -> RegimeMagnitude {
    let magnitude = net_gex.abs();
    if magnitude >= thresholds.extreme {
        RegimeMagnitude::Extreme
    } else if magnitude >= thresholds.high {
        RegimeMagnitude::High
    } else if magnitude >= thresholds.moderate {
        RegimeMagnitude::Moderate
    } else {
        RegimeMagnitude::Low
    }
}

fn classify_regime(net_gex: f64, thresholds: &RegimeThresholds) -> GammaRegime {
    if net_gex.abs() < thresholds.negligible {
        GammaRegime::Neutral
    } else if net_gex > 0.0 {
        GammaRegime::Positive
    } else {
        GammaRegime::Negative
    }
}

fn classify_bias(regime: GammaRegime, levels: &Levels, spot_price: f64) -> RegimeBias {
    let (Some(call_wall), Some(put_wall)) = (levels.call_wall, levels.put_wall) else {
        return RegimeBias::Neutral;
    };
    let range = call_wall - put_wall;
    if range <= 0.0 {
        return RegimeBias::Neutral;
    }
    let position = (spot_price - put_wall) / range;

    match regime {
        GammaRegime::Positive => {
            if position < 0.2 {
                RegimeBias::SupportTest
            } else if position > 0.8 {
                RegimeBias::ResistanceTest
            } else {
                RegimeBias::RangeBound
            }
        }
        GammaRegime::Negative => {
            if position < 0.3 {
                RegimeBias::Bearish
            } else if position > 0.7 {
                RegimeBias::Bullish
            } else {
                RegimeBias::Volatile
            }
        }
        GammaRegime::Neutral => RegimeBias::Neutral,
    }
}

fn expected_behavior(
    regime: GammaRegime,
    magnitude: RegimeMagnitude,
    bias: RegimeBias,
) -> ExpectedBehavior {
    let (volatility, trend, reversal) = match regime {
        GammaRegime::Positive => (
            "dampened: dealer hedging sells rallies and buys dips",
            "mean-reverting, range-bound",
            "high probability of reversion toward heavy-gamma strikes",
        ),
        GammaRegime::Negative => (
            "amplified: dealer hedging chases price in the direction of the move",
            "trending, momentum-prone",
            "low; intraday moves tend to extend",
        ),
        GammaRegime::Neutral => (
            "unremarkable: dealer positioning exerts little pull",
            "no structural trend pressure",
            "indeterminate",
        ),
    };

    let mut volatility = volatility.to_string();
    match magnitude {
        RegimeMagnitude::Extreme => {
            volatility = format!("strongly {}", volatility);
        }
        RegimeMagnitude::Low => {
            volatility = format!("mildly {}", volatility);
        }
        _ => {}
    }

    ExpectedBehavior {
        volatility,
        trend: trend.to_string(),
        reversal: reversal.to_string(),
        note: format!("{} bias at {} magnitude", bias.as_str(), magnitude.as_str()),
    }
}

/// True when spot sits within the pinning distance of the wall.
fn near_wall(spot_price: f64, wall: Option<f64>) -> bool {
    wall.map(|w| (spot_price - w).abs() / spot_price <= WALL_PIN_PCT)
        .unwrap_or(false)
}

fn build_recommendations(
    regime: GammaRegime,
    magnitude: RegimeMagnitude,
    bias: RegimeBias,
    levels: &Levels,
    spot_price: f64,
) -> Vec<StrategyRecommendation> {
    let mut recommendations = Vec::new();

    match regime {
        GammaRegime::Positive => {
            recommendations.push(StrategyRecommendation {
                strategy: StrategyKind::IronCondor,
                rationale: "positive net gamma dampens realized volatility; premium selling inside the walls is favored".to_string(),
                confidence: 0.65,
            });
            if magnitude >= RegimeMagnitude::Moderate {
                recommendations.push(StrategyRecommendation {
                    strategy: StrategyKind::ShortStrangle,
                    rationale: "sizeable positive exposure reinforces the range; wider short premium has room to work".to_string(),
                    confidence: 0.55,
                });
            }
            if bias == RegimeBias::SupportTest || bias == RegimeBias::ResistanceTest {
                recommendations.push(StrategyRecommendation {
                    strategy: StrategyKind::CreditSpread,
                    rationale: format!(
                        "spot is pressing the {} edge of the wall range; fade the test with defined risk",
                        if bias == RegimeBias::SupportTest { "lower" } else { "upper" }
                    ),
                    confidence: 0.5,
                });
            }
        }
        GammaRegime::Negative => {
            recommendations.push(StrategyRecommendation {
                strategy: StrategyKind::LongStraddle,
                rationale: "negative net gamma amplifies moves; long premium benefits from expansion".to_string(),
                confidence: 0.6,
            });
            recommendations.push(StrategyRecommendation {
                strategy: StrategyKind::DirectionalSpread,
                rationale: match bias {
                    RegimeBias::Bearish => "spot near the put wall in negative gamma; downside continuation is the path of least resistance".to_string(),
                    RegimeBias::Bullish => "spot near the call wall in negative gamma; squeezes can extend".to_string(),
                    _ => "dealer hedging accelerates whichever direction wins; trade with the move, not against it".to_string(),
                },
                confidence: 0.5,
            });
        }
        GammaRegime::Neutral => {
            recommendations.push(StrategyRecommendation {
                strategy: StrategyKind::Calendar,
                rationale: "no dominant dealer positioning; trade time rather than direction".to_string(),
                confidence: 0.4,
            });
        }
    }

    if near_wall(spot_price, levels.call_wall) || near_wall(spot_price, levels.put_wall) {
        recommendations.push(StrategyRecommendation {
            strategy: StrategyKind::Butterfly,
            rationale: "spot is within pinning distance of a gamma wall; expiry gravitation favors tight structures at the wall".to_string(),
            confidence: 0.45,
        });
    }

    if magnitude == RegimeMagnitude::Extreme {
        recommendations.push(StrategyRecommendation {
            strategy: StrategyKind::ReduceSize,
            rationale: "extreme net gamma exposure; hedging flows can gap the tape — cut position size".to_string(),
            confidence: 0.9,
        });
    }

    recommendations
}

fn risk_metrics(
    result: &GexResult,
    levels: &Levels,
    spot_price: f64,
    regime: GammaRegime,
    thresholds: &RegimeThresholds,
) -> RiskMetrics {
    let gamma_flip_risk = match levels.zero_gamma {
        Some(flip) => {
            let distance = (spot_price - flip).abs() / spot_price;
            if distance < 0.01 {
                RiskLevel::High
            } else if distance < 0.02 {
                RiskLevel::Moderate
            } else {
                RiskLevel::Low
            }
        }
        None => RiskLevel::Low,
    };

    let volatility_expansion_risk = if regime == GammaRegime::Negative {
        RiskLevel::High
    } else if result.net_gex.abs() < thresholds.moderate {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let gap_risk = if result.stats.concentration >= GAP_RISK_CONCENTRATION
        && regime == GammaRegime::Negative
    {
        RiskLevel::Elevated
    } else {
        RiskLevel::Low
    };

    let liquidity_risk = match levels.flip_zone {
        Some(zone) if zone.spot_in_zone => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    };

    RiskMetrics {
        gamma_flip_risk,
        volatility_expansion_risk,
        gap_risk,
        liquidity_risk,
    }
}

fn confidence(result: &GexResult, levels: &Levels, magnitude: RegimeMagnitude) -> f64 {
    let mut confidence: f64 = 0.5;

    confidence += match magnitude {
        RegimeMagnitude::Extreme => 0.3,
        RegimeMagnitude::High => 0.2,
        RegimeMagnitude::Moderate => 0.1,
        RegimeMagnitude::Low => 0.0,
    };

    let count = result.strike_count();
    if count > 50 {
        confidence += 0.1;
    } else if count > 20 {
        confidence += 0.05;
    }

    if levels.call_wall.is_some() && levels.put_wall.is_some() {
        confidence += 0.1;
    }

    confidence.min(1.0)
}

/// Interprets one exposure result into a full regime read.
///
/// # Parameters
/// * `result` - Calculator output for the chain.
/// * `levels` - Structural levels for the same chain.
/// * `spot_price` - Current underlying price.
/// * `thresholds` - Dollar-notional regime breakpoints.
///
/// Pure function: identical inputs always produce the identical analysis.
pub fn analyze_regime(
    result: &GexResult,
    levels: &Levels,
    spot_price: f64,
    thresholds: &RegimeThresholds,
) -> RegimeAnalysis {
    let regime = classify_regime(result.net_gex, thresholds);
    let magnitude = classify_magnitude(result.net_gex, thresholds);
    let bias = classify_bias(regime, levels, spot_price);

    RegimeAnalysis {
        regime,
        magnitude,
        bias,
        expected_behavior: expected_behavior(regime, magnitude, bias),
        recommendations: build_recommendations(regime, magnitude, bias, levels, spot_price),
        risk_metrics: risk_metrics(result, levels, spot_price, regime, thresholds),
        confidence: confidence(result, levels, magnitude),
    }
}

/// Stateless diff of two regime snapshots.
///
/// Significance: the regime itself changed, or the magnitude crossed into or
/// out of the {high, extreme} band. A move within the band (high → extreme)
/// is a change but not a significant one.
pub fn diff_regimes(previous: &RegimeAnalysis, current: &RegimeAnalysis) -> RegimeDelta {
    let regime_changed = previous.regime != current.regime;
    let magnitude_changed = previous.magnitude != current.magnitude;
    let bias_changed = previous.bias != current.bias;

    let was_hot = previous.magnitude >= RegimeMagnitude::High;
    let is_hot = current.magnitude >= RegimeMagnitude::High;

    RegimeDelta {
        regime_changed,
        magnitude_changed,
        bias_changed,
        significant: regime_changed || was_hot != is_hot,
    }
}
