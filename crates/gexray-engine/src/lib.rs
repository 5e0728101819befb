//! # Gamma Exposure Engine
//!
//! Turns raw option-chain snapshots into dealer gamma exposure (GEX) levels
//! and a tradeable regime read.
//!
//! ## Description
//! Gexray's engine crate estimates the dollar-notional gamma exposure of
//! option dealers from per-strike gamma and open interest, then interprets
//! the resulting exposure curve. It is synchronous, allocation-light, pure
//! computation: no I/O, no background tasks, safe to call concurrently with
//! independent inputs.
//!
//! ### Core Subsystems
//! - **Exposure Calculator**: Signed per-strike and aggregate GEX with an
//!   optional 0DTE amplification multiplier and per-symbol contract
//!   multipliers.
//! - **Level Finder**: Call/put walls, interpolated zero-gamma flip,
//!   flip zone, high-gamma strikes, and a gamma distribution profile.
//! - **Regime Analyzer**: Positive/negative/neutral classification with
//!   magnitude buckets, directional bias, strategy recommendations, and
//!   qualitative risk flags.
//! - **Orchestrator**: [`analyzer::GexAnalyzer`] sequences the three stages
//!   behind a TTL result cache keyed by `(symbol, spot)`.
//!
//! ## Sign Convention
//! Dealers are modeled net-short calls and net-long puts:
//! `call_gex = -γ_c · OI_c · M · S` and `put_gex = +γ_p · OI_p · M · S`.
//! Positive net GEX therefore reads as volatility-dampening dealer hedging,
//! negative as volatility-amplifying.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod exposure;
pub mod levels;
pub mod provider;
pub mod regime;
pub mod report;
pub mod specs;

pub use analyzer::{GexAnalysis, GexAnalyzer};
pub use config::EngineConfig;
pub use error::EngineError;
pub use exposure::{calculate_gex, CalcParams, DistributionStats, GammaRegime, GexResult, StrikeExposure};
pub use levels::{find_levels, FlipZone, GammaProfile, HighGammaStrike, Levels, OptionSide};
pub use provider::{ChainProvider, MockChainProvider};
pub use regime::{
    analyze_regime, diff_regimes, RegimeAnalysis, RegimeBias, RegimeDelta, RegimeMagnitude,
    RegimeThresholds, RiskLevel,
};
pub use report::AnalysisReport;
pub use specs::MultiplierStore;
