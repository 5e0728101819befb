//! # Option Chain Snapshot Types
//!
//! Input contract between data providers and the gamma-exposure engine.
//!
//! ## Description
//! A [`ChainSnapshot`] is an immutable point-in-time capture of one
//! underlying's option chain: spot price plus one [`OptionRecord`] per strike
//! (call and put legs folded into the same row). Gamma and open interest are
//! computed or approximated upstream; the engine never prices options itself.
//!
//! Missing per-strike fields deserialize to zero so a sparse provider file
//! still loads; rows that are unusable after coercion are the engine's
//! problem to skip, not a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-strike option data as delivered by a chain provider.
///
/// # Fields
/// * `strike` - Exercise price, must be positive to be usable.
/// * `dte` - Days to expiry; `0` denotes same-day (0DTE) contracts.
/// * `call_gamma` / `put_gamma` - Per-contract gamma, `0.0` when unavailable.
/// * `call_oi` / `put_oi` - Open interest, nonnegative, `0.0` when unknown.
///
/// The IV and volume fields ride along for downstream diagnostics; the core
/// exposure math ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionRecord {
    pub strike: f64,
    #[serde(default)]
    pub dte: i32,
    #[serde(default)]
    pub call_gamma: f64,
    #[serde(default)]
    pub put_gamma: f64,
    #[serde(default)]
    pub call_oi: f64,
    #[serde(default)]
    pub put_oi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_iv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_iv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_volume: Option<f64>,
}

impl OptionRecord {
    /// Creates a record with zeroed greeks and open interest.
    pub fn new(strike: f64, dte: i32) -> Self {
        Self {
            strike,
            dte,
            ..Self::default()
        }
    }

    /// Sets the call leg (gamma, open interest).
    pub fn with_call(mut self, gamma: f64, oi: f64) -> Self {
        self.call_gamma = gamma;
        self.call_oi = oi;
        self
    }

    /// Sets the put leg (gamma, open interest).
    pub fn with_put(mut self, gamma: f64, oi: f64) -> Self {
        self.put_gamma = gamma;
        self.put_oi = oi;
        self
    }
}

/// Point-in-time capture of one underlying's option chain.
///
/// Snapshots are immutable once constructed: the engine derives everything
/// per `analyze()` call and never writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub symbol: String,
    pub spot_price: f64,
    /// Capture time; defaults to load time for legacy files without it.
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<OptionRecord>,
}

impl ChainSnapshot {
    /// Creates an empty snapshot stamped with the current time.
    pub fn new(symbol: impl Into<String>, spot_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            spot_price,
            captured_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Attaches the per-strike records.
    pub fn with_records(mut self, records: Vec<OptionRecord>) -> Self {
        self.records = records;
        self
    }

    /// Number of strike rows in the snapshot.
    pub fn strike_count(&self) -> usize {
        self.records.len()
    }

    /// Age of the snapshot relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.captured_at
    }
}
