//! Engine error taxonomy.
//!
//! Only caller contract violations surface as errors: a nonsensical spot
//! price or a failing provider collaborator. Bad individual chain rows and
//! degenerate market states (empty chain, no flip crossing) are recovered
//! locally inside the engine and never reach this type.

use thiserror::Error;

/// Failures the gamma-exposure engine reports to its caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Spot price was non-positive or non-finite. This is a broken upstream
    /// collaborator, not a market condition.
    #[error("spot price must be positive and finite, got {0}")]
    InvalidSpot(f64),

    /// The injected chain provider failed to produce a snapshot.
    #[error("provider '{provider}' failed for {symbol}: {source}")]
    Provider {
        symbol: String,
        provider: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
