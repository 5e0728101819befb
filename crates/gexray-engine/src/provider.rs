//! # Chain Provider Interface
//!
//! Defines the collaborator contract for option-chain acquisition.
//!
//! ## Description
//! Following the Adapter pattern, this module decouples the exposure engine
//! from where chain data actually comes from. Provider variants (file-backed,
//! broker-backed, mock) implement the same capability contract and are
//! injected into the orchestrator at construction time — no process-wide
//! provider singletons.
//!
//! The engine must never be handed partial or in-flight data; providers
//! return complete snapshots or an error.

use std::collections::HashMap;

use gexray_models::ChainSnapshot;

/// Capability contract for option-chain data sources.
pub trait ChainProvider: Send + Sync {
    /// Returns a complete chain snapshot for the symbol.
    fn option_chain(&self, symbol: &str) -> anyhow::Result<ChainSnapshot>;

    /// Returns the current spot price for the symbol.
    fn spot_price(&self, symbol: &str) -> anyhow::Result<f64>;

    /// Human-readable name of the data source.
    fn name(&self) -> &'static str;
}

/// In-memory provider for tests and simulation.
#[derive(Debug, Default)]
pub struct MockChainProvider {
    snapshots: HashMap<String, ChainSnapshot>,
}

impl MockChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a snapshot served for its symbol.
    pub fn with_chain(mut self, snapshot: ChainSnapshot) -> Self {
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
        self
    }
}

impl ChainProvider for MockChainProvider {
    fn option_chain(&self, symbol: &str) -> anyhow::Result<ChainSnapshot> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no chain registered for {symbol}"))
    }

    fn spot_price(&self, symbol: &str) -> anyhow::Result<f64> {
        Ok(self.option_chain(symbol)?.spot_price)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gexray_models::OptionRecord;

    #[test]
    fn test_mock_serves_registered_chain() {
        let provider = MockChainProvider::new().with_chain(
            ChainSnapshot::new("SPY", 450.0)
                .with_records(vec![OptionRecord::new(455.0, 1).with_call(0.02, 100.0)]),
        );

        let snapshot = provider.option_chain("SPY").unwrap();
        assert_eq!(snapshot.strike_count(), 1);
        assert_eq!(provider.spot_price("SPY").unwrap(), 450.0);
        assert!(provider.option_chain("QQQ").is_err());
    }
}
