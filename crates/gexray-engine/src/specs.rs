//! Per-symbol contract multiplier table.

use serde::Deserialize;
use std::collections::HashMap;

fn default_contract_multiplier() -> f64 {
    100.0
}

/// Contract multiplier lookup by underlying symbol.
///
/// Index options typically carry a different multiplier than single-name or
/// ETF options, so the dollar scaling of GEX must be resolved per symbol.
/// Unknown symbols fall back to `default_multiplier`.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplierStore {
    #[serde(default)]
    by_symbol: HashMap<String, f64>,
    #[serde(default = "default_contract_multiplier")]
    default_multiplier: f64,
}

impl Default for MultiplierStore {
    fn default() -> Self {
        Self {
            by_symbol: HashMap::new(),
            default_multiplier: default_contract_multiplier(),
        }
    }
}

impl MultiplierStore {
    /// Creates an empty store with the given fallback multiplier.
    pub fn new(default_multiplier: f64) -> Self {
        Self {
            by_symbol: HashMap::new(),
            default_multiplier,
        }
    }

    /// Registers a symbol-specific multiplier.
    pub fn insert(&mut self, symbol: &str, multiplier: f64) {
        self.by_symbol.insert(symbol.to_string(), multiplier);
    }

    /// Resolves the contract multiplier for a symbol.
    pub fn multiplier(&self, symbol: &str) -> f64 {
        self.by_symbol
            .get(symbol)
            .copied()
            .unwrap_or(self.default_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_symbol_uses_default() {
        let store = MultiplierStore::default();
        assert_eq!(store.multiplier("SPY"), 100.0);
    }

    #[test]
    fn test_symbol_override() {
        let mut store = MultiplierStore::default();
        store.insert("SPX", 10.0);
        assert_eq!(store.multiplier("SPX"), 10.0);
        assert_eq!(store.multiplier("QQQ"), 100.0);
    }

    #[test]
    fn test_deserialize_partial_table() {
        let store: MultiplierStore =
            serde_json::from_str(r#"{"by_symbol": {"NDX": 10.0}}"#).unwrap();
        assert_eq!(store.multiplier("NDX"), 10.0);
        assert_eq!(store.multiplier("AAPL"), 100.0);
    }
}
