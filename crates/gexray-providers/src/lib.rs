//! # Gexray Chain Providers
//!
//! Swappable implementations of the engine's [`ChainProvider`] contract.
//!
//! ## Description
//! The engine never acquires data itself; it is handed a provider at
//! construction time. This crate supplies the file-cache-backed variant used
//! by the runner and offline analysis. The in-memory mock lives next to the
//! trait in `gexray-engine`.
//!
//! [`ChainProvider`]: gexray_engine::ChainProvider

pub mod file;

pub use file::{FileChainProvider, ProviderError};
