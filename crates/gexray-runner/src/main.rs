//! # Gexray Analysis Runner
//!
//! Thin CLI wiring for the gamma-exposure engine.
//!
//! ## Description
//! Loads a chain snapshot through the file-backed provider, runs the full
//! analysis pipeline, prints the JSON result, and optionally writes a report
//! file. All numerical work lives in `gexray-engine`; this binary is glue.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gexray_engine::{AnalysisReport, EngineConfig, GexAnalyzer};
use gexray_providers::FileChainProvider;
use serde::Deserialize;
use tracing::{info, warn, Level};

/// Gexray Gamma Exposure Analyzer Command Line Interface
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Underlying symbol to analyze
    #[arg(short, long, default_value = "SPY")]
    symbol: String,

    /// Directory holding <SYMBOL>.json chain snapshots
    #[arg(long, default_value = "data/chains")]
    chain_dir: String,

    /// Reject snapshots older than this many minutes (0 disables the check)
    #[arg(long, default_value = "0")]
    max_age_minutes: i64,

    /// Override default config file path
    #[arg(long, default_value = "configs/gexray.toml")]
    config: String,

    /// Write the analysis report JSON into this directory
    #[arg(long)]
    out: Option<String>,
}

/// Root configuration schema for the runner.
#[derive(Debug, Deserialize, Default)]
struct RunnerConfig {
    #[serde(default)]
    engine: EngineConfig,
}

fn load_config(path: &str) -> anyhow::Result<RunnerConfig> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let config: RunnerConfig =
                toml::from_str(&raw).with_context(|| format!("failed to parse {path}"))?;
            info!(path, "loaded runner config");
            Ok(config)
        }
        Err(_) => {
            warn!(path, "config file not found, using defaults");
            Ok(RunnerConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let mut provider = FileChainProvider::new(&args.chain_dir);
    if args.max_age_minutes > 0 {
        provider = provider.with_max_age_minutes(args.max_age_minutes);
    }

    let analyzer = GexAnalyzer::new(Arc::new(provider), config.engine);
    let analysis = analyzer.analyze_symbol(&args.symbol)?;

    info!(
        symbol = %analysis.symbol,
        regime = analysis.regime.as_str(),
        net_gex_bn = analysis.net_gex / 1e9,
        call_wall = ?analysis.levels.call_wall,
        put_wall = ?analysis.levels.put_wall,
        zero_gamma = ?analysis.levels.zero_gamma,
        "analysis complete"
    );

    println!("{}", serde_json::to_string_pretty(&analysis)?);

    if let Some(out) = args.out {
        let path = AnalysisReport::new(analysis).write(Path::new(&out))?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
