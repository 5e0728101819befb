//! End-to-end scenarios for the full analysis pipeline.

use std::sync::Arc;

use gexray_engine::exposure::{calculate_gex, CalcParams, GammaRegime};
use gexray_engine::levels::find_levels;
use gexray_engine::regime::{classify_magnitude, RegimeMagnitude, RegimeThresholds};
use gexray_engine::{EngineConfig, GexAnalyzer, MockChainProvider};
use gexray_models::{ChainSnapshot, OptionRecord};

#[test]
fn test_balanced_book_flips_at_spot() {
    // 1. Two strikes around spot=100: puts at 95, calls at 105, equal size.
    let records = vec![
        OptionRecord::new(95.0, 1).with_put(0.02, 100.0),
        OptionRecord::new(105.0, 1).with_call(0.02, 100.0),
    ];
    let provider = MockChainProvider::new()
        .with_chain(ChainSnapshot::new("SPY", 100.0).with_records(records));
    let analyzer = GexAnalyzer::new(Arc::new(provider), EngineConfig::default());

    // 2. Run the full pipeline.
    let analysis = analyzer.analyze_symbol("SPY").unwrap();

    // 3. Exposure legs: +20k put gex at 95, -20k call gex at 105.
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["strike_exposure"]["95"]["put_gex"].as_f64().unwrap(), 20_000.0);
    assert_eq!(json["strike_exposure"]["105"]["call_gex"].as_f64().unwrap(), -20_000.0);

    // 4. Net washes out, regime reads neutral, and the flip interpolates to
    //    spot exactly.
    assert_eq!(analysis.net_gex, 0.0);
    assert_eq!(analysis.regime, GammaRegime::Neutral);
    let flip = analysis.levels.zero_gamma.expect("flip must resolve");
    assert!((flip - 100.0).abs() < 1e-9, "flip: {}", flip);
}

#[test]
fn test_0dte_amplification_is_exactly_eightfold() {
    let chain = |dte: i32| vec![OptionRecord::new(100.0, dte).with_call(0.02, 100.0).with_put(0.03, 80.0)];
    let params = CalcParams {
        contract_multiplier: 100.0,
        use_0dte_multiplier: true,
        dte_multiplier: 8.0,
    };

    let baseline = calculate_gex(100.0, &chain(1), &params).unwrap();
    let same_day = calculate_gex(100.0, &chain(0), &params).unwrap();

    assert_eq!(same_day.total_call_gex, 8.0 * baseline.total_call_gex);
    assert_eq!(same_day.total_put_gex, 8.0 * baseline.total_put_gex);
}

#[test]
fn test_empty_chain_full_pipeline_degrades_gracefully() {
    let provider =
        MockChainProvider::new().with_chain(ChainSnapshot::new("EMPTY", 100.0));
    let analyzer = GexAnalyzer::new(Arc::new(provider), EngineConfig::default());

    let analysis = analyzer.analyze_symbol("EMPTY").unwrap();
    assert_eq!(analysis.net_gex, 0.0);
    assert_eq!(analysis.total_call_gex, 0.0);
    assert_eq!(analysis.total_put_gex, 0.0);
    assert_eq!(analysis.regime, GammaRegime::Neutral);
    assert!(analysis.strike_exposure.is_empty());
    assert!(analysis.levels.call_wall.is_none());
    assert!(analysis.levels.put_wall.is_none());
    assert!(analysis.levels.zero_gamma.is_none());
    assert!(analysis.levels.flip_zone.is_none());
    assert!(analysis.levels.high_gamma_strikes.is_empty());
}

#[test]
fn test_wall_threshold_excludes_sole_candidate() {
    // The only strike above spot carries gex below the inclusion floor.
    let records = vec![
        OptionRecord::new(90.0, 1).with_put(0.05, 5_000.0),
        OptionRecord::new(105.0, 1).with_call(0.0001, 1.0),
    ];
    let result = calculate_gex(100.0, &records, &CalcParams::default()).unwrap();
    let levels = find_levels(&result.strikes, 100.0, 1_000_000.0);

    assert!(levels.call_wall.is_none(), "sub-threshold strike must not become the wall");
    assert_eq!(levels.put_wall, Some(90.0));
}

#[test]
fn test_magnitude_boundary_is_inclusive_at_one_billion() {
    let thresholds = RegimeThresholds {
        negligible: 1e6,
        moderate: 500e6,
        high: 1e9,
        extreme: 5e9,
    };
    assert_eq!(classify_magnitude(1e9, &thresholds), RegimeMagnitude::High);
    assert_eq!(
        classify_magnitude(1e9 - 1.0, &thresholds),
        RegimeMagnitude::Moderate
    );
}

#[test]
fn test_concentration_extremes() {
    // Single strike holds everything.
    let single = vec![OptionRecord::new(105.0, 1).with_call(0.02, 100.0)];
    let result = calculate_gex(100.0, &single, &CalcParams::default()).unwrap();
    assert!((result.stats.concentration - 1.0).abs() < 1e-12);

    // Equal split across five strikes.
    let five: Vec<OptionRecord> = (0..5)
        .map(|i| OptionRecord::new(105.0 + 5.0 * i as f64, 1).with_call(0.02, 100.0))
        .collect();
    let result = calculate_gex(100.0, &five, &CalcParams::default()).unwrap();
    assert!((result.stats.concentration - 0.2).abs() < 1e-12);
}
