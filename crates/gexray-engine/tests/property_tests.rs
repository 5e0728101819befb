//! Property-based tests using proptest
//!
//! These tests verify invariants of the exposure calculator, level finder,
//! and regime analyzer across randomized chains.

use proptest::prelude::*;

use gexray_engine::exposure::{calculate_gex, CalcParams, GammaRegime};
use gexray_engine::levels::find_levels;
use gexray_engine::regime::{analyze_regime, RegimeThresholds};
use gexray_models::OptionRecord;

fn arb_record() -> impl Strategy<Value = OptionRecord> {
    (
        10.0_f64..5000.0,
        0_i32..60,
        0.0_f64..0.5,
        0.0_f64..0.5,
        0.0_f64..50_000.0,
        0.0_f64..50_000.0,
    )
        .prop_map(|(strike, dte, call_gamma, put_gamma, call_oi, put_oi)| {
            OptionRecord::new(strike, dte)
                .with_call(call_gamma, call_oi)
                .with_put(put_gamma, put_oi)
        })
}

fn arb_chain() -> impl Strategy<Value = Vec<OptionRecord>> {
    prop::collection::vec(arb_record(), 0..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Per-strike and aggregate identity: net is always call plus put.
    #[test]
    fn net_gex_is_call_plus_put(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let result = calculate_gex(spot, &chain, &CalcParams::default()).unwrap();
        for exposure in &result.strikes {
            prop_assert_eq!(exposure.net_gex, exposure.call_gex + exposure.put_gex);
        }
        prop_assert_eq!(result.net_gex, result.total_call_gex + result.total_put_gex);
    }

    /// The calculator's regime field follows the sign of net exposure.
    #[test]
    fn calculator_regime_follows_sign(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let result = calculate_gex(spot, &chain, &CalcParams::default()).unwrap();
        match result.regime {
            GammaRegime::Positive => prop_assert!(result.net_gex > 0.0),
            GammaRegime::Negative => prop_assert!(result.net_gex < 0.0),
            GammaRegime::Neutral => prop_assert!(result.net_gex == 0.0),
        }
    }

    /// Walls always sit on their own side of spot, and the flip zone is a
    /// well-ordered band.
    #[test]
    fn levels_are_well_formed(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let result = calculate_gex(spot, &chain, &CalcParams::default()).unwrap();
        let levels = find_levels(&result.strikes, spot, 0.0);

        if let Some(call_wall) = levels.call_wall {
            prop_assert!(call_wall > spot);
        }
        if let Some(put_wall) = levels.put_wall {
            prop_assert!(put_wall < spot);
        }
        if let Some(zone) = levels.flip_zone {
            prop_assert!(zone.lower <= zone.upper);
            prop_assert_eq!(zone.width, zone.upper - zone.lower);
        }
        prop_assert!(levels.high_gamma_strikes.len() <= 5);
    }

    /// Confidence never leaves [0, 1] regardless of chain shape.
    #[test]
    fn confidence_is_bounded(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let result = calculate_gex(spot, &chain, &CalcParams::default()).unwrap();
        let levels = find_levels(&result.strikes, spot, 0.0);
        let analysis = analyze_regime(&result, &levels, spot, &RegimeThresholds::default());
        prop_assert!((0.0..=1.0).contains(&analysis.confidence));
    }

    /// The Herfindahl concentration index stays in [0, 1].
    #[test]
    fn concentration_is_bounded(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let result = calculate_gex(spot, &chain, &CalcParams::default()).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&result.stats.concentration));
    }

    /// Identical inputs produce numerically identical results: the full
    /// pipeline is deterministic outside of the capture timestamp.
    #[test]
    fn pipeline_is_idempotent(chain in arb_chain(), spot in 50.0_f64..4000.0) {
        let params = CalcParams::default();
        let thresholds = RegimeThresholds::default();

        let first = calculate_gex(spot, &chain, &params).unwrap();
        let second = calculate_gex(spot, &chain, &params).unwrap();

        prop_assert_eq!(&first.strikes, &second.strikes);
        prop_assert_eq!(first.net_gex, second.net_gex);
        prop_assert_eq!(&first.stats, &second.stats);

        let levels_a = find_levels(&first.strikes, spot, 0.0);
        let levels_b = find_levels(&second.strikes, spot, 0.0);
        prop_assert_eq!(&levels_a, &levels_b);

        let regime_a = analyze_regime(&first, &levels_a, spot, &thresholds);
        let regime_b = analyze_regime(&second, &levels_b, spot, &thresholds);
        prop_assert_eq!(regime_a, regime_b);
    }
}
