use approx::assert_relative_eq;
use rstest::rstest;
use serde_json::json;

use stock_dashboard::stock_api::normalizer::{model_accuracy, normalize_response};
use stock_dashboard::stock_api::recommendation::{decide, evaluate_signals, IndicatorSnapshot};
use stock_dashboard::stock_api::technical_indicators::{
    mean, moving_average, rsi, volatility, DEFAULT_RSI_PERIOD,
};
use stock_dashboard::stock_api::{Confidence, Recommendation, Trend};

fn sample_series() -> Vec<Vec<f64>> {
    vec![
        vec![100.0, 102.0, 104.0, 103.0, 105.0],
        vec![50.0, 50.0, 50.0, 50.0],
        vec![1.0],
        (0..40).map(|i| 100.0 + ((i * 7) % 11) as f64 - 5.0).collect(),
        (0..30).map(|i| 10.0 + (i as f64).sin()).collect(),
        (0..20).map(|i| 300.0 - i as f64 * 3.5).collect(),
    ]
}

#[test]
fn test_volatility_non_negative_and_zero_only_when_flat() {
    for series in sample_series() {
        let v = volatility(&series).unwrap();
        assert!(v >= 0.0);
        let flat = series.iter().all(|&x| x == series[0]);
        assert_eq!(v == 0.0, flat, "series {:?}", series);
    }
}

#[test]
fn test_moving_average_over_whole_series() {
    for series in sample_series() {
        let whole = mean(&series).unwrap();
        assert_relative_eq!(moving_average(&series, series.len()).unwrap(), whole);
        assert_relative_eq!(moving_average(&series, series.len() + 10).unwrap(), whole);
    }
}

#[test]
fn test_rsi_bounded() {
    for series in sample_series() {
        let value = rsi(&series, DEFAULT_RSI_PERIOD);
        assert!((0.0..=100.0).contains(&value));
        if series.len() < 15 {
            assert_eq!(value, 50.0);
        }
    }
}

#[test]
fn test_flat_series_scenario() {
    let series = [50.0, 50.0, 50.0, 50.0];
    assert_eq!(volatility(&series), Some(0.0));
    assert_eq!(rsi(&series, DEFAULT_RSI_PERIOD), 50.0);
}

#[rstest]
#[case(0.0)]
#[case(50.0)]
#[case(150.0)]
#[case(10_000.0)]
fn test_accuracy_always_clamped(#[case] rmse: f64) {
    let accuracy = model_accuracy(rmse, &[100.0, 101.0, 99.0]);
    assert!((0.0..=100.0).contains(&accuracy));
}

#[test]
fn test_empty_reply_scenario() {
    let result = normalize_response(&json!({}), "AAPL");
    assert!(result.historical_prices.is_empty());
    assert!(result.predictions.is_empty());
    assert_eq!(result.metrics.mse, "0.0000");
    assert_eq!(result.metrics.rmse, "0.0000");
    assert_eq!(result.metrics.mae, "0.0000");
    assert_eq!(result.metrics.accuracy, "100.00");
    assert_eq!(result.metrics.trend, Trend::Neutral);

    // rmse of 20 against the 100 baseline
    let result = normalize_response(&json!({"metrics": {"rmse": 20.0}}), "AAPL");
    assert_eq!(result.metrics.accuracy, "80.00");
}

#[test]
fn test_three_buy_one_sell_scenario() {
    assert_eq!(decide(3, 1), (Recommendation::Buy, Confidence::High));
}

fn mirror(s: &IndicatorSnapshot) -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: 100.0 - s.rsi,
        ma7: 2.0 * s.ma21 - s.ma7,
        ma21: s.ma21,
        current_price: 2.0 * s.ma21 - s.current_price,
        min_price: s.min_price,
        max_price: s.max_price,
        prediction_change: -s.prediction_change,
        volume_trend: -s.volume_trend,
    }
}

#[rstest]
#[case(30.0, 104.0, 106.0, 3.0, 8.0)]
#[case(20.0, 101.0, 103.0, 0.0, 0.0)]
#[case(50.0, 100.0, 100.0, 2.5, -1.0)]
#[case(40.0, 98.0, 97.0, 6.0, 7.0)]
fn test_recommendation_symmetry(
    #[case] rsi_value: f64,
    #[case] ma7: f64,
    #[case] price: f64,
    #[case] prediction_change: f64,
    #[case] volume_trend: f64,
) {
    // wide range so support/resistance stay quiet on both sides
    let snapshot = IndicatorSnapshot {
        rsi: rsi_value,
        ma7,
        ma21: 100.0,
        current_price: price,
        min_price: 10.0,
        max_price: 1000.0,
        prediction_change,
        volume_trend,
    };
    let original = evaluate_signals(&snapshot);
    let mirrored = evaluate_signals(&mirror(&snapshot));

    assert_eq!(original.buy_signals.len(), mirrored.sell_signals.len());
    assert_eq!(original.sell_signals.len(), mirrored.buy_signals.len());
    assert_eq!(original.confidence, mirrored.confidence);

    let flipped = match original.recommendation {
        Recommendation::Buy => Recommendation::Sell,
        Recommendation::Sell => Recommendation::Buy,
        Recommendation::Hold => Recommendation::Hold,
    };
    assert_eq!(mirrored.recommendation, flipped);
}
