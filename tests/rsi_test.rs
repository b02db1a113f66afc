use common_test_utils::*;

use trading_signals::bar_series::BarSeries;
use trading_signals::error::AnalysisError;
use trading_signals::indicator::TABuilder;
use trading_signals::indicator::rsi::{RSIBuilder, RsiZone, classify_rsi, compute_rsi};
use trading_signals::model::IndicatorValue;

const EPSILON: f64 = 1e-9;

fn closes_of(candles: &[TestCandle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

#[test]
fn test_rsi_uptrend_is_100() {
    let closes = closes_of(&create_trend_candles(30, 100.0, 1.0));
    let rsi = compute_rsi(&closes, 14).unwrap();

    assert_eq!(rsi.len(), 30);
    assert_eq!(rsi.leading_undefined(), 13);
    for value in &rsi.values()[13..] {
        assert_eq!(*value, IndicatorValue::Value(100.0));
    }
}

#[test]
fn test_rsi_downtrend_is_0() {
    let closes = closes_of(&create_trend_candles(30, 200.0, -1.0));
    let rsi = compute_rsi(&closes, 14).unwrap();

    assert_eq!(rsi.leading_undefined(), 13);
    for value in &rsi.values()[13..] {
        assert!(value.value().unwrap().abs() < EPSILON);
    }
}

#[test]
fn test_rsi_flat_series_is_undefined() {
    let closes = vec![50.0; 20];
    let rsi = compute_rsi(&closes, 5).unwrap();

    assert_eq!(rsi.len(), 20);
    assert_eq!(rsi.defined_count(), 0);
}

#[test]
fn test_rsi_sideways_within_bounds() {
    let closes = closes_of(&create_wave_candles(40, 100.0, 8.0));
    let rsi = compute_rsi(&closes, 14).unwrap();

    assert_eq!(rsi.leading_undefined(), 13);
    for value in &rsi.values()[13..] {
        let v = value.value().unwrap();
        assert!(v > 0.0 && v < 100.0, "RSI 범위 오류: {}", v);
    }
}

#[test]
fn test_rsi_alternating_scenario() {
    let closes = [10.0, 11.0, 9.0, 12.0, 8.0, 13.0, 7.0, 14.0];
    let rsi = compute_rsi(&closes, 3).unwrap();

    // 상승 마감 위치는 RS=2, 하락 마감 위치는 RS=0.5
    assert_eq!(rsi.leading_undefined(), 2);
    for (i, value) in rsi.values().iter().enumerate().skip(2) {
        let expected = if i % 2 == 1 { 200.0 / 3.0 } else { 100.0 / 3.0 };
        assert!((value.value().unwrap() - expected).abs() < EPSILON);
    }
}

#[test]
fn test_rsi_window_one() {
    let rsi = compute_rsi(&[1.0, 2.0, 1.0], 1).unwrap();
    assert_eq!(
        rsi.values(),
        &[
            IndicatorValue::Undefined,
            IndicatorValue::Value(100.0),
            IndicatorValue::Value(0.0)
        ]
    );
}

#[test]
fn test_rsi_short_series() {
    let rsi = compute_rsi(&[1.0, 2.0, 3.0], 14).unwrap();
    assert_eq!(rsi.len(), 3);
    assert_eq!(rsi.defined_count(), 0);

    let empty = compute_rsi(&[], 14).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_rsi_zero_window_rejected() {
    let result = compute_rsi(&[1.0, 2.0, 3.0], 0);
    assert!(matches!(
        result,
        Err(AnalysisError::InvalidConfiguration { .. })
    ));
    assert!(RSIBuilder::new(0).is_err());
}

#[test]
fn test_rsi_builder_matches_function() {
    let candles = create_wave_candles(30, 100.0, 4.0);
    let series = BarSeries::new(candles.clone()).unwrap();

    let built = RSIBuilder::new(7).unwrap().from_series(&series).unwrap();
    let direct = compute_rsi(&closes_of(&candles), 7).unwrap();

    assert_eq!(built, direct);
    assert_eq!(built.name(), "RSI(7)");
}

#[test]
fn test_classify_rsi_zones() {
    assert_eq!(classify_rsi(IndicatorValue::Value(75.0), 70.0, 30.0), RsiZone::Overbought);
    assert_eq!(classify_rsi(IndicatorValue::Value(70.0), 70.0, 30.0), RsiZone::Overbought);
    assert_eq!(classify_rsi(IndicatorValue::Value(25.0), 70.0, 30.0), RsiZone::Oversold);
    assert_eq!(classify_rsi(IndicatorValue::Value(50.0), 70.0, 30.0), RsiZone::Neutral);
    assert_eq!(classify_rsi(IndicatorValue::Undefined, 70.0, 30.0), RsiZone::Undefined);
}
