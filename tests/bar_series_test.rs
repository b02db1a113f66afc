use common_test_utils::*;

use chrono::DateTime;
use trading_signals::bar_series::BarSeries;
use trading_signals::error::AnalysisError;
use trading_signals::model::Candle;

#[test]
fn test_new_requires_ascending_order() {
    let candles = vec![
        TestCandle::new(1, 100.0, 105.0, 95.0, 102.0, 1000.0),
        TestCandle::new(3, 110.0, 115.0, 105.0, 112.0, 1000.0),
        TestCandle::new(2, 105.0, 110.0, 100.0, 107.0, 1000.0),
    ];
    let result = BarSeries::new(candles);
    assert!(matches!(result, Err(AnalysisError::UnorderedSeries { index: 2 })));
}

#[test]
fn test_new_rejects_duplicate_datetime() {
    let candles = vec![
        TestCandle::new(1, 100.0, 105.0, 95.0, 102.0, 1000.0),
        TestCandle::new(1, 101.0, 106.0, 96.0, 103.0, 1000.0),
    ];
    assert!(matches!(
        BarSeries::new(candles),
        Err(AnalysisError::UnorderedSeries { index: 1 })
    ));
}

#[test]
fn test_from_unordered_sorts_and_dedups() {
    let candles = vec![
        TestCandle::new(3, 110.0, 115.0, 105.0, 112.0, 1000.0),
        TestCandle::new(1, 100.0, 105.0, 95.0, 102.0, 1000.0),
        TestCandle::new(2, 105.0, 110.0, 100.0, 107.0, 1000.0),
        TestCandle::new(1, 999.0, 999.0, 999.0, 999.0, 1000.0),
    ];
    let series = BarSeries::from_unordered(candles);

    assert_eq!(series.len(), 3);
    assert_eq!(series.first().unwrap().datetime().timestamp(), 1);
    assert_eq!(series.last().unwrap().datetime().timestamp(), 3);
    assert_eq!(series.closes(), vec![102.0, 107.0, 112.0]);
}

#[test]
fn test_parallel_accessors_are_aligned() {
    let series = BarSeries::new(create_candles(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0])).unwrap();

    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.volumes(), vec![10.0, 20.0, 30.0]);
    assert_eq!(series.datetimes().len(), 3);
    assert_eq!(series.get(1).unwrap().close_price(), 2.0);
    assert!(series.get(3).is_none());
}

#[test]
fn test_since_filters_by_datetime() {
    let series = BarSeries::new(create_trend_candles(10, 100.0, 1.0)).unwrap();

    let start = DateTime::from_timestamp(4 * DAY, 0);
    let recent = series.since(start);
    assert_eq!(recent.len(), 6);
    assert_eq!(recent.first().unwrap().datetime(), start.unwrap());

    assert_eq!(series.since(None).len(), 10);

    let future = DateTime::from_timestamp(100 * DAY, 0);
    assert!(series.since(future).is_empty());
}

#[test]
fn test_is_rise_and_fall() {
    let up = BarSeries::new(create_trend_candles(5, 100.0, 1.0)).unwrap();
    assert!(up.is_rise(3));
    assert!(!up.is_fall(3));

    let down = BarSeries::new(create_trend_candles(5, 100.0, -1.0)).unwrap();
    assert!(down.is_fall(5));
    assert!(!down.is_rise(2));

    let flat = BarSeries::new(create_candles(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0])).unwrap();
    assert!(!flat.is_rise(3));
    assert!(!flat.is_fall(3));
    assert!(!up.is_rise(1));
}

#[test]
fn test_empty_series() {
    let series = BarSeries::<TestCandle>::new(Vec::new()).unwrap();
    assert!(series.is_empty());
    assert!(series.first().is_none());
    assert!(!series.is_rise(3));
}
