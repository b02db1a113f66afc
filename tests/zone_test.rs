use trading_signals::analyzer::extrema::find_extrema;
use trading_signals::analyzer::zone::{
    ZoneBand, ZoneConsolidator, consolidate_zones, consolidate_zones_with,
};
use trading_signals::error::AnalysisError;
use trading_signals::model::{PivotKind, PivotPoint, Zone};

const EPSILON: f64 = 1e-9;

fn pivots(points: &[(usize, f64)], kind: PivotKind) -> Vec<PivotPoint> {
    points
        .iter()
        .map(|&(index, price)| PivotPoint::new(index, price, kind))
        .collect()
}

fn assert_zone(zone: &Zone, start: usize, end: usize, lower: f64, upper: f64) {
    assert_eq!((zone.start_index, zone.end_index), (start, end), "{}", zone);
    assert!((zone.lower - lower).abs() < EPSILON, "{}", zone);
    assert!((zone.upper - upper).abs() < EPSILON, "{}", zone);
}

#[test]
fn test_four_adjacent_pivots_form_one_zone() {
    let input = pivots(
        &[(5, 100.0), (6, 102.0), (7, 99.0), (8, 101.0)],
        PivotKind::Resistance,
    );
    let zones = consolidate_zones(&input, 4).unwrap();

    assert_eq!(zones.len(), 1);
    assert_zone(&zones[0], 5, 8, 94.05, 107.1);
    assert_eq!(zones[0].kind, PivotKind::Resistance);
    assert_eq!(zones[0].span(), 4);
}

#[test]
fn test_runs_split_by_index_gap() {
    let input = pivots(
        &[
            (1, 50.0),
            (2, 51.0),
            (3, 52.0),
            (10, 60.0),
            (11, 61.0),
            (12, 62.0),
            (13, 63.0),
        ],
        PivotKind::Support,
    );

    let zones = consolidate_zones(&input, 3).unwrap();
    assert_eq!(zones.len(), 2);
    assert_zone(&zones[0], 1, 3, 47.5, 54.6);
    assert_zone(&zones[1], 10, 13, 57.0, 66.15);

    let zones = consolidate_zones(&input, 4).unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].start_index, 10);
}

#[test]
fn test_threshold_one_keeps_isolated_pivots() {
    let input = pivots(&[(2, 10.0), (7, 20.0), (8, 22.0)], PivotKind::Support);
    let zones = consolidate_zones(&input, 1).unwrap();

    assert_eq!(zones.len(), 2);
    assert_zone(&zones[0], 2, 2, 9.5, 10.5);
    assert_zone(&zones[1], 7, 8, 19.0, 23.1);
}

#[test]
fn test_zone_invariants_hold() {
    let prices: Vec<f64> = (0..80)
        .map(|i| 100.0 + if (i / 6) % 2 == 0 { 0.0 } else { (i % 6) as f64 })
        .collect();
    let extrema = find_extrema(&prices, 1).unwrap();
    let consolidator = ZoneConsolidator::new(3, ZoneBand::default()).unwrap();

    for kind in [PivotKind::Support, PivotKind::Resistance] {
        let source = extrema.of_kind(kind);
        for zone in consolidator.consolidate_kind(&extrema, kind).unwrap() {
            assert!(zone.start_index <= zone.end_index);
            assert!(zone.lower <= zone.upper);
            assert_eq!(zone.kind, kind);
            assert!(zone.span() >= 3);

            let members: Vec<&PivotPoint> = source
                .iter()
                .filter(|p| zone.contains_index(p.index))
                .collect();
            assert_eq!(members.len(), zone.span());
            assert!(members.iter().all(|p| zone.contains_price(p.price)));
        }
    }
}

#[test]
fn test_custom_band() {
    let input = pivots(&[(0, 100.0), (1, 100.0)], PivotKind::Support);
    let band = ZoneBand::new(1.0, 1.0).unwrap();
    let zones = consolidate_zones_with(&input, 2, band).unwrap();
    assert_zone(&zones[0], 0, 1, 100.0, 100.0);
}

#[test]
fn test_invalid_inputs() {
    let input = pivots(&[(0, 1.0)], PivotKind::Support);
    assert!(matches!(
        consolidate_zones(&input, 0),
        Err(AnalysisError::InvalidConfiguration { .. })
    ));

    let mut mixed = pivots(&[(0, 1.0), (1, 2.0)], PivotKind::Support);
    mixed.push(PivotPoint::new(2, 3.0, PivotKind::Resistance));
    assert!(consolidate_zones(&mixed, 2).is_err());

    assert!(ZoneBand::new(1.1, 1.0).is_err());
    assert!(ZoneBand::new(0.0, 1.0).is_err());
    assert!(consolidate_zones(&[], 4).unwrap().is_empty());
}
