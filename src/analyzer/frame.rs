use crate::analyzer::extrema::{Extrema, ExtremaDetector};
use crate::analyzer::zone::ZoneConsolidator;
use crate::bar_series::BarSeries;
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::indicator::obv::{
    FlowPhase, OBVBuilder, VolumePressure, classify_volume_pressure, flow_phases,
};
use crate::indicator::rsi::{RSIBuilder, RsiZone, classify_rsi};
use crate::indicator::sma::SMABuilder;
use crate::indicator::{IndicatorSeries, TABuilder};
use crate::model::{Candle, IndicatorValue, PivotKind, Zone};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

/// 분석 프레임의 한 행
///
/// 봉 데이터와 같은 위치의 모든 파생 지표 값을 함께 가집니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    pub index: usize,
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi: IndicatorValue,
    pub rsi_zone: RsiZone,
    pub obv: IndicatorValue,
    pub flow: FlowPhase,
    pub volume_pressure: VolumePressure,
    /// 설정의 `sma_periods` 순서와 같은 이동평균 값
    pub smas: Vec<IndicatorValue>,
    pub is_support: bool,
    pub is_resistance: bool,
    pub in_support_zone: bool,
    pub in_resistance_zone: bool,
}

impl Display for FrameRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} close={:.2} vol={:.0} RSI={} ({}) OBV={} ({})",
            self.index,
            self.datetime.format("%Y-%m-%d"),
            self.close,
            self.volume,
            self.rsi,
            self.rsi_zone,
            self.obv,
            self.flow
        )
    }
}

/// 위치 기준으로 정렬된 분석 결과
///
/// 모든 행은 입력 시계열과 같은 순서이며, 피벗/가격대 인덱스도 같은 스냅샷을 기준으로 합니다.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFrame {
    rows: Vec<FrameRow>,
    sma_periods: Vec<usize>,
    extrema: Extrema,
    support_zones: Vec<Zone>,
    resistance_zones: Vec<Zone>,
}

fn zone_flags(len: usize, zones: &[Zone]) -> Vec<bool> {
    let mut flags = vec![false; len];
    for zone in zones {
        for flag in flags
            .iter_mut()
            .take(zone.end_index + 1)
            .skip(zone.start_index)
        {
            *flag = true;
        }
    }
    flags
}

impl AnalysisFrame {
    /// 시계열 전체에 대해 모든 지표를 계산합니다.
    ///
    /// # Arguments
    /// * `series` - 봉 시계열
    /// * `config` - 분석 설정
    ///
    /// # Returns
    /// * `AnalysisResult<AnalysisFrame>` - 설정 값이 잘못되면 계산 전에 오류
    pub fn build<C: Candle>(
        series: &BarSeries<C>,
        config: &AnalysisConfig,
    ) -> AnalysisResult<AnalysisFrame> {
        let rsi_builder = RSIBuilder::new(config.rsi_window)?;
        let detector = ExtremaDetector::new(config.extrema_order)?;
        let consolidator = ZoneConsolidator::new(config.zone_threshold, config.zone_band())?;
        let sma_builders = config
            .sma_periods
            .iter()
            .map(|period| SMABuilder::new(*period))
            .collect::<AnalysisResult<Vec<_>>>()?;

        let rsi = rsi_builder.from_series(series)?;
        let obv = OBVBuilder.from_series(series)?;
        let smas = sma_builders
            .iter()
            .map(|builder| builder.from_series(series))
            .collect::<AnalysisResult<Vec<IndicatorSeries>>>()?;
        let flows = flow_phases(&obv);
        let pressures = classify_volume_pressure(&series.closes(), &series.volumes())?;

        let extrema = detector.from_series(series)?;
        let support_zones = consolidator.consolidate_kind(&extrema, PivotKind::Support)?;
        let resistance_zones = consolidator.consolidate_kind(&extrema, PivotKind::Resistance)?;

        let len = series.len();
        let mut is_support = vec![false; len];
        let mut is_resistance = vec![false; len];
        extrema.supports.iter().for_each(|p| is_support[p.index] = true);
        extrema
            .resistances
            .iter()
            .for_each(|p| is_resistance[p.index] = true);
        let in_support_zone = zone_flags(len, &support_zones);
        let in_resistance_zone = zone_flags(len, &resistance_zones);

        let rows = series
            .items()
            .iter()
            .enumerate()
            .map(|(i, candle)| FrameRow {
                index: i,
                datetime: candle.datetime(),
                open: candle.open_price(),
                high: candle.high_price(),
                low: candle.low_price(),
                close: candle.close_price(),
                volume: candle.volume(),
                rsi: rsi.get(i),
                rsi_zone: classify_rsi(rsi.get(i), config.overbought, config.oversold),
                obv: obv.get(i),
                flow: flows[i],
                volume_pressure: pressures[i],
                smas: smas.iter().map(|sma| sma.get(i)).collect(),
                is_support: is_support[i],
                is_resistance: is_resistance[i],
                in_support_zone: in_support_zone[i],
                in_resistance_zone: in_resistance_zone[i],
            })
            .collect();

        log::debug!(
            "분석 프레임 생성: {}행, 지지 가격대 {}개, 저항 가격대 {}개",
            len,
            support_zones.len(),
            resistance_zones.len()
        );

        Ok(AnalysisFrame {
            rows,
            sma_periods: config.sma_periods.clone(),
            extrema,
            support_zones,
            resistance_zones,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&FrameRow> {
        self.rows.get(index)
    }

    /// 가장 최근 행
    pub fn latest(&self) -> Option<&FrameRow> {
        self.rows.last()
    }

    pub fn sma_periods(&self) -> &[usize] {
        &self.sma_periods
    }

    pub fn extrema(&self) -> &Extrema {
        &self.extrema
    }

    pub fn support_zones(&self) -> &[Zone] {
        &self.support_zones
    }

    pub fn resistance_zones(&self) -> &[Zone] {
        &self.resistance_zones
    }

    pub fn zones_of(&self, kind: PivotKind) -> &[Zone] {
        match kind {
            PivotKind::Support => &self.support_zones,
            PivotKind::Resistance => &self.resistance_zones,
        }
    }

    /// 위치별 매집 여부 (OBV > 0)
    pub fn accumulation_flags(&self) -> Vec<bool> {
        self.rows.iter().map(|row| row.flow.is_accumulation()).collect()
    }

    /// 위치별 분산 여부 (OBV < 0)
    pub fn distribution_flags(&self) -> Vec<bool> {
        self.rows.iter().map(|row| row.flow.is_distribution()).collect()
    }

    /// 가격에서 가장 가까운 가격대
    ///
    /// 지지 가격대는 하단이 가격 이하인 것, 저항 가격대는 상단이 가격 이상인 것만 후보이며,
    /// 가격이 가격대 안에 있으면 거리는 0입니다.
    pub fn nearest_zone(&self, kind: PivotKind, price: f64) -> Option<&Zone> {
        let distance = |zone: &Zone| {
            if zone.contains_price(price) {
                0.0
            } else {
                (zone.lower - price).abs().min((zone.upper - price).abs())
            }
        };

        self.zones_of(kind)
            .iter()
            .filter(|zone| match kind {
                PivotKind::Support => zone.lower <= price,
                PivotKind::Resistance => zone.upper >= price,
            })
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
    }
}
