use crate::error::AnalysisResult;
use crate::indicator::utils::ensure_aligned;
use crate::indicator::{IndicatorSeries, TABuilder};
use crate::model::{Candle, IndicatorValue};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Display;

/// 직전 종가 대비 방향에 따른 부호 있는 거래량
fn signed_volume(prev_close: f64, close: f64, volume: f64) -> f64 {
    match close.partial_cmp(&prev_close) {
        Some(Ordering::Greater) => volume,
        Some(Ordering::Less) => -volume,
        _ => 0.0,
    }
}

/// 누적 거래량(OBV) 시계열 계산
///
/// 첫 위치는 0에서 시작하며 모든 위치에서 값이 정의됩니다.
///
/// # Arguments
/// * `closes` - 종가 시계열
/// * `volumes` - 거래량 시계열 (종가와 같은 길이)
///
/// # Returns
/// * `AnalysisResult<IndicatorSeries>` - 길이가 다르면 `MisalignedSeries` 오류
pub fn compute_obv(closes: &[f64], volumes: &[f64]) -> AnalysisResult<IndicatorSeries> {
    ensure_aligned(closes.len(), volumes.len())?;

    let mut values = Vec::with_capacity(closes.len());
    let mut obv = 0.0;
    for i in 0..closes.len() {
        if i > 0 {
            obv += signed_volume(closes[i - 1], closes[i], volumes[i]);
        }
        values.push(IndicatorValue::Value(obv));
    }

    Ok(IndicatorSeries::new("OBV", values))
}

/// OBV 부호에 따른 매집/분산 국면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowPhase {
    /// 매집 (OBV > 0)
    Accumulation,
    /// 분산 (OBV < 0)
    Distribution,
    /// 중립 (OBV == 0 또는 값 없음)
    Neutral,
}

impl FlowPhase {
    pub fn is_accumulation(&self) -> bool {
        *self == FlowPhase::Accumulation
    }

    pub fn is_distribution(&self) -> bool {
        *self == FlowPhase::Distribution
    }
}

impl Display for FlowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowPhase::Accumulation => write!(f, "매집"),
            FlowPhase::Distribution => write!(f, "분산"),
            FlowPhase::Neutral => write!(f, "중립"),
        }
    }
}

impl From<IndicatorValue> for FlowPhase {
    fn from(value: IndicatorValue) -> Self {
        match value {
            IndicatorValue::Value(v) if v > 0.0 => FlowPhase::Accumulation,
            IndicatorValue::Value(v) if v < 0.0 => FlowPhase::Distribution,
            _ => FlowPhase::Neutral,
        }
    }
}

/// OBV 시계열의 위치별 매집/분산 국면
pub fn flow_phases(obv: &IndicatorSeries) -> Vec<FlowPhase> {
    obv.values().iter().map(|v| FlowPhase::from(*v)).collect()
}

/// 가격/거래량 동반 변화 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumePressure {
    /// 가격 상승 + 거래량 증가
    BuyingPressure,
    /// 가격 하락 + 거래량 증가
    SellingPressure,
    /// 그 외
    Neutral,
}

impl Display for VolumePressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumePressure::BuyingPressure => write!(f, "매수세"),
            VolumePressure::SellingPressure => write!(f, "매도세"),
            VolumePressure::Neutral => write!(f, "중립"),
        }
    }
}

/// 위치별 가격/거래량 동반 변화 분류 (첫 위치는 `Neutral`)
pub fn classify_volume_pressure(
    closes: &[f64],
    volumes: &[f64],
) -> AnalysisResult<Vec<VolumePressure>> {
    ensure_aligned(closes.len(), volumes.len())?;

    let mut result = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let pressure = if i == 0 || volumes[i] <= volumes[i - 1] {
            VolumePressure::Neutral
        } else if closes[i] > closes[i - 1] {
            VolumePressure::BuyingPressure
        } else if closes[i] < closes[i - 1] {
            VolumePressure::SellingPressure
        } else {
            VolumePressure::Neutral
        };
        result.push(pressure);
    }

    Ok(result)
}

/// OBV 기술적 지표 빌더
#[derive(Debug, Clone, Default)]
pub struct OBVBuilder;

impl<C> TABuilder<IndicatorSeries, C> for OBVBuilder
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> AnalysisResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|item| item.close_price()).collect();
        let volumes: Vec<f64> = data.iter().map(|item| item.volume()).collect();
        compute_obv(&closes, &volumes)
    }
}
