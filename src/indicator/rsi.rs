use crate::error::{AnalysisResult, validate_period};
use crate::indicator::utils::{diff, rolling_mean};
use crate::indicator::{IndicatorSeries, TABuilder};
use crate::model::{Candle, IndicatorValue};
use serde::Serialize;
use std::fmt::Display;

/// 기본 RSI 계산 기간
pub const DEFAULT_RSI_WINDOW: usize = 14;
/// 기본 과매수 기준값
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
/// 기본 과매도 기준값
pub const DEFAULT_OVERSOLD: f64 = 30.0;

/// 평균 상승폭/하락폭에서 RSI 값 계산
///
/// 하락폭 평균이 0이면 상승폭이 있을 때 100, 둘 다 0이면 신호가 없으므로 `Undefined`입니다.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> IndicatorValue {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            return IndicatorValue::Value(100.0);
        }
        return IndicatorValue::Undefined;
    }

    let rs = avg_gain / avg_loss;
    IndicatorValue::Value(100.0 - (100.0 / (1.0 + rs)))
}

/// 상대강도지수(RSI) 시계열 계산
///
/// 첫 위치의 변화량은 0으로 취급하므로 앞쪽 `window - 1`개 위치가 `Undefined`이고,
/// 시계열이 `window`보다 짧으면 전부 `Undefined`입니다.
///
/// # Arguments
/// * `closes` - 종가 시계열
/// * `window` - 롤링 윈도우 크기 (1 이상)
///
/// # Returns
/// * `AnalysisResult<IndicatorSeries>` - 입력과 같은 길이의 RSI 시계열
pub fn compute_rsi(closes: &[f64], window: usize) -> AnalysisResult<IndicatorSeries> {
    validate_period(window, "RSI window")?;

    let name = format!("RSI({})", window);
    if closes.len() < window {
        log::debug!("RSI 데이터 부족: {} < {}", closes.len(), window);
        return Ok(IndicatorSeries::undefined(name, closes.len()));
    }

    let changes = diff(closes);
    let gains: Vec<f64> = changes.iter().map(|change| change.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|change| (-change).max(0.0)).collect();

    let avg_gains = rolling_mean(&gains, window);
    let avg_losses = rolling_mean(&losses, window);

    let values = avg_gains
        .iter()
        .zip(avg_losses.iter())
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => rsi_from_averages(*gain, *loss),
            _ => IndicatorValue::Undefined,
        })
        .collect();

    Ok(IndicatorSeries::new(name, values))
}

/// RSI 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RsiZone {
    /// 과매수 (기준값 이상)
    Overbought,
    /// 과매도 (기준값 이하)
    Oversold,
    /// 중립
    Neutral,
    /// 값 없음
    Undefined,
}

impl Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsiZone::Overbought => write!(f, "과매수"),
            RsiZone::Oversold => write!(f, "과매도"),
            RsiZone::Neutral => write!(f, "중립"),
            RsiZone::Undefined => write!(f, "-"),
        }
    }
}

/// RSI 값을 과매수/과매도 구간으로 분류
///
/// # Arguments
/// * `value` - RSI 값
/// * `overbought` - 과매수 기준값 (일반적으로 70)
/// * `oversold` - 과매도 기준값 (일반적으로 30)
pub fn classify_rsi(value: IndicatorValue, overbought: f64, oversold: f64) -> RsiZone {
    match value {
        IndicatorValue::Value(v) if v >= overbought => RsiZone::Overbought,
        IndicatorValue::Value(v) if v <= oversold => RsiZone::Oversold,
        IndicatorValue::Value(_) => RsiZone::Neutral,
        IndicatorValue::Undefined => RsiZone::Undefined,
    }
}

/// 상대강도지수(RSI) 기술적 지표 빌더
#[derive(Debug, Clone)]
pub struct RSIBuilder {
    /// RSI 계산 기간
    period: usize,
}

impl RSIBuilder {
    /// 새 RSI 빌더 생성
    ///
    /// # Arguments
    /// * `period` - RSI 계산 기간 (일반적으로 14)
    ///
    /// # Returns
    /// * `AnalysisResult<RSIBuilder>` - 기간이 0이면 `InvalidConfiguration` 오류
    pub fn new(period: usize) -> AnalysisResult<Self> {
        validate_period(period, "RSI window")?;
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for RSIBuilder {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_WINDOW,
        }
    }
}

impl<C> TABuilder<IndicatorSeries, C> for RSIBuilder
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> AnalysisResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|item| item.close_price()).collect();
        compute_rsi(&closes, self.period)
    }
}
