use crate::error::{AnalysisResult, validate_period};
use crate::indicator::utils::rolling_mean;
use crate::indicator::{IndicatorSeries, TABuilder};
use crate::model::{Candle, IndicatorValue};

/// 종가 단순이동평균(SMA) 시계열 계산
///
/// 앞쪽 `period - 1`개 위치는 `Undefined`입니다.
pub fn compute_sma(closes: &[f64], period: usize) -> AnalysisResult<IndicatorSeries> {
    validate_period(period, "SMA period")?;

    let values = rolling_mean(closes, period)
        .into_iter()
        .map(IndicatorValue::from)
        .collect();

    Ok(IndicatorSeries::new(format!("SMA({})", period), values))
}

#[derive(Debug, Clone)]
pub struct SMABuilder {
    period: usize,
}

impl SMABuilder {
    pub fn new(period: usize) -> AnalysisResult<Self> {
        validate_period(period, "SMA period")?;
        Ok(SMABuilder { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl<C> TABuilder<IndicatorSeries, C> for SMABuilder
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> AnalysisResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|item| item.close_price()).collect();
        compute_sma(&closes, self.period)
    }
}
