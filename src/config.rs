use crate::analyzer::extrema::DEFAULT_EXTREMA_ORDER;
use crate::analyzer::zone::{
    DEFAULT_LOWER_FACTOR, DEFAULT_UPPER_FACTOR, DEFAULT_ZONE_THRESHOLD, ZoneBand,
};
use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::error::validate_period;
use crate::indicator::rsi::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_WINDOW};
use crate::period::{AnalysisPeriod, PeriodError};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 신호 분석 설정
///
/// 누락된 항목은 기본값으로 채워집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// RSI 계산 기간 (기본값: 14)
    pub rsi_window: usize,
    /// 과매수 기준값 (기본값: 70)
    pub overbought: f64,
    /// 과매도 기준값 (기본값: 30)
    pub oversold: f64,
    /// 극값 탐색 차수 (기본값: 5)
    pub extrema_order: usize,
    /// 가격대 최소 연속 피벗 수 (기본값: 4)
    pub zone_threshold: usize,
    /// 가격대 하단 배수 (기본값: 0.95)
    pub zone_lower_factor: f64,
    /// 가격대 상단 배수 (기본값: 1.05)
    pub zone_upper_factor: f64,
    /// 종가 이동평균 기간 목록 (기본값: [20, 50])
    pub sma_periods: Vec<usize>,
    /// 분석 기간 문자열 (기본값: "ytd")
    pub period: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_window: DEFAULT_RSI_WINDOW,
            overbought: DEFAULT_OVERBOUGHT,
            oversold: DEFAULT_OVERSOLD,
            extrema_order: DEFAULT_EXTREMA_ORDER,
            zone_threshold: DEFAULT_ZONE_THRESHOLD,
            zone_lower_factor: DEFAULT_LOWER_FACTOR,
            zone_upper_factor: DEFAULT_UPPER_FACTOR,
            sma_periods: vec![20, 50],
            period: AnalysisPeriod::default().to_string(),
        }
    }
}

impl AnalysisConfig {
    /// 가격대 여유 배수
    pub fn zone_band(&self) -> ZoneBand {
        ZoneBand {
            lower_factor: self.zone_lower_factor,
            upper_factor: self.zone_upper_factor,
        }
    }

    /// 분석 기간 파싱
    ///
    /// 현재 시각 기준으로 시작 시각을 계산할 수 없는 기간도 오류입니다.
    pub fn analysis_period(&self) -> ConfigResult<AnalysisPeriod> {
        let to_config_error = |e: PeriodError| ConfigError::ValidationError(e.to_string());
        let period: AnalysisPeriod = self.period.parse().map_err(to_config_error)?;
        period.start_date(Utc::now()).map_err(to_config_error)?;
        Ok(period)
    }
}

impl ConfigValidation for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_period(self.rsi_window, "rsi_window")?;
        validate_period(self.extrema_order, "extrema_order")?;
        validate_period(self.zone_threshold, "zone_threshold")?;
        for period in &self.sma_periods {
            validate_period(*period, "sma_periods")?;
        }
        self.zone_band().validate()?;

        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return Err(ConfigError::ValidationError(format!(
                "RSI 기준값은 0 <= oversold < overbought <= 100 이어야 합니다: {} / {}",
                self.oversold, self.overbought
            )));
        }

        self.analysis_period()?;
        Ok(())
    }
}
