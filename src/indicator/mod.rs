// 기술적 지표 모듈
// 입력 시계열과 위치가 1:1로 정렬된 지표 시계열을 계산합니다.

pub mod obv;
pub mod rsi;
pub mod sma;
pub mod utils;

use crate::bar_series::BarSeries;
use crate::error::AnalysisResult;
use crate::model::{Candle, IndicatorValue};
use serde::Serialize;
use std::fmt::Display;

/// 입력 시계열과 위치 기준으로 정렬된 지표 시계열
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    /// 지표 이름 (예: "RSI(14)")
    name: String,
    /// 위치별 지표 값
    values: Vec<IndicatorValue>,
}

impl Display for IndicatorSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}개, 정의됨 {}개]",
            self.name,
            self.values.len(),
            self.defined_count()
        )
    }
}

impl IndicatorSeries {
    /// 새 지표 시계열 생성
    ///
    /// # Arguments
    /// * `name` - 지표 이름
    /// * `values` - 위치별 값
    pub fn new(name: impl Into<String>, values: Vec<IndicatorValue>) -> Self {
        IndicatorSeries {
            name: name.into(),
            values,
        }
    }

    /// 모든 위치가 `Undefined`인 시계열 생성
    pub fn undefined(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![IndicatorValue::Undefined; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 위치별 값 슬라이스
    pub fn values(&self) -> &[IndicatorValue] {
        &self.values
    }

    /// 지정 위치의 값 (범위를 벗어나면 `Undefined`)
    pub fn get(&self, index: usize) -> IndicatorValue {
        self.values
            .get(index)
            .copied()
            .unwrap_or(IndicatorValue::Undefined)
    }

    /// 정의된 값의 개수
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_defined()).count()
    }

    /// 앞쪽에 연속으로 나오는 `Undefined` 개수
    pub fn leading_undefined(&self) -> usize {
        self.values
            .iter()
            .take_while(|v| v.is_undefined())
            .count()
    }

    /// 가장 최근에 정의된 값
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| v.value())
    }

    /// `Option<f64>` 벡터로 변환
    pub fn to_options(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|v| v.value()).collect()
    }
}

/// 기술적 지표 생성 인터페이스
///
/// 봉 데이터에서 지표를 계산하는 빌더. 계산은 입력을 변경하지 않는 순수 함수입니다.
pub trait TABuilder<T, C: Candle>: std::fmt::Debug {
    /// 시계열에서 기술적 지표 생성
    ///
    /// # Arguments
    /// * `series` - 봉 시계열
    ///
    /// # Returns
    /// * `AnalysisResult<T>` - 생성된 기술적 지표
    fn from_series(&self, series: &BarSeries<C>) -> AnalysisResult<T> {
        self.build(series.items())
    }

    /// 봉 슬라이스에서 기술적 지표 생성
    fn build(&self, data: &[C]) -> AnalysisResult<T>;
}
