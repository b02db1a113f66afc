use crate::bar_series::BarSeries;
use crate::error::{AnalysisResult, validate_period};
use crate::indicator::TABuilder;
use crate::model::{Candle, PivotKind, PivotPoint};
use serde::Serialize;
use std::fmt::Display;

/// 기본 극값 탐색 차수 (좌우 비교 봉 수)
pub const DEFAULT_EXTREMA_ORDER: usize = 5;

/// 극값 탐색 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extrema {
    /// 국소 최저점 (지지 후보)
    pub supports: Vec<PivotPoint>,
    /// 국소 최고점 (저항 후보)
    pub resistances: Vec<PivotPoint>,
}

impl Display for Extrema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extrema(supports: {}, resistances: {})",
            self.supports.len(),
            self.resistances.len()
        )
    }
}

impl Extrema {
    /// 지정한 타입의 피벗 목록
    pub fn of_kind(&self, kind: PivotKind) -> &[PivotPoint] {
        match kind {
            PivotKind::Support => &self.supports,
            PivotKind::Resistance => &self.resistances,
        }
    }
}

/// 위치 i가 범위 내 좌우 `order`개 봉과 비교해 조건을 만족하는지 확인
///
/// 시계열 끝에 가까운 위치는 범위 안에 있는 봉만 비교합니다.
fn is_extremum(prices: &[f64], i: usize, order: usize, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let lo = i.saturating_sub(order);
    let hi = (i + order).min(prices.len() - 1);
    let current = prices[i];
    prices[lo..=hi].iter().all(|&other| cmp(current, other))
}

/// 국소 최저점/최고점 탐색
///
/// 같은 값이 이어지는 구간은 모두 표시됩니다 (`<=`, `>=` 비교).
/// 결과는 원본 순서와 원본 인덱스를 유지합니다.
///
/// # Arguments
/// * `prices` - 가격 시계열
/// * `order` - 좌우로 비교할 봉 수 (1 이상)
///
/// # Returns
/// * `AnalysisResult<Extrema>` - 지지/저항 후보
pub fn find_extrema(prices: &[f64], order: usize) -> AnalysisResult<Extrema> {
    validate_period(order, "extrema order")?;

    let mut extrema = Extrema::default();
    for (i, &price) in prices.iter().enumerate() {
        if is_extremum(prices, i, order, |current, other| current <= other) {
            extrema
                .supports
                .push(PivotPoint::new(i, price, PivotKind::Support));
        }
        if is_extremum(prices, i, order, |current, other| current >= other) {
            extrema
                .resistances
                .push(PivotPoint::new(i, price, PivotKind::Resistance));
        }
    }

    log::debug!(
        "극값 탐색 완료 (order={}): 지지 {}개, 저항 {}개",
        order,
        extrema.supports.len(),
        extrema.resistances.len()
    );
    Ok(extrema)
}

/// 봉 시계열의 종가에서 극값을 찾고 피벗에 시각을 붙입니다.
pub fn find_extrema_in<C: Candle>(series: &BarSeries<C>, order: usize) -> AnalysisResult<Extrema> {
    let mut extrema = find_extrema(&series.closes(), order)?;

    let items = series.items();
    for pivot in extrema
        .supports
        .iter_mut()
        .chain(extrema.resistances.iter_mut())
    {
        pivot.datetime = Some(items[pivot.index].datetime());
    }

    Ok(extrema)
}

/// 극값 탐색기
#[derive(Debug, Clone)]
pub struct ExtremaDetector {
    order: usize,
}

impl ExtremaDetector {
    pub fn new(order: usize) -> AnalysisResult<Self> {
        validate_period(order, "extrema order")?;
        Ok(ExtremaDetector { order })
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Default for ExtremaDetector {
    fn default() -> Self {
        ExtremaDetector {
            order: DEFAULT_EXTREMA_ORDER,
        }
    }
}

impl<C> TABuilder<Extrema, C> for ExtremaDetector
where
    C: Candle,
{
    fn from_series(&self, series: &BarSeries<C>) -> AnalysisResult<Extrema> {
        find_extrema_in(series, self.order)
    }

    fn build(&self, data: &[C]) -> AnalysisResult<Extrema> {
        let closes: Vec<f64> = data.iter().map(|item| item.close_price()).collect();
        find_extrema(&closes, self.order)
    }
}
