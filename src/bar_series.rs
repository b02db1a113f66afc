use crate::error::{AnalysisError, AnalysisResult};
use crate::model::Candle;
use chrono::{DateTime, Utc};

/// 시간 순서가 보장된 봉 시계열
///
/// 데이터는 datetime 기준 오름차순으로 저장됩니다 (가장 오래된 데이터가 먼저 옴).
/// 생성 이후에는 변경되지 않으며, 모든 지표는 이 스냅샷의 위치 인덱스를 기준으로 정렬됩니다.
#[derive(Debug, Clone)]
pub struct BarSeries<T: Candle> {
    items: Vec<T>,
}

/// 시각이 엄격하게 증가하지 않는 첫 위치를 찾습니다.
fn first_unordered<T: Candle>(items: &[T]) -> Option<usize> {
    items
        .windows(2)
        .position(|pair| pair[1].datetime() <= pair[0].datetime())
        .map(|i| i + 1)
}

impl<T> BarSeries<T>
where
    T: Candle,
{
    /// 이미 정렬된 봉 목록으로 시계열을 생성합니다.
    ///
    /// # Arguments
    /// * `items` - 시각 오름차순 봉 목록
    ///
    /// # Returns
    /// * `AnalysisResult<BarSeries<T>>` - 시각이 중복되거나 역순이면 `UnorderedSeries` 오류
    pub fn new(items: Vec<T>) -> AnalysisResult<BarSeries<T>> {
        if let Some(index) = first_unordered(&items) {
            log::warn!("시계열 순서 오류: 인덱스 {}", index);
            return Err(AnalysisError::UnorderedSeries { index });
        }

        Ok(BarSeries { items })
    }

    /// 정렬되지 않은 봉 목록으로 시계열을 생성합니다.
    ///
    /// datetime 기준으로 오름차순 정렬하고, 같은 시각의 봉은 먼저 나온 것만 남깁니다.
    pub fn from_unordered(mut items: Vec<T>) -> BarSeries<T> {
        items.sort_by_key(|item| item.datetime());

        let before = items.len();
        items.dedup_by(|later, earlier| later.datetime() == earlier.datetime());
        if items.len() != before {
            log::debug!("중복 시각 봉 제거: {}개", before - items.len());
        }

        BarSeries { items }
    }

    /// 저장된 봉 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 가장 오래된 봉
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// 가장 최근 봉
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// 모든 봉에 대한 슬라이스
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 종가 시계열
    pub fn closes(&self) -> Vec<f64> {
        self.items.iter().map(|item| item.close_price()).collect()
    }

    /// 거래량 시계열
    pub fn volumes(&self) -> Vec<f64> {
        self.items.iter().map(|item| item.volume()).collect()
    }

    /// 시각 시계열
    pub fn datetimes(&self) -> Vec<DateTime<Utc>> {
        self.items.iter().map(|item| item.datetime()).collect()
    }

    /// 지정한 시각 이후(포함)의 봉만 남긴 새 시계열을 반환합니다.
    ///
    /// # Arguments
    /// * `start` - 시작 시각 (`None`이면 전체)
    pub fn since(&self, start: Option<DateTime<Utc>>) -> BarSeries<T> {
        let items = match start {
            Some(start) => {
                let from = self.items.partition_point(|item| item.datetime() < start);
                self.items[from..].to_vec()
            }
            None => self.items.clone(),
        };
        BarSeries { items }
    }

    /// 최근 n개 봉의 종가가 연속적으로 상승하는지 확인합니다.
    ///
    /// # Returns
    /// * `bool` - 비교할 봉이 2개 미만이면 false
    pub fn is_rise(&self, n: usize) -> bool {
        let count = self.items.len().min(n);
        if count < 2 {
            return false;
        }

        let recent = &self.items[self.items.len() - count..];
        let rising = recent
            .windows(2)
            .all(|pair| pair[1].close_price() > pair[0].close_price());

        log::trace!("RISE({}): {}", n, rising);
        rising
    }

    /// 최근 n개 봉의 종가가 연속적으로 하락하는지 확인합니다.
    pub fn is_fall(&self, n: usize) -> bool {
        let count = self.items.len().min(n);
        if count < 2 {
            return false;
        }

        let recent = &self.items[self.items.len() - count..];
        let falling = recent
            .windows(2)
            .all(|pair| pair[1].close_price() < pair[0].close_price());

        log::trace!("FALL({}): {}", n, falling);
        falling
    }
}
