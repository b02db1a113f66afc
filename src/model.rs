use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 시계열 한 구간(봉)에 접근하기 위한 트레이트
///
/// 데이터 공급 계층이 어떤 타입을 쓰든 이 트레이트만 구현하면 분석 엔진에 넘길 수 있습니다.
pub trait Candle: Clone + Debug {
    /// 봉의 시각
    fn datetime(&self) -> DateTime<Utc>;
    /// 시가
    fn open_price(&self) -> f64;
    /// 고가
    fn high_price(&self) -> f64;
    /// 저가
    fn low_price(&self) -> f64;
    /// 종가
    fn close_price(&self) -> f64;
    /// 거래량
    fn volume(&self) -> f64;
}

/// OHLCV 봉 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// 새 봉 생성
    pub fn new(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            datetime,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bar({} o={:.2} h={:.2} l={:.2} c={:.2} v={:.0})",
            self.datetime.format("%Y-%m-%d"),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

impl Candle for Bar {
    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
    fn open_price(&self) -> f64 {
        self.open
    }
    fn high_price(&self) -> f64 {
        self.high
    }
    fn low_price(&self) -> f64 {
        self.low
    }
    fn close_price(&self) -> f64 {
        self.close
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// 지표 값
///
/// 롤링 윈도우가 아직 채워지지 않은 위치는 NaN 대신 `Undefined`로 표시합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IndicatorValue {
    /// 계산된 값
    Value(f64),
    /// 아직 계산할 수 없는 값
    Undefined,
}

impl IndicatorValue {
    /// 계산된 값이면 `Some`, 아니면 `None`
    pub fn value(&self) -> Option<f64> {
        match self {
            IndicatorValue::Value(v) => Some(*v),
            IndicatorValue::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, IndicatorValue::Value(_))
    }

    pub fn is_undefined(&self) -> bool {
        !self.is_defined()
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => IndicatorValue::Value(v),
            None => IndicatorValue::Undefined,
        }
    }
}

impl Display for IndicatorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorValue::Value(v) => write!(f, "{:.2}", v),
            IndicatorValue::Undefined => write!(f, "-"),
        }
    }
}

/// 피벗 타입 (지지/저항)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotKind {
    /// 지지 (국소 최저점)
    Support,
    /// 저항 (국소 최고점)
    Resistance,
}

impl Display for PivotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PivotKind::Support => write!(f, "Support"),
            PivotKind::Resistance => write!(f, "Resistance"),
        }
    }
}

/// 지지/저항 후보 지점
///
/// `index`는 원본 시계열에서의 위치이며, 이 값을 만든 시계열 스냅샷 안에서만 의미가 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotPoint {
    /// 원본 시계열 인덱스
    pub index: usize,
    /// 봉 시각 (가격 배열만으로 계산한 경우 `None`)
    pub datetime: Option<DateTime<Utc>>,
    /// 피벗 가격
    pub price: f64,
    /// 피벗 타입
    pub kind: PivotKind,
}

impl PivotPoint {
    pub fn new(index: usize, price: f64, kind: PivotKind) -> Self {
        PivotPoint {
            index,
            datetime: None,
            price,
            kind,
        }
    }

    /// 시각 정보 설정
    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

impl Display for PivotPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.datetime {
            Some(dt) => write!(
                f,
                "{}[{} @ {}]: {:.2}",
                self.kind,
                self.index,
                dt.format("%Y-%m-%d"),
                self.price
            ),
            None => write!(f, "{}[{}]: {:.2}", self.kind, self.index, self.price),
        }
    }
}

/// 인접한 피벗들을 묶은 가격대
///
/// `start_index <= end_index`, `lower <= upper`를 항상 만족합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub start_index: usize,
    pub end_index: usize,
    pub lower: f64,
    pub upper: f64,
    pub kind: PivotKind,
}

impl Zone {
    /// 구간에 포함된 봉 수
    pub fn span(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// 인덱스가 구간 안에 있는지 확인
    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }

    /// 가격이 가격대 안에 있는지 확인
    pub fn contains_price(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}Zone[{}..={}]: {:.2} ~ {:.2}",
            self.kind, self.start_index, self.end_index, self.lower, self.upper
        )
    }
}
