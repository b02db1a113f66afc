pub mod analyzer;
pub mod bar_series;
pub mod error;
pub mod indicator;
pub mod model;
pub mod period;

/// 설정
pub mod config;
/// 설정 로더
pub mod config_loader;

pub use analyzer::{AnalysisFrame, consolidate_zones, find_extrema};
pub use bar_series::BarSeries;
pub use error::{AnalysisError, AnalysisResult};
pub use indicator::IndicatorSeries;
pub use indicator::obv::compute_obv;
pub use indicator::rsi::compute_rsi;
pub use model::{Bar, Candle, IndicatorValue, PivotKind, PivotPoint, Zone};
