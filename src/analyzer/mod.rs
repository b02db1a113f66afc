// 가격 구조 분석기 모듈
// 지지/저항 후보(극값)를 찾고 인접 후보를 가격대로 묶습니다.

pub mod extrema;
pub mod frame;
pub mod zone;

pub use extrema::{Extrema, ExtremaDetector, find_extrema, find_extrema_in};
pub use frame::{AnalysisFrame, FrameRow};
pub use zone::{ZoneBand, ZoneConsolidator, consolidate_zones, consolidate_zones_with};
