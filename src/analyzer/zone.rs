use crate::analyzer::extrema::Extrema;
use crate::error::{AnalysisError, AnalysisResult, validate_period};
use crate::model::{PivotKind, PivotPoint, Zone};
use serde::{Deserialize, Serialize};

/// 기본 최소 연속 피벗 수
pub const DEFAULT_ZONE_THRESHOLD: usize = 4;
/// 기본 하단 여유 배수
pub const DEFAULT_LOWER_FACTOR: f64 = 0.95;
/// 기본 상단 여유 배수
pub const DEFAULT_UPPER_FACTOR: f64 = 1.05;

/// 가격대 상/하단 여유 배수
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    /// 최저가에 곱하는 배수 (기본값 0.95)
    pub lower_factor: f64,
    /// 최고가에 곱하는 배수 (기본값 1.05)
    pub upper_factor: f64,
}

impl Default for ZoneBand {
    fn default() -> Self {
        ZoneBand {
            lower_factor: DEFAULT_LOWER_FACTOR,
            upper_factor: DEFAULT_UPPER_FACTOR,
        }
    }
}

impl ZoneBand {
    pub fn new(lower_factor: f64, upper_factor: f64) -> AnalysisResult<Self> {
        let band = ZoneBand {
            lower_factor,
            upper_factor,
        };
        band.validate()?;
        Ok(band)
    }

    /// 배수 검증: `0 < lower_factor <= upper_factor`
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.lower_factor > 0.0 && self.upper_factor.is_finite()) {
            return Err(AnalysisError::invalid(
                "zone band",
                format!(
                    "배수는 양의 유한값이어야 합니다: {} / {}",
                    self.lower_factor, self.upper_factor
                ),
            ));
        }
        if self.lower_factor > self.upper_factor {
            return Err(AnalysisError::invalid(
                "zone band",
                format!(
                    "하단 배수가 상단 배수보다 큽니다: {} > {}",
                    self.lower_factor, self.upper_factor
                ),
            ));
        }
        Ok(())
    }
}

/// 연속 구간 하나를 가격대로 변환 (길이가 threshold 미만이면 `None`)
fn zone_from_run(run: &[PivotPoint], threshold: usize, band: ZoneBand) -> Option<Zone> {
    let (first, last) = (run.first()?, run.last()?);
    if run.len() < threshold {
        return None;
    }

    let low = run.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let high = run.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

    let zone = Zone {
        start_index: first.index,
        end_index: last.index,
        lower: low * band.lower_factor,
        upper: high * band.upper_factor,
        kind: first.kind,
    };
    log::trace!("가격대 생성: {}", zone);
    Some(zone)
}

/// 기본 여유 배수(0.95/1.05)로 인접 피벗을 가격대로 묶습니다.
pub fn consolidate_zones(pivots: &[PivotPoint], threshold: usize) -> AnalysisResult<Vec<Zone>> {
    consolidate_zones_with(pivots, threshold, ZoneBand::default())
}

/// 원본 시계열에서 인덱스가 정확히 1씩 이어지는 피벗들을 가격대로 묶습니다.
///
/// 길이가 `threshold` 이상인 구간만 가격대가 되며, 마지막 구간도 포함됩니다.
/// 서로 다른 인덱스 구간에서 나온 가격대는 가격 범위가 겹쳐도 합치지 않습니다.
///
/// # Arguments
/// * `pivots` - 한 가지 타입의 피벗 (원본 순서)
/// * `threshold` - 최소 연속 피벗 수 (1 이상)
/// * `band` - 상/하단 여유 배수
///
/// # Returns
/// * `AnalysisResult<Vec<Zone>>` - 가격대 목록 (피벗이 없으면 빈 목록)
pub fn consolidate_zones_with(
    pivots: &[PivotPoint],
    threshold: usize,
    band: ZoneBand,
) -> AnalysisResult<Vec<Zone>> {
    validate_period(threshold, "zone threshold")?;
    band.validate()?;

    let Some(first) = pivots.first() else {
        return Ok(Vec::new());
    };
    if let Some(other) = pivots.iter().find(|p| p.kind != first.kind) {
        return Err(AnalysisError::invalid(
            "pivots",
            format!("한 가지 타입만 허용됩니다: {} / {}", first.kind, other.kind),
        ));
    }

    let mut zones = Vec::new();
    let mut run_start = 0;
    for i in 1..=pivots.len() {
        let run_ends = i == pivots.len() || pivots[i].index != pivots[i - 1].index + 1;
        if run_ends {
            zones.extend(zone_from_run(&pivots[run_start..i], threshold, band));
            run_start = i;
        }
    }

    log::debug!(
        "{} 가격대 {}개 (피벗 {}개, threshold={})",
        first.kind,
        zones.len(),
        pivots.len(),
        threshold
    );
    Ok(zones)
}

/// 인접 피벗 가격대 생성기
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneConsolidator {
    threshold: usize,
    band: ZoneBand,
}

impl ZoneConsolidator {
    pub fn new(threshold: usize, band: ZoneBand) -> AnalysisResult<Self> {
        validate_period(threshold, "zone threshold")?;
        band.validate()?;
        Ok(ZoneConsolidator { threshold, band })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn band(&self) -> ZoneBand {
        self.band
    }

    /// 한 가지 타입의 피벗을 가격대로 묶습니다.
    pub fn consolidate(&self, pivots: &[PivotPoint]) -> AnalysisResult<Vec<Zone>> {
        consolidate_zones_with(pivots, self.threshold, self.band)
    }

    /// 극값 결과의 지정한 타입을 가격대로 묶습니다.
    pub fn consolidate_kind(&self, extrema: &Extrema, kind: PivotKind) -> AnalysisResult<Vec<Zone>> {
        self.consolidate(extrema.of_kind(kind))
    }
}

impl Default for ZoneConsolidator {
    fn default() -> Self {
        ZoneConsolidator {
            threshold: DEFAULT_ZONE_THRESHOLD,
            band: ZoneBand::default(),
        }
    }
}
