use thiserror::Error;

/// 분석 엔진 오류
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// 잘못된 파라미터 (계산 전에 즉시 실패)
    #[error("잘못된 설정: {name} - {reason}")]
    InvalidConfiguration { name: String, reason: String },

    /// 병렬 시계열의 길이가 다름
    #[error("시계열 길이 불일치: {left} != {right}")]
    MisalignedSeries { left: usize, right: usize },

    /// 시각이 엄격하게 증가하지 않는 봉
    #[error("시계열 순서 오류: 인덱스 {index}의 시각이 이전 봉보다 늦지 않습니다")]
    UnorderedSeries { index: usize },
}

/// 분석 결과 타입
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// 기간/차수 파라미터 검증
pub fn validate_period(period: usize, name: &str) -> AnalysisResult<()> {
    if period == 0 {
        log::warn!("{} 파라미터 오류: 0보다 커야 합니다", name);
        return Err(AnalysisError::invalid(name, "0보다 커야 합니다"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_period() {
        assert!(validate_period(1, "window").is_ok());
        match validate_period(0, "window") {
            Err(AnalysisError::InvalidConfiguration { name, .. }) => assert_eq!(name, "window"),
            other => panic!("InvalidConfiguration 오류가 발생해야 함: {:?}", other),
        }
    }
}
