use crate::error::{AnalysisError, AnalysisResult};

/// 병렬 시계열 길이가 같은지 확인합니다.
///
/// # Arguments
/// * `left` - 첫 번째 시계열 길이
/// * `right` - 두 번째 시계열 길이
pub fn ensure_aligned(left: usize, right: usize) -> AnalysisResult<()> {
    if left != right {
        log::warn!("시계열 길이 불일치: {} != {}", left, right);
        return Err(AnalysisError::MisalignedSeries { left, right });
    }
    Ok(())
}

/// 후행 단순이동평균(SMA) 시계열 계산
///
/// 위치 i의 값은 `values[i + 1 - period..=i]`의 평균이며,
/// 윈도우가 채워지지 않은 앞쪽 `period - 1`개 위치는 `None`입니다.
///
/// # Arguments
/// * `values` - 입력 값
/// * `period` - 윈도우 크기 (0이면 전부 `None`)
///
/// # Returns
/// * `Vec<Option<f64>>` - 입력과 같은 길이의 이동평균
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    // 0이 아닌 값이 없는 윈도우의 평균은 누적 오차 없이 정확히 0.0
    let mut sum = 0.0;
    let mut non_zero = 0usize;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if *value != 0.0 {
            non_zero += 1;
        }
        if i >= period {
            let dropped = values[i - period];
            sum -= dropped;
            if dropped != 0.0 {
                non_zero -= 1;
            }
        }
        if i + 1 >= period {
            result[i] = Some(if non_zero == 0 { 0.0 } else { sum / period as f64 });
        }
    }

    result
}

/// 위치별 변화량 계산 (첫 위치는 0)
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }

    result.push(0.0);
    result.extend(values.windows(2).map(|pair| pair[1] - pair[0]));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean() {
        let result = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(result, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_rolling_mean_zero_window_is_exact() {
        let values = [0.1, 0.2, 0.3, 0.0, 0.0, 0.0, 0.7];
        let result = rolling_mean(&values, 3);
        assert_eq!(result[5], Some(0.0));
        assert!((result[2].unwrap() - 0.2).abs() < 1e-12);
        assert!((result[6].unwrap() - 0.7 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_mean_long_input() {
        let values: Vec<f64> = (0..10_000).map(|i| (i % 10) as f64).collect();
        let result = rolling_mean(&values, 10);
        assert_eq!(result.iter().filter(|v| v.is_none()).count(), 9);
        assert!(result[9..].iter().all(|v| (v.unwrap() - 4.5).abs() < 1e-9));
    }

    #[test]
    fn test_rolling_mean_short_input() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 3), vec![None, None]);
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn test_diff() {
        assert_eq!(diff(&[10.0, 11.0, 9.0]), vec![0.0, 1.0, -2.0]);
        assert!(diff(&[]).is_empty());
    }

    #[test]
    fn test_ensure_aligned() {
        assert!(ensure_aligned(3, 3).is_ok());
        assert_eq!(
            ensure_aligned(3, 2),
            Err(AnalysisError::MisalignedSeries { left: 3, right: 2 })
        );
    }
}
