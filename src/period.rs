use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// 분석 기간 파싱 오류
#[derive(Debug, Error, PartialEq)]
pub enum PeriodError {
    #[error("잘못된 기간 형식: '{0}' ('3m', '1y', 'ytd', 'all' 형식을 사용하세요)")]
    InvalidFormat(String),

    #[error("기간이 너무 깁니다: '{0}'")]
    OutOfRange(String),
}

/// 분석 기간
///
/// 한 달은 30일, 1년은 365일로 근사합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisPeriod {
    /// n주
    Weeks(u32),
    /// n개월 (n * 30일)
    Months(u32),
    /// n년 (n * 365일)
    Years(u32),
    /// 올해 1월 1일부터
    #[default]
    YearToDate,
    /// 전체 기간
    All,
}

impl Display for AnalysisPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisPeriod::Weeks(n) => write!(f, "{}w", n),
            AnalysisPeriod::Months(n) => write!(f, "{}m", n),
            AnalysisPeriod::Years(n) => write!(f, "{}y", n),
            AnalysisPeriod::YearToDate => write!(f, "ytd"),
            AnalysisPeriod::All => write!(f, "all"),
        }
    }
}

impl FromStr for AnalysisPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "ytd" => return Ok(AnalysisPeriod::YearToDate),
            "all" => return Ok(AnalysisPeriod::All),
            _ => {}
        }

        let invalid = || PeriodError::InvalidFormat(s.to_string());
        let unit_at = normalized.len().checked_sub(1).ok_or_else(invalid)?;
        if !normalized.is_char_boundary(unit_at) {
            return Err(invalid());
        }
        let (digits, unit) = normalized.split_at(unit_at);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let n: u32 = digits.parse().map_err(|_| invalid())?;

        match unit {
            "w" => Ok(AnalysisPeriod::Weeks(n)),
            "m" => Ok(AnalysisPeriod::Months(n)),
            "y" => Ok(AnalysisPeriod::Years(n)),
            _ => Err(invalid()),
        }
    }
}

impl AnalysisPeriod {
    /// 기준 시각에서 분석 시작 시각 계산
    ///
    /// # Arguments
    /// * `today` - 기준 시각
    ///
    /// # Returns
    /// * `Result<Option<DateTime<Utc>>, PeriodError>` - 시작 시각 (`All`이면 `None`),
    ///   표현 가능한 날짜 범위를 벗어나면 `OutOfRange` 오류
    pub fn start_date(&self, today: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, PeriodError> {
        let span = match self {
            AnalysisPeriod::Weeks(n) => TimeDelta::try_weeks(i64::from(*n)),
            AnalysisPeriod::Months(n) => TimeDelta::try_days(i64::from(*n) * 30),
            AnalysisPeriod::Years(n) => TimeDelta::try_days(i64::from(*n) * 365),
            AnalysisPeriod::YearToDate => {
                return Ok(NaiveDate::from_ymd_opt(today.year(), 1, 1)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|datetime| datetime.and_utc()));
            }
            AnalysisPeriod::All => return Ok(None),
        };

        span.and_then(|span| today.checked_sub_signed(span))
            .map(Some)
            .ok_or_else(|| {
                log::warn!("분석 기간 범위 초과: {}", self);
                PeriodError::OutOfRange(self.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_periods() {
        assert_eq!("1w".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Weeks(1)));
        assert_eq!("3m".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Months(3)));
        assert_eq!("2Y".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Years(2)));
        assert_eq!(" YTD ".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::YearToDate));
        assert_eq!("all".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::All));
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["", "m", "3d", "x3m", "3", "-1w", "1.5y", "한달"] {
            assert!(
                input.parse::<AnalysisPeriod>().is_err(),
                "파싱 실패해야 함: {}",
                input
            );
        }
    }

    #[test]
    fn test_start_date() {
        let today = today();
        assert_eq!(
            AnalysisPeriod::Weeks(2).start_date(today),
            Ok(Some(Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(
            AnalysisPeriod::Months(1).start_date(today),
            Ok(Some(Utc.with_ymd_and_hms(2024, 10, 16, 12, 0, 0).unwrap()))
        );
        assert_eq!(
            AnalysisPeriod::Years(1).start_date(today),
            Ok(Some(Utc.with_ymd_and_hms(2023, 11, 16, 12, 0, 0).unwrap()))
        );
        assert_eq!(
            AnalysisPeriod::YearToDate.start_date(today),
            Ok(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(AnalysisPeriod::All.start_date(today), Ok(None));
    }

    #[test]
    fn test_huge_count_is_out_of_range() {
        let period = "99999999y".parse::<AnalysisPeriod>().unwrap();
        assert_eq!(period, AnalysisPeriod::Years(99_999_999));
        assert_eq!(
            period.start_date(today()),
            Err(PeriodError::OutOfRange("99999999y".to_string()))
        );

        for period in [
            AnalysisPeriod::Weeks(u32::MAX),
            AnalysisPeriod::Months(u32::MAX),
            AnalysisPeriod::Years(u32::MAX),
        ] {
            assert!(matches!(
                period.start_date(today()),
                Err(PeriodError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_display_round_trip() {
        for period in [
            AnalysisPeriod::Weeks(4),
            AnalysisPeriod::Months(6),
            AnalysisPeriod::YearToDate,
            AnalysisPeriod::All,
        ] {
            assert_eq!(period.to_string().parse::<AnalysisPeriod>(), Ok(period));
        }
    }
}
