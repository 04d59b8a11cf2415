use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested date window. `start` is inclusive, `end` is handed to the
/// provider as an exclusive bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `[today - lookback_days, today]`, or `None` when the start would fall
    /// before the earliest representable date.
    pub fn trailing(today: NaiveDate, lookback_days: u32) -> Option<Self> {
        let start = today.checked_sub_days(Days::new(u64::from(lookback_days)))?;
        Some(Self { start, end: today })
    }

    /// Whether `date` falls in `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn trailing_year_window() {
        let r = DateRange::trailing(d(2024, 6, 30), 365).unwrap();
        assert_eq!(r.start, d(2023, 7, 1));
        assert_eq!(r.end, d(2024, 6, 30));
    }

    #[test]
    fn end_is_exclusive() {
        let r = DateRange::trailing(d(2024, 1, 10), 5).unwrap();
        assert!(r.contains(d(2024, 1, 5)));
        assert!(r.contains(d(2024, 1, 9)));
        assert!(!r.contains(d(2024, 1, 10)));
        assert!(!r.contains(d(2024, 1, 4)));
    }

    #[test]
    fn lookback_past_calendar_start_is_none() {
        assert!(DateRange::trailing(d(2024, 6, 30), u32::MAX).is_none());
        assert!(DateRange::trailing(NaiveDate::MIN, 1).is_none());
        assert_eq!(
            DateRange::trailing(NaiveDate::MIN, 0).map(|r| r.start),
            Some(NaiveDate::MIN)
        );
    }
}
