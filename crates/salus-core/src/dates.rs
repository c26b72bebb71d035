//! Calendar helpers
//!
//! Dates are plain calendar dates in local time; nothing here normalizes
//! timezones.

use chrono::{Datelike, Local, NaiveDate};

use crate::filter::Filter;

/// Inclusive number of days from `start` to `end`
///
/// Returns 0 when either date is missing. The order of the dates is not
/// checked, so `end < start` yields zero or a negative count.
pub fn calculate_duration(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days() + 1,
        _ => 0,
    }
}

/// Today's date in the local timezone
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Task query for everything scheduled on `today` within a cycle
///
/// The backend ANDs the three parameters.
pub fn today_filter(cycle_id: i64, today: NaiveDate) -> Filter {
    let day_of_week = today.weekday().num_days_from_sunday() as u8;
    Filter::for_cycle(cycle_id)
        .day_of_week(day_of_week)
        .date(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_inclusive() {
        assert_eq!(
            calculate_duration(Some(date(2024, 1, 1)), Some(date(2024, 1, 10))),
            10
        );
        assert_eq!(
            calculate_duration(Some(date(2024, 1, 1)), Some(date(2024, 1, 1))),
            1
        );
    }

    #[test]
    fn test_duration_missing_date() {
        assert_eq!(calculate_duration(None, Some(date(2024, 1, 10))), 0);
        assert_eq!(calculate_duration(Some(date(2024, 1, 10)), None), 0);
    }

    #[test]
    fn test_duration_across_leap_day() {
        assert_eq!(
            calculate_duration(Some(date(2024, 2, 28)), Some(date(2024, 3, 1))),
            3
        );
    }

    #[test]
    fn test_duration_reversed_is_not_guarded() {
        assert_eq!(
            calculate_duration(Some(date(2024, 1, 10)), Some(date(2024, 1, 1))),
            -8
        );
    }

    #[test]
    fn test_today_filter() {
        // 2024-01-07 was a Sunday
        let filter = today_filter(3, date(2024, 1, 7));
        assert_eq!(filter.get("cycle_id"), Some("3"));
        assert_eq!(filter.get("day_of_week"), Some("0"));
        assert_eq!(filter.get("date"), Some("2024-01-07"));

        let filter = today_filter(3, date(2024, 1, 13));
        assert_eq!(filter.get("day_of_week"), Some("6"));
    }
}
