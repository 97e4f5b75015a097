// fund_report_core/src/calendar.rs

//! Calendar helpers: year/month partitioning and the default trading-day calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short month names, January first.
pub fn month_names() -> &'static [&'static str; 12] {
    &MONTH_NAMES
}

/// Distinct calendar years present in `dates`, ascending.
pub fn years(dates: &[NaiveDate]) -> Vec<i32> {
    dates
        .iter()
        .map(|date| date.year())
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Distinct months (1..=12) present in `year`, ascending.
pub fn months_in_year(dates: &[NaiveDate], year: i32) -> Vec<u32> {
    dates
        .iter()
        .filter(|date| date.year() == year)
        .map(|date| date.month())
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Monday to Friday dates in `[start, end]`.
/// Exchange holidays are not removed; gaps they leave are forward-filled downstream.
pub fn weekdays_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_years_are_distinct_and_ascending() {
        let dates = vec![date(2011, 3, 1), date(2010, 12, 31), date(2011, 1, 3), date(2012, 1, 2)];
        assert_eq!(years(&dates), vec![2010, 2011, 2012]);
    }

    #[test]
    fn test_months_in_year() {
        let dates = vec![date(2010, 11, 1), date(2010, 11, 2), date(2010, 12, 1), date(2011, 1, 3)];
        assert_eq!(months_in_year(&dates, 2010), vec![11, 12]);
        assert_eq!(months_in_year(&dates, 2011), vec![1]);
        assert!(months_in_year(&dates, 2009).is_empty());
    }

    #[test]
    fn test_weekdays_between_skips_weekends() {
        // 2024-01-05 is a Friday
        let days = weekdays_between(date(2024, 1, 5), date(2024, 1, 9));
        assert_eq!(days, vec![date(2024, 1, 5), date(2024, 1, 8), date(2024, 1, 9)]);
    }

    #[test]
    fn test_weekdays_between_empty_when_reversed() {
        assert!(weekdays_between(date(2024, 1, 9), date(2024, 1, 5)).is_empty());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_names()[0], "Jan");
        assert_eq!(month_names()[11], "Dec");
    }
}
