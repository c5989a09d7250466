//! Tests for calendar encodings and bucket units

use triage_ml::{CalendarEncoding, TimeUnit};

use crate::utils::date;

fn hot(encoding: CalendarEncoding, y: i32, m: u32, d: u32) -> Vec<usize> {
    encoding
        .encode(date(y, m, d))
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_month_day_layout() {
    assert_eq!(CalendarEncoding::MonthDay.width(), 43);
    assert_eq!(hot(CalendarEncoding::MonthDay, 2020, 1, 1), vec![1, 12]);
    assert_eq!(hot(CalendarEncoding::MonthDay, 2019, 7, 31), vec![7, 42]);
    // December and the first of the month share slot 12
    assert_eq!(hot(CalendarEncoding::MonthDay, 2020, 12, 1), vec![12]);
    assert_eq!(hot(CalendarEncoding::MonthDay, 2020, 12, 2), vec![12, 13]);
}

#[test]
fn test_week_of_year_layout() {
    assert_eq!(CalendarEncoding::WeekOfYear.width(), 53);
    assert_eq!(hot(CalendarEncoding::WeekOfYear, 2020, 1, 1), vec![0]);
    assert_eq!(hot(CalendarEncoding::WeekOfYear, 2020, 12, 31), vec![52]);
}

#[test]
fn test_unit_defaults_and_names() {
    assert_eq!(TimeUnit::default(), TimeUnit::Day);
    assert_eq!(TimeUnit::Day.default_encoding(), CalendarEncoding::MonthDay);
    assert_eq!(TimeUnit::Week.default_encoding(), CalendarEncoding::WeekOfYear);
    assert_eq!(TimeUnit::Week.to_string(), "week");
    assert_eq!("days".parse::<TimeUnit>().unwrap(), TimeUnit::Day);
}

#[test]
fn test_week_keys_sort_like_dates() {
    let unit = TimeUnit::Week;
    let dates: Vec<_> = unit.date_range(date(2019, 12, 2), date(2021, 2, 1)).collect();
    let keys: Vec<_> = dates.iter().map(|d| unit.bucket_key(*d)).collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let mut unique = keys.clone();
    unique.dedup();
    assert_eq!(unique.len(), keys.len());
}
