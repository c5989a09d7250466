//! Calendar arithmetic parameterised by a bucket unit
//!
//! Everything that turns a date into a bucket, walks a range of buckets or
//! shifts a date by whole buckets goes through [`TimeUnit`], so the key used
//! to aggregate records and the key used to look buckets up always agree.

pub mod encoding;

pub use encoding::CalendarEncoding;

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width of one time bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// One calendar day
    #[default]
    Day,
    /// Seven calendar days
    Week,
}

impl TimeUnit {
    /// Length of one unit in days
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
        }
    }

    /// Calendar encoding used when none is configured
    #[must_use]
    pub const fn default_encoding(self) -> CalendarEncoding {
        match self {
            Self::Day => CalendarEncoding::MonthDay,
            Self::Week => CalendarEncoding::WeekOfYear,
        }
    }

    /// Bucket key of `date`
    ///
    /// `YYYY-MM-DD` for days and `YYYY-WW` (ISO year and week) for weeks. Both
    /// sort the same way as the dates they come from, which is what
    /// aggregation on the underlying date requires.
    #[must_use]
    pub fn bucket_key(self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = date.iso_week();
                format!("{:04}-{:02}", week.year(), week.week())
            }
        }
    }

    /// First day of the bucket holding `date`
    ///
    /// Days are their own bucket; weeks start on the ISO Monday.
    #[must_use]
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let offset = i64::from(date.weekday().num_days_from_monday());
                date.checked_sub_signed(TimeDelta::days(offset)).unwrap_or(date)
            }
        }
    }

    /// Last day of the bucket holding `date`
    #[must_use]
    pub fn bucket_end(self, date: NaiveDate) -> NaiveDate {
        let start = self.bucket_start(date);
        start
            .checked_add_signed(TimeDelta::days(self.days() - 1))
            .unwrap_or(start)
    }

    /// Shift `date` by `n` units, negative `n` moving backwards
    pub fn add_units(self, date: NaiveDate, n: i64) -> Result<NaiveDate> {
        n.checked_mul(self.days())
            .and_then(TimeDelta::try_days)
            .and_then(|delta| date.checked_add_signed(delta))
            .ok_or_else(|| Error::DateOutOfRange(format!("{date} + {n} {self}s")))
    }

    /// Inclusive range from `start` to `end` stepping one unit
    ///
    /// Empty when `end < start`. With weeks the last element is the last step
    /// not past `end`.
    #[must_use]
    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange {
            next: (start <= end).then_some(start),
            end,
            unit: self,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Week => f.write_str("week"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Day),
            "week" | "weeks" => Ok(Self::Week),
            other => Err(Error::invalid_parameter(format!("Unknown time unit: {other}"))),
        }
    }
}

/// Lazy inclusive date range, see [`TimeUnit::date_range`]
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    unit: TimeUnit,
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = self.unit.add_units(current, 1).ok();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .filter(|d| *d <= self.end)
            .map_or(0, |d| {
                let span = (self.end - d).num_days() / self.unit.days();
                usize::try_from(span).map_or(0, |s| s + 1)
            });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

impl FusedIterator for DateRange {}
