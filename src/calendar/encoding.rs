//! One-hot calendar encodings fed to the model next to the count history.

use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, ArrayViewMut1};
use serde::{Deserialize, Serialize};

/// Layout of the calendar one-hot vector
///
/// The width is a fixed contract with the downstream model; changing it
/// changes the model's input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEncoding {
    /// Month and day-of-month in `12 + 31` slots
    ///
    /// Slot `month` (1..=12) and slot `11 + day` (12..=42) are set. Slot 0 is
    /// never used and December shares slot 12 with the first day of a month.
    /// The model was trained on this layout, keep it as is.
    MonthDay,
    /// ISO week of year in 53 slots, slot `week - 1` set
    WeekOfYear,
}

impl CalendarEncoding {
    /// Width of [`CalendarEncoding::MonthDay`]
    pub const MONTH_DAY_WIDTH: usize = 12 + 31;
    /// Width of [`CalendarEncoding::WeekOfYear`]
    pub const WEEK_OF_YEAR_WIDTH: usize = 53;

    /// Number of slots
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::MonthDay => Self::MONTH_DAY_WIDTH,
            Self::WeekOfYear => Self::WEEK_OF_YEAR_WIDTH,
        }
    }

    /// Encode `date` into a fresh vector
    #[must_use]
    pub fn encode(self, date: NaiveDate) -> Array1<f32> {
        let mut out = Array1::zeros(self.width());
        self.encode_into(date, out.view_mut());
        out
    }

    /// Encode `date` into `out`, which must be zeroed and `width()` long
    pub fn encode_into(self, date: NaiveDate, mut out: ArrayViewMut1<'_, f32>) {
        debug_assert_eq!(out.len(), self.width());
        match self {
            Self::MonthDay => {
                out[date.month() as usize] = 1.0;
                out[11 + date.day() as usize] = 1.0;
            }
            Self::WeekOfYear => {
                out[date.iso_week().week0() as usize] = 1.0;
            }
        }
    }
}
