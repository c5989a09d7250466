//! Synthetic arrival data
//!
//! Generates one clinic's arrivals with a slow upward trend and a yearly
//! cycle, optionally with uniform noise on top. Useful for exercising the
//! pipeline end to end without real data.

use std::f64::consts::PI;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;

use crate::calendar::TimeUnit;
use crate::collections::RecordCollection;
use crate::error::{Error, Result};
use crate::models::{ArrivalRecord, Schema};

/// Cumulative probabilities of severities 0, 1 and 2
pub const SEVERITY_PROBS: [f64; 3] = [0.1, 0.4, 1.0];

/// Clinic id given to generated records
pub const SYNTHETIC_CLINIC: i64 = 1;

/// Draw a severity according to [`SEVERITY_PROBS`]
pub fn random_severity<R: Rng>(rng: &mut R) -> i64 {
    let draw: f64 = rng.random();
    let level = SEVERITY_PROBS
        .iter()
        .position(|p| draw < *p)
        .unwrap_or(SEVERITY_PROBS.len() - 1);
    i64::try_from(level).unwrap_or_default()
}

/// Expected arrivals on day `day` counted from the start, before rounding
#[must_use]
pub fn cyclic_rate(day: usize, noise: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let d = day as f64;
    20.0 + d / 300.0 + 2.0 * (2.0 * PI * d / 365.0).sin() + noise
}

/// Daily arrivals from `start` to `end` inclusive following [`cyclic_rate`]
///
/// Each day adds `random_multiple` times a uniform draw from `[0, 1)` before
/// rounding; zero gives a deterministic count series.
pub fn cyclic<R: Rng>(
    start: NaiveDate,
    end: NaiveDate,
    random_multiple: f64,
    rng: &mut R,
) -> Result<RecordCollection> {
    let mut records = Vec::new();
    for (day, date) in TimeUnit::Day.date_range(start, end).enumerate() {
        let noise = random_multiple * rng.random::<f64>();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let arrivals = cyclic_rate(day, noise).round().max(0.0) as usize;
        for _ in 0..arrivals {
            records.push(ArrivalRecord::new(SYNTHETIC_CLINIC, random_severity(rng), date));
        }
    }

    log::info!("Generated {} synthetic arrivals from {start} to {end}", records.len());
    RecordCollection::from_records(Schema::Basic, records)
}

/// Named generation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMethod {
    /// Trend plus yearly cycle, no noise
    Cyclic,
    /// Trend plus yearly cycle with up to two extra arrivals of noise per day
    RandomCyclic,
}

impl GenerationMethod {
    /// Generate arrivals from `start` to `end`
    pub fn generate<R: Rng>(
        self,
        start: NaiveDate,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<RecordCollection> {
        match self {
            Self::Cyclic => cyclic(start, end, 0.0, rng),
            Self::RandomCyclic => cyclic(start, end, 2.0, rng),
        }
    }
}

impl FromStr for GenerationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cyclic" => Ok(Self::Cyclic),
            "random_cyclic" => Ok(Self::RandomCyclic),
            other => Err(Error::invalid_parameter(format!("Unknown generation method: {other}"))),
        }
    }
}
