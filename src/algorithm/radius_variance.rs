//! Count history and radius-variance targets per calendar bucket
//!
//! For every bucket far enough from both ends of the data, the model sees the
//! counts of the `seq_size` buckets before it plus a calendar one-hot, and is
//! trained to predict the bucket's count together with the population variance
//! of counts in the `radius` buckets on either side.

use std::time::Instant;

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::forecast::{ArrivalModel, Prediction, forecast};
use crate::calendar::{CalendarEncoding, TimeUnit};
use crate::collections::{AggregationMap, RecordCollection};
use crate::dataset::{TimeSeriesExample, WindowedDataset};
use crate::error::{Error, Result};
use crate::models::Attribute;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Width of the target array: count and variance
pub const OUTPUT_WIDTH: usize = 2;

/// Per-bucket values before windowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketObservation {
    /// Date the bucket was looked up by
    pub date: NaiveDate,
    /// Arrivals in the bucket
    pub count: usize,
    /// Population variance of counts within the radius
    pub variance: f64,
    /// Calendar one-hot of `date`
    pub calendar: Array1<f32>,
}

/// Training and validation halves of a dataset
#[derive(Debug, Clone)]
pub struct TrainingSplit {
    /// Earlier buckets
    pub train: WindowedDataset,
    /// Later buckets
    pub validation: WindowedDataset,
}

/// Builds radius-variance datasets from arrival records
///
/// The collection handed in should already be narrowed to a single clinic and
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusVariance {
    seq_size: usize,
    radius: u32,
    unit: TimeUnit,
    encoding: CalendarEncoding,
}

impl Default for RadiusVariance {
    fn default() -> Self {
        Self::new(30, 15)
    }
}

impl RadiusVariance {
    /// Day-bucketed builder with the given window length and radius
    #[must_use]
    pub const fn new(seq_size: usize, radius: u32) -> Self {
        Self {
            seq_size,
            radius,
            unit: TimeUnit::Day,
            encoding: CalendarEncoding::MonthDay,
        }
    }

    /// Switch the bucket unit, resetting the encoding to the unit's default
    #[must_use]
    pub const fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self.encoding = unit.default_encoding();
        self
    }

    /// Override the calendar encoding
    #[must_use]
    pub const fn with_encoding(mut self, encoding: CalendarEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Window length
    #[must_use]
    pub const fn seq_size(&self) -> usize {
        self.seq_size
    }

    /// Buckets on each side used for the variance
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Bucket unit
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Calendar encoding
    #[must_use]
    pub const fn encoding(&self) -> CalendarEncoding {
        self.encoding
    }

    fn aggregate(&self, collection: &RecordCollection) -> Result<AggregationMap<String>> {
        let unit = self.unit;
        collection.aggregate_on(Attribute::DateReceived, |value| {
            value
                .as_date()
                .map_or_else(|| value.to_string(), |date| unit.bucket_key(date))
        })
    }

    /// Arrivals per bucket from the first to the last arrival
    ///
    /// Steps one unit at a time from the first arrival's date until the step
    /// that falls in the last arrival's bucket. Buckets without arrivals count
    /// zero. Empty for an empty collection.
    pub fn bucket_counts(&self, collection: &RecordCollection) -> Result<Vec<(NaiveDate, usize)>> {
        let Some((first, last)) = received_bounds(collection) else {
            return Ok(Vec::new());
        };
        let aggregation = self.aggregate(collection)?;

        Ok(self
            .unit
            .date_range(first, self.unit.bucket_end(last))
            .map(|date| (date, aggregation.count(self.unit.bucket_key(date).as_str())))
            .collect())
    }

    /// Count, variance and calendar encoding for every eligible bucket
    ///
    /// Eligible dates run from `radius` units after the first arrival to
    /// `radius` units before the last one, stepping one unit from the former.
    /// When those bounds cross there are none. Counts are looked up by the
    /// bucket key of each date, absent buckets counting zero.
    pub fn observations(&self, collection: &RecordCollection) -> Result<Vec<BucketObservation>> {
        let Some((first, last)) = received_bounds(collection) else {
            return Ok(Vec::new());
        };

        let radius = i64::from(self.radius);
        let aggregation = self.aggregate(collection)?;
        let count_at = |date: NaiveDate| aggregation.count(self.unit.bucket_key(date).as_str());

        let min_date = self.unit.add_units(first, radius)?;
        let max_date = self.unit.add_units(last, -radius)?;

        let dates = self.unit.date_range(min_date, max_date);
        let mut observations = Vec::with_capacity(dates.len());
        for date in dates {
            let neighbourhood = (-radius..=radius)
                .map(|offset| self.unit.add_units(date, offset).map(count_at))
                .collect::<Result<Vec<usize>>>()?;
            observations.push(BucketObservation {
                date,
                count: count_at(date),
                variance: population_variance(&neighbourhood),
                calendar: self.encoding.encode(date),
            });
        }

        log::debug!(
            "{} eligible buckets between {min_date} and {max_date}",
            observations.len()
        );
        Ok(observations)
    }

    /// Windowed dataset: count history, calendar one-hot, `(count, variance)` target
    ///
    /// An empty collection or an empty eligible range yields zero rows with
    /// shapes `(0, seq_size, 1)`, `(0, width)` and `(0, 2)`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn create_ml_dataset(&self, collection: &RecordCollection) -> Result<WindowedDataset> {
        let start = Instant::now();
        log_operation_start("Building radius-variance dataset", &format!("{} records", collection.len()));

        let observations = self.observations(collection)?;
        let buckets = observations.len();

        let mut series = Vec::with_capacity(buckets);
        let mut calendar = Array2::zeros((buckets, self.encoding.width()));
        let mut targets = Array2::zeros((buckets, OUTPUT_WIDTH));
        for (i, observation) in observations.iter().enumerate() {
            series.push(observation.count as f32);
            targets[[i, 0]] = observation.count as f32;
            targets[[i, 1]] = observation.variance as f32;
            calendar.row_mut(i).assign(&observation.calendar);
        }

        let dataset = WindowedDataset::from_buckets(self.seq_size, &[series], &[calendar], &[targets])?;
        log_operation_complete("built", "radius-variance dataset", dataset.len(), Some(start.elapsed()));
        Ok(dataset)
    }

    /// The dataset's rows as standalone examples
    pub fn time_series_examples(&self, collection: &RecordCollection) -> Result<Vec<TimeSeriesExample>> {
        Ok(self.create_ml_dataset(collection)?.examples().collect())
    }

    /// Build the dataset and hold back the last `validation_split` share of buckets
    pub fn prepare_training(
        &self,
        collection: &RecordCollection,
        validation_split: f64,
    ) -> Result<TrainingSplit> {
        if !(0.0..=1.0).contains(&validation_split) {
            return Err(Error::invalid_parameter(format!(
                "Validation split must be within [0, 1], got {validation_split}"
            )));
        }

        let dataset = self.create_ml_dataset(collection)?;
        let (train, validation) = dataset.split(1.0 - validation_split)?;
        log::info!(
            "Prepared {} training and {} validation buckets",
            train.len(),
            validation.len()
        );
        Ok(TrainingSplit { train, validation })
    }

    /// Forecast one bucket per date, feeding each predicted count back in
    ///
    /// `seed` holds the last `seq_size` observed counts, oldest first.
    pub fn forecast<M>(&self, model: &mut M, seed: &[f32], dates: &[NaiveDate]) -> Result<Vec<Prediction>>
    where
        M: ArrivalModel + ?Sized,
    {
        if seed.len() != self.seq_size {
            return Err(Error::invalid_parameter(format!(
                "Seed window has {} counts, expected {}",
                seed.len(),
                self.seq_size
            )));
        }
        let calendars = dates.iter().map(|date| self.encoding.encode(*date).to_vec());
        forecast(model, seed, calendars)
    }
}

fn received_bounds(collection: &RecordCollection) -> Option<(NaiveDate, NaiveDate)> {
    let first = collection.iter().map(|r| r.date_received()).min()?;
    let last = collection.iter().map(|r| r.date_received()).max()?;
    Some((first, last))
}

/// Mean squared deviation from the mean, divided by the number of values
#[must_use]
pub fn population_variance(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let mean = values.iter().map(|v| *v as f64).sum::<f64>() / n;
    #[allow(clippy::cast_precision_loss)]
    let squared = values.iter().map(|v| (*v as f64 - mean).powi(2)).sum::<f64>();
    squared / n
}
