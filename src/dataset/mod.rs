//! Windowed, index-aligned tensors ready for a sequence model
//!
//! A [`WindowedDataset`] keeps three groups of arrays whose first axis is the
//! predicted bucket:
//! - sequence inputs of shape `(n, seq_size, 1)`
//! - non-sequence inputs of shape `(n, width)` (calendar encodings)
//! - outputs of shape `(n, width)` (targets)
//!
//! Splitting is chronological. Shuffling would put later buckets in the
//! training half.

pub mod export;
pub mod window;

pub use window::{align_non_sequence_inputs, build_sequence_windows};

use ndarray::{Array2, Array3, Axis, s};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One predicted bucket viewed as a training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesExample {
    /// Counts of the `seq_size` buckets before the predicted one
    pub sequence_history: Vec<f32>,
    /// Calendar one-hot of the predicted bucket
    pub calendar_one_hot: Vec<f32>,
    /// Arrivals in the predicted bucket
    pub target_count: f32,
    /// Population variance of counts around the predicted bucket
    pub target_variance: f32,
}

/// Sequence, non-sequence and output arrays sliced consistently by bucket
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    seq_size: usize,
    sequence_inputs: Vec<Array3<f32>>,
    feature_inputs: Vec<Array2<f32>>,
    outputs: Vec<Array2<f32>>,
}

impl WindowedDataset {
    /// Assemble a dataset from arrays already aligned by predicted bucket
    pub fn new(
        seq_size: usize,
        sequence_inputs: Vec<Array3<f32>>,
        feature_inputs: Vec<Array2<f32>>,
        outputs: Vec<Array2<f32>>,
    ) -> Result<Self> {
        let dataset = Self {
            seq_size,
            sequence_inputs,
            feature_inputs,
            outputs,
        };
        dataset.check_aligned()?;
        Ok(dataset)
    }

    /// Window per-bucket series and align the per-bucket features and outputs
    ///
    /// Every argument holds one row per bucket, all of the same length. Series
    /// are windowed with [`build_sequence_windows`]; features and outputs lose
    /// their first `seq_size` rows so row `i` of every array describes the same
    /// predicted bucket.
    pub fn from_buckets(
        seq_size: usize,
        series: &[Vec<f32>],
        features: &[Array2<f32>],
        outputs: &[Array2<f32>],
    ) -> Result<Self> {
        let mut lengths = series
            .iter()
            .map(Vec::len)
            .chain(features.iter().map(Array2::nrows))
            .chain(outputs.iter().map(Array2::nrows));
        if let Some(first) = lengths.next() {
            if let Some(other) = lengths.find(|l| *l != first) {
                return Err(Error::invalid_parameter(format!(
                    "Bucket arrays differ in length: {first} vs {other}"
                )));
            }
        }

        Self::new(
            seq_size,
            series
                .iter()
                .map(|s| build_sequence_windows(s, seq_size))
                .collect(),
            features
                .iter()
                .map(|f| align_non_sequence_inputs(f.view(), seq_size))
                .collect(),
            outputs
                .iter()
                .map(|o| align_non_sequence_inputs(o.view(), seq_size))
                .collect(),
        )
    }

    fn check_aligned(&self) -> Result<()> {
        if self.seq_size == 0 {
            return Err(Error::invalid_parameter("Window length must be at least 1"));
        }
        if let Some(bad) = self
            .sequence_inputs
            .iter()
            .find(|a| a.dim().1 != self.seq_size || a.dim().2 != 1)
        {
            return Err(Error::invalid_parameter(format!(
                "Sequence input has shape {:?}, expected (_, {}, 1)",
                bad.dim(),
                self.seq_size
            )));
        }

        let len = self.len();
        let rows = self
            .sequence_inputs
            .iter()
            .map(|a| a.len_of(Axis(0)))
            .chain(self.feature_inputs.iter().map(Array2::nrows))
            .chain(self.outputs.iter().map(Array2::nrows));
        for n in rows {
            if n != len {
                return Err(Error::invalid_parameter(format!(
                    "Array rows differ: {n} vs {len}"
                )));
            }
        }
        Ok(())
    }

    /// Number of predicted buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence_inputs
            .first()
            .map(|a| a.len_of(Axis(0)))
            .or_else(|| self.feature_inputs.first().map(Array2::nrows))
            .or_else(|| self.outputs.first().map(Array2::nrows))
            .unwrap_or(0)
    }

    /// Whether there are no predicted buckets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window length of the sequence inputs
    #[must_use]
    pub const fn seq_size(&self) -> usize {
        self.seq_size
    }

    /// Sequence inputs, each `(n, seq_size, 1)`
    #[must_use]
    pub fn sequence_inputs(&self) -> &[Array3<f32>] {
        &self.sequence_inputs
    }

    /// Non-sequence inputs, each `(n, width)`
    #[must_use]
    pub fn feature_inputs(&self) -> &[Array2<f32>] {
        &self.feature_inputs
    }

    /// Outputs, each `(n, width)`
    #[must_use]
    pub fn outputs(&self) -> &[Array2<f32>] {
        &self.outputs
    }

    /// Split chronologically at `floor(len * point)`
    ///
    /// The first part holds buckets `[0, idx)` and the second `[idx, len)`.
    pub fn split(&self, point: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&point) {
            return Err(Error::invalid_parameter(format!(
                "Split point must be within [0, 1], got {point}"
            )));
        }

        let len = self.len();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let idx = ((len as f64) * point).floor() as usize;
        let idx = idx.min(len);

        log::debug!("Splitting {len} buckets at index {idx}");
        Ok((self.slice_rows(0, idx), self.slice_rows(idx, len)))
    }

    fn slice_rows(&self, start: usize, end: usize) -> Self {
        Self {
            seq_size: self.seq_size,
            sequence_inputs: self
                .sequence_inputs
                .iter()
                .map(|a| a.slice(s![start..end, .., ..]).to_owned())
                .collect(),
            feature_inputs: self
                .feature_inputs
                .iter()
                .map(|a| a.slice(s![start..end, ..]).to_owned())
                .collect(),
            outputs: self
                .outputs
                .iter()
                .map(|a| a.slice(s![start..end, ..]).to_owned())
                .collect(),
        }
    }

    /// Row `index` as an example, using the first array of each group
    ///
    /// `None` when out of range or when the layout lacks a sequence input, a
    /// non-sequence input, or a two-column output.
    #[must_use]
    pub fn example(&self, index: usize) -> Option<TimeSeriesExample> {
        if index >= self.len() {
            return None;
        }
        let sequence = self.sequence_inputs.first()?;
        let calendar = self.feature_inputs.first()?;
        let output = self.outputs.first()?;
        if output.ncols() < 2 {
            return None;
        }

        Some(TimeSeriesExample {
            sequence_history: sequence.slice(s![index, .., 0]).to_vec(),
            calendar_one_hot: calendar.row(index).to_vec(),
            target_count: output[[index, 0]],
            target_variance: output[[index, 1]],
        })
    }

    /// All rows as examples, empty if the layout does not fit
    pub fn examples(&self) -> impl Iterator<Item = TimeSeriesExample> + '_ {
        (0..self.len()).map_while(|i| self.example(i))
    }
}
