//! Multi-step forecasting by feeding predictions back into the window
//!
//! Each step's predicted count becomes the newest element of the next step's
//! input window, so steps run strictly one after another.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One model output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted arrivals
    pub count: f32,
    /// Predicted variance of arrivals
    pub variance: f32,
}

/// A trained model scoring one window at a time
///
/// Closures `FnMut(&[f32], &[f32]) -> Result<Prediction>` implement this.
pub trait ArrivalModel {
    /// Predict the bucket following `window`, whose calendar encoding is `calendar`
    fn predict(&mut self, window: &[f32], calendar: &[f32]) -> Result<Prediction>;
}

impl<F> ArrivalModel for F
where
    F: FnMut(&[f32], &[f32]) -> Result<Prediction>,
{
    fn predict(&mut self, window: &[f32], calendar: &[f32]) -> Result<Prediction> {
        self(window, calendar)
    }
}

/// Fixed-length window of the most recent counts
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceWindow {
    values: VecDeque<f32>,
}

impl SequenceWindow {
    /// Start from `seed`, oldest count first
    pub fn new(seed: &[f32]) -> Result<Self> {
        if seed.is_empty() {
            return Err(Error::invalid_parameter("Seed window must not be empty"));
        }
        Ok(Self {
            values: seed.iter().copied().collect(),
        })
    }

    /// Append `value`, dropping the oldest count
    pub fn push(&mut self, value: f32) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    /// Number of counts held
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false, windows are never empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Counts oldest first
    pub fn as_slice(&mut self) -> &[f32] {
        self.values.make_contiguous()
    }

    /// Counts oldest first, copied out
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.values.iter().copied().collect()
    }
}

/// Run `model` once per calendar encoding, in order
///
/// The window starts as `seed` and after each step drops its oldest count and
/// takes the predicted one. Returns one prediction per encoding.
pub fn forecast<M, C>(model: &mut M, seed: &[f32], calendars: C) -> Result<Vec<Prediction>>
where
    M: ArrivalModel + ?Sized,
    C: IntoIterator,
    C::Item: AsRef<[f32]>,
{
    let mut window = SequenceWindow::new(seed)?;
    let mut predictions = Vec::new();

    for calendar in calendars {
        let prediction = model.predict(window.as_slice(), calendar.as_ref())?;
        window.push(prediction.count);
        predictions.push(prediction);
    }

    log::debug!("Forecast {} steps from a {}-count seed", predictions.len(), seed.len());
    Ok(predictions)
}
