//! Dataset assembly and forecasting over arrival data
//!
//! [`radius_variance`] turns a record collection into the model's training
//! tensors; [`forecast`] runs a trained model forward one bucket at a time.

pub mod forecast;
pub mod radius_variance;

pub use forecast::{ArrivalModel, Prediction, SequenceWindow, forecast};
pub use radius_variance::{BucketObservation, RadiusVariance, TrainingSplit, population_variance};
