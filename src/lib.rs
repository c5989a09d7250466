//! Arrival records to sequence-model datasets.
//!
//! Records are filtered, ordered and grouped by calendar bucket, turned into a
//! count series, and windowed into index-aligned tensors with a calendar
//! one-hot and a `(count, radius variance)` target per bucket. A trained model
//! can then be run forward bucket by bucket with [`forecast`].

pub mod algorithm;
pub mod calendar;
pub mod collections;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod source;
pub mod synthetic;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::DatasetConfig;
pub use error::{Error, Result};
pub use models::{ArrivalRecord, Attribute, AttributeValue, Schema};

// Collections and calendar
pub use calendar::{CalendarEncoding, TimeUnit};
pub use collections::{AggregationMap, RecordCollection};

// Datasets
pub use dataset::{TimeSeriesExample, WindowedDataset};

// Dataset assembly and forecasting
pub use algorithm::{ArrivalModel, Prediction, RadiusVariance, TrainingSplit, forecast};

// Data sources
pub use source::{ArrivalSource, InMemorySource};

// Utility functions
pub use utils::io::{read_records, write_records};
pub use utils::logging::init_logging;
