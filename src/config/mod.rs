//! Configuration for building radius-variance datasets.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::algorithm::RadiusVariance;
use crate::calendar::{CalendarEncoding, TimeUnit};
use crate::error::{Error, Result};
use crate::models::Schema;

/// Configuration for dataset preparation
///
/// Missing fields in JSON input fall back to [`DatasetConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Count history length per example
    pub seq_size: usize,
    /// Buckets on each side of a bucket used for its variance
    pub radius: u32,
    /// Bucket width
    pub unit: TimeUnit,
    /// Calendar encoding; the unit's default when unset
    pub encoding: Option<CalendarEncoding>,
    /// Share of the latest buckets held back for validation
    pub validation_split: f64,
    /// Layout of incoming record tuples
    pub schema: Schema,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seq_size: 30,
            radius: 15,
            unit: TimeUnit::Day,
            encoding: None,
            validation_split: 0.1,
            schema: Schema::Basic,
        }
    }
}

impl DatasetConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.seq_size == 0 {
            return Err(Error::invalid_parameter("seq_size must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(Error::invalid_parameter(format!(
                "validation_split must be within [0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }

    /// Encoding in effect after applying the unit default
    #[must_use]
    pub fn effective_encoding(&self) -> CalendarEncoding {
        self.encoding.unwrap_or_else(|| self.unit.default_encoding())
    }

    /// Dataset builder for these settings
    #[must_use]
    pub fn radius_variance(&self) -> RadiusVariance {
        RadiusVariance::new(self.seq_size, self.radius)
            .with_unit(self.unit)
            .with_encoding(self.effective_encoding())
    }
}
