//! Where arrival records come from and where trained weights go
//!
//! The transport (HTTP, auth, serialization) belongs to the implementor. The
//! pipeline only needs a [`RecordCollection`] back.

use chrono::NaiveDate;

use crate::collections::RecordCollection;
use crate::error::Result;
use crate::models::Attribute;

/// Remote store of arrival records and model weights
pub trait ArrivalSource {
    /// Arrivals for one clinic and severity received between `start` and `end`, inclusive
    fn get_data(
        &mut self,
        clinic_id: i64,
        severity: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RecordCollection>;

    /// Upload trained weights for one clinic and severity
    fn post_weights(&mut self, clinic_id: i64, severity: i64, weights: &[u8], accuracy: f64) -> Result<()>;
}

/// Weights accepted by an [`InMemorySource`]
#[derive(Debug, Clone, PartialEq)]
pub struct PostedWeights {
    /// Clinic the weights belong to
    pub clinic_id: i64,
    /// Severity the weights belong to
    pub severity: i64,
    /// Serialized weights
    pub weights: Vec<u8>,
    /// Reported accuracy
    pub accuracy: f64,
}

/// Source backed by a collection held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: RecordCollection,
    posted: Vec<PostedWeights>,
}

impl InMemorySource {
    /// Serve queries from `records`
    #[must_use]
    pub fn new(records: RecordCollection) -> Self {
        Self {
            records,
            posted: Vec::new(),
        }
    }

    /// Weights posted so far, oldest first
    #[must_use]
    pub fn posted(&self) -> &[PostedWeights] {
        &self.posted
    }
}

impl ArrivalSource for InMemorySource {
    fn get_data(
        &mut self,
        clinic_id: i64,
        severity: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RecordCollection> {
        let selected = self
            .records
            .clone()
            .filter_on(Attribute::ClinicId, |v| v.as_int() == Some(clinic_id))?
            .filter_on(Attribute::Severity, |v| v.as_int() == Some(severity))?
            .filter_on(Attribute::DateReceived, |v| {
                v.as_date().is_some_and(|d| start <= d && d <= end)
            })?;

        log::debug!(
            "Served {} records for clinic {clinic_id}, severity {severity}",
            selected.len()
        );
        Ok(selected)
    }

    fn post_weights(&mut self, clinic_id: i64, severity: i64, weights: &[u8], accuracy: f64) -> Result<()> {
        self.posted.push(PostedWeights {
            clinic_id,
            severity,
            weights: weights.to_vec(),
            accuracy,
        });
        Ok(())
    }
}
