//! Ordered record collections
//!
//! A [`RecordCollection`] holds arrival records validated against one
//! [`Schema`]. Filtering and sorting consume the collection and hand back the
//! transformed one, so calls chain with `?`:
//!
//! ```
//! use triage_ml::collections::RecordCollection;
//! use triage_ml::models::{ArrivalRecord, Attribute, Schema};
//! use chrono::NaiveDate;
//!
//! # fn main() -> triage_ml::Result<()> {
//! let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
//! let records = vec![
//!     ArrivalRecord::new(1, 2, day(3)),
//!     ArrivalRecord::new(2, 2, day(1)),
//!     ArrivalRecord::new(1, 2, day(2)),
//! ];
//! let clinic = RecordCollection::from_records(Schema::Basic, records)?
//!     .filter_on(Attribute::ClinicId, |v| v.as_int() == Some(1))?
//!     .order_by("date_received", false)?;
//! assert_eq!(clinic.len(), 2);
//! assert_eq!(clinic[0].date_received(), day(2));
//! # Ok(())
//! # }
//! ```

pub mod aggregation;

pub use aggregation::{AggregationMap, group_runs};

use std::hash::Hash;
use std::ops::Index;

use crate::error::{Error, Result};
use crate::models::{ArrivalRecord, Attribute, AttributeValue, IntoAttribute, Schema};

/// Arrival records in a significant order
///
/// Order is insertion order until [`RecordCollection::order_by`] is called and
/// the sort order afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    schema: Schema,
    records: Vec<ArrivalRecord>,
}

impl RecordCollection {
    /// Create an empty collection
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Build a collection from tuples laid out in `schema` order
    ///
    /// Every tuple must have the schema's arity, else [`Error::SchemaMismatch`].
    pub fn from_tuples<I, T>(schema: Schema, tuples: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[AttributeValue]>,
    {
        let records = tuples
            .into_iter()
            .map(|tuple| ArrivalRecord::from_tuple(schema, tuple.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, records })
    }

    /// Build a collection from typed records, checking each against `schema`
    pub fn from_records(schema: Schema, records: Vec<ArrivalRecord>) -> Result<Self> {
        if let Some(bad) = records.iter().find(|r| r.schema() != Some(schema)) {
            return Err(Error::SchemaMismatch {
                expected: schema.arity(),
                found: bad.arity(),
            });
        }
        Ok(Self { schema, records })
    }

    /// Declared schema
    #[must_use]
    pub const fn schema(&self) -> Schema {
        self.schema
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArrivalRecord> {
        self.records.get(index)
    }

    /// First record in current order
    #[must_use]
    pub fn first(&self) -> Option<&ArrivalRecord> {
        self.records.first()
    }

    /// Last record in current order
    #[must_use]
    pub fn last(&self) -> Option<&ArrivalRecord> {
        self.records.last()
    }

    /// Iterate in current order
    pub fn iter(&self) -> std::slice::Iter<'_, ArrivalRecord> {
        self.records.iter()
    }

    /// Records in current order
    #[must_use]
    pub fn records(&self) -> &[ArrivalRecord] {
        &self.records
    }

    /// Consume into the underlying records
    #[must_use]
    pub fn into_records(self) -> Vec<ArrivalRecord> {
        self.records
    }

    /// Keep only records whose `attribute` satisfies `predicate`
    ///
    /// Surviving records keep their relative order.
    pub fn filter_on<A, P>(self, attribute: A, mut predicate: P) -> Result<Self>
    where
        A: IntoAttribute,
        P: FnMut(&AttributeValue) -> bool,
    {
        let attribute = self.schema.resolve(attribute)?;
        let before = self.records.len();

        let mut kept = Vec::with_capacity(before);
        for record in self.records {
            if predicate(&record.get(attribute)?) {
                kept.push(record);
            }
        }

        log::debug!("Filtered on {attribute}: kept {} of {before} records", kept.len());
        Ok(Self {
            schema: self.schema,
            records: kept,
        })
    }

    /// Stable sort by `attribute`
    ///
    /// Equal values keep their prior relative order in both directions.
    pub fn order_by<A>(self, attribute: A, descending: bool) -> Result<Self>
    where
        A: IntoAttribute,
    {
        let attribute = self.schema.resolve(attribute)?;
        let keyed = sorted_by(keyed(self.records, attribute)?, descending);

        Ok(Self {
            schema: self.schema,
            records: keyed.into_iter().map(|(_, record)| record).collect(),
        })
    }

    /// Group a sorted copy of the records by `key_fn` applied to `attribute`
    ///
    /// See [`aggregation`] for the order-consistency precondition on `key_fn`.
    pub fn aggregate_on<A, K, F>(&self, attribute: A, key_fn: F) -> Result<AggregationMap<K>>
    where
        A: IntoAttribute,
        K: Eq + Hash + Clone,
        F: FnMut(&AttributeValue) -> K,
    {
        let attribute = self.schema.resolve(attribute)?;
        let sorted = sorted_by(keyed(self.records.clone(), attribute)?, false);
        let aggregation = group_runs(sorted, key_fn);

        log::debug!(
            "Aggregated {} records on {attribute} into {} groups",
            self.records.len(),
            aggregation.len()
        );
        Ok(aggregation)
    }
}

/// Pair every record with its value for `attribute`
fn keyed(
    records: Vec<ArrivalRecord>,
    attribute: Attribute,
) -> Result<Vec<(AttributeValue, ArrivalRecord)>> {
    records
        .into_iter()
        .map(|record| Ok((record.get(attribute)?, record)))
        .collect()
}

fn sorted_by(
    mut keyed: Vec<(AttributeValue, ArrivalRecord)>,
    descending: bool,
) -> Vec<(AttributeValue, ArrivalRecord)> {
    if descending {
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
    } else {
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
    }
    keyed
}

impl Index<usize> for RecordCollection {
    type Output = ArrivalRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl IntoIterator for RecordCollection {
    type Item = ArrivalRecord;
    type IntoIter = std::vec::IntoIter<ArrivalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a ArrivalRecord;
    type IntoIter = std::slice::Iter<'a, ArrivalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
