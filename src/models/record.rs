//! Arrival records and the schemas they are validated against.
//!
//! Two deployment schemas exist. The basic one carries the clinic, the triage
//! severity and the day the patient was received. The extended one adds a
//! record id and the day the patient was seen.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Named field of an arrival record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Record id (extended schema only)
    Id,
    /// Clinic the arrival belongs to
    ClinicId,
    /// Triage severity level
    Severity,
    /// Day the patient arrived
    DateReceived,
    /// Day the patient was seen (extended schema only)
    DateSeen,
}

/// Kind of value an attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// 64-bit integer
    Int,
    /// Calendar date
    Date,
}

impl ValueKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Date => "date",
        }
    }
}

impl Attribute {
    /// The snake_case field name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClinicId => "clinic_id",
            Self::Severity => "severity",
            Self::DateReceived => "date_received",
            Self::DateSeen => "date_seen",
        }
    }

    /// The kind of value stored under this attribute
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Id | Self::ClinicId | Self::Severity => ValueKind::Int,
            Self::DateReceived | Self::DateSeen => ValueKind::Date,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(Self::Id),
            "clinic_id" => Ok(Self::ClinicId),
            "severity" => Ok(Self::Severity),
            "date_received" => Ok(Self::DateReceived),
            "date_seen" => Ok(Self::DateSeen),
            other => Err(Error::unknown_attribute(other)),
        }
    }
}

/// Anything that names an attribute: the enum itself or its field name
pub trait IntoAttribute {
    /// Resolve to an [`Attribute`]
    fn into_attribute(self) -> Result<Attribute>;
}

impl IntoAttribute for Attribute {
    fn into_attribute(self) -> Result<Attribute> {
        Ok(self)
    }
}

impl IntoAttribute for &str {
    fn into_attribute(self) -> Result<Attribute> {
        self.parse()
    }
}

/// A single field value
///
/// Values of one attribute always share a kind, so the derived ordering is the
/// natural numeric or chronological one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Integer field
    Int(i64),
    /// Date field
    Date(NaiveDate),
}

impl AttributeValue {
    /// The integer payload, if this is an integer
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Date(_) => None,
        }
    }

    /// The date payload, if this is a date
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Int(_) => None,
        }
    }

    /// The kind of this value
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Date(_) => ValueKind::Date,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

const BASIC_ATTRIBUTES: &[Attribute] = &[
    Attribute::ClinicId,
    Attribute::Severity,
    Attribute::DateReceived,
];

const EXTENDED_ATTRIBUTES: &[Attribute] = &[
    Attribute::Id,
    Attribute::ClinicId,
    Attribute::Severity,
    Attribute::DateReceived,
    Attribute::DateSeen,
];

/// Declared field layout of a record collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// `clinic_id, severity, date_received`
    #[default]
    Basic,
    /// `id, clinic_id, severity, date_received, date_seen`
    Extended,
}

impl Schema {
    /// Fields in declared order
    #[must_use]
    pub const fn attributes(self) -> &'static [Attribute] {
        match self {
            Self::Basic => BASIC_ATTRIBUTES,
            Self::Extended => EXTENDED_ATTRIBUTES,
        }
    }

    /// Number of fields
    #[must_use]
    pub const fn arity(self) -> usize {
        self.attributes().len()
    }

    /// Position of an attribute in declared order
    #[must_use]
    pub fn position(self, attribute: Attribute) -> Option<usize> {
        self.attributes().iter().position(|a| *a == attribute)
    }

    /// Resolve an attribute and make sure this schema declares it
    pub fn resolve(self, attribute: impl IntoAttribute) -> Result<Attribute> {
        let attribute = attribute.into_attribute()?;
        if self.position(attribute).is_some() {
            Ok(attribute)
        } else {
            Err(Error::unknown_attribute(format!(
                "{attribute} is not part of the {self:?} schema"
            )))
        }
    }
}

/// One patient arrival
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrivalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    clinic_id: i64,
    severity: i64,
    date_received: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_seen: Option<NaiveDate>,
}

impl ArrivalRecord {
    /// Create a record in the basic schema
    #[must_use]
    pub const fn new(clinic_id: i64, severity: i64, date_received: NaiveDate) -> Self {
        Self {
            id: None,
            clinic_id,
            severity,
            date_received,
            date_seen: None,
        }
    }

    /// Promote to the extended schema by attaching an id and the day seen
    #[must_use]
    pub const fn with_visit(mut self, id: i64, date_seen: NaiveDate) -> Self {
        self.id = Some(id);
        self.date_seen = Some(date_seen);
        self
    }

    /// Build a record from a tuple laid out in `schema` order
    pub fn from_tuple(schema: Schema, values: &[AttributeValue]) -> Result<Self> {
        if values.len() != schema.arity() {
            return Err(Error::SchemaMismatch {
                expected: schema.arity(),
                found: values.len(),
            });
        }

        let mut record = Self::new(0, 0, NaiveDate::MIN);
        for (attribute, value) in schema.attributes().iter().zip(values) {
            match (attribute, *value) {
                (Attribute::Id, AttributeValue::Int(v)) => record.id = Some(v),
                (Attribute::ClinicId, AttributeValue::Int(v)) => record.clinic_id = v,
                (Attribute::Severity, AttributeValue::Int(v)) => record.severity = v,
                (Attribute::DateReceived, AttributeValue::Date(d)) => record.date_received = d,
                (Attribute::DateSeen, AttributeValue::Date(d)) => record.date_seen = Some(d),
                _ => {
                    return Err(Error::TypeMismatch {
                        attribute: attribute.name(),
                        expected: attribute.kind().describe(),
                    });
                }
            }
        }
        Ok(record)
    }

    /// Lay the record out as a tuple in `schema` order
    pub fn to_tuple(&self, schema: Schema) -> Result<SmallVec<[AttributeValue; 5]>> {
        schema.attributes().iter().map(|a| self.get(*a)).collect()
    }

    /// Record id, present in the extended schema
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Clinic the arrival belongs to
    #[must_use]
    pub const fn clinic_id(&self) -> i64 {
        self.clinic_id
    }

    /// Triage severity
    #[must_use]
    pub const fn severity(&self) -> i64 {
        self.severity
    }

    /// Day the patient arrived
    #[must_use]
    pub const fn date_received(&self) -> NaiveDate {
        self.date_received
    }

    /// Day the patient was seen, present in the extended schema
    #[must_use]
    pub const fn date_seen(&self) -> Option<NaiveDate> {
        self.date_seen
    }

    /// The schema this record's populated fields correspond to
    ///
    /// Returns `None` when only one of the extended fields is set.
    #[must_use]
    pub const fn schema(&self) -> Option<Schema> {
        match (self.id, self.date_seen) {
            (None, None) => Some(Schema::Basic),
            (Some(_), Some(_)) => Some(Schema::Extended),
            _ => None,
        }
    }

    /// Number of populated fields
    #[must_use]
    pub const fn arity(&self) -> usize {
        3 + self.id.is_some() as usize + self.date_seen.is_some() as usize
    }

    /// Value of a named field
    pub fn get(&self, attribute: Attribute) -> Result<AttributeValue> {
        let value = match attribute {
            Attribute::Id => self.id.map(AttributeValue::Int),
            Attribute::ClinicId => Some(AttributeValue::Int(self.clinic_id)),
            Attribute::Severity => Some(AttributeValue::Int(self.severity)),
            Attribute::DateReceived => Some(AttributeValue::Date(self.date_received)),
            Attribute::DateSeen => self.date_seen.map(AttributeValue::Date),
        };
        value.ok_or_else(|| Error::unknown_attribute(format!("{attribute} is not set on this record")))
    }
}
