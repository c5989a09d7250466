//! Domain models for arrival data

pub mod record;

pub use record::{ArrivalRecord, Attribute, AttributeValue, IntoAttribute, Schema, ValueKind};
