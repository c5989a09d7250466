//! Comma-delimited arrival records
//!
//! One record per line, fields in schema order, dates as `YYYY-MM-DD`:
//!
//! ```text
//! 1,2,2020-01-03
//! 1,0,2020-01-04
//! ```
//!
//! Opening files is left to the caller; these functions work on any reader or
//! writer.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use smallvec::SmallVec;

use crate::collections::RecordCollection;
use crate::error::{Error, Result};
use crate::models::{ArrivalRecord, AttributeValue, Schema, ValueKind};

/// Field separator
pub const DELIMITER: char = ',';
/// Date layout used on both read and write
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse one line into a record of `schema`
///
/// `line_number` is only used in error messages.
pub fn parse_line(schema: Schema, line: &str, line_number: usize) -> Result<ArrivalRecord> {
    let fields: SmallVec<[&str; 5]> = line.trim_end().split(DELIMITER).map(str::trim).collect();
    if fields.len() != schema.arity() {
        return Err(Error::SchemaMismatch {
            expected: schema.arity(),
            found: fields.len(),
        });
    }

    let values = schema
        .attributes()
        .iter()
        .zip(&fields)
        .map(|(attribute, raw)| {
            let parsed = match attribute.kind() {
                ValueKind::Int => raw
                    .parse::<i64>()
                    .map(AttributeValue::Int)
                    .map_err(|e| e.to_string()),
                ValueKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map(AttributeValue::Date)
                    .map_err(|e| e.to_string()),
            };
            parsed.map_err(|message| Error::Parse {
                line: line_number,
                message: format!("{attribute} '{raw}': {message}"),
            })
        })
        .collect::<Result<SmallVec<[AttributeValue; 5]>>>()?;

    ArrivalRecord::from_tuple(schema, &values)
}

/// Read every non-blank line of `reader` into a collection
pub fn read_records<R: BufRead>(schema: Schema, reader: R) -> Result<RecordCollection> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(schema, &line, index + 1)?);
    }

    log::debug!("Read {} {schema:?} records", records.len());
    RecordCollection::from_records(schema, records)
}

/// Format one record in `schema` order
pub fn format_record(record: &ArrivalRecord, schema: Schema) -> Result<String> {
    let fields: Vec<String> = record
        .to_tuple(schema)?
        .iter()
        .map(|value| match value {
            AttributeValue::Int(v) => v.to_string(),
            AttributeValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        })
        .collect();
    Ok(fields.join(&DELIMITER.to_string()))
}

/// Write the collection one record per line, newline separated
pub fn write_records<W: Write>(collection: &RecordCollection, mut writer: W) -> Result<()> {
    for (i, record) in collection.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        writer.write_all(format_record(record, collection.schema())?.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
