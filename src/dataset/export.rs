//! Arrow export of windowed datasets
//!
//! Each array becomes one column of fixed-size float lists so the batch can be
//! handed to any Arrow-speaking training stack. Sequence inputs nest twice,
//! `(seq_size, 1)` per row.

use std::sync::Arc;

use arrow::array::{ArrayRef, FixedSizeListArray, Float32Array};
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, FieldRef, Schema};
use ndarray::{Array, Dimension};

use super::WindowedDataset;
use crate::error::{Error, Result};

/// Column name prefix for sequence inputs
pub const SEQUENCE_INPUT: &str = "seq_input";
/// Column name prefix for non-sequence inputs
pub const FEATURE_INPUT: &str = "feature_input";
/// Column name prefix for outputs
pub const OUTPUT: &str = "output";

fn column_name(prefix: &str, index: usize) -> String {
    if index == 0 {
        prefix.to_string()
    } else {
        format!("{prefix}_{index}")
    }
}

fn flat_values<D: Dimension>(array: &Array<f32, D>) -> ArrayRef {
    Arc::new(Float32Array::from_iter_values(array.iter().copied()))
}

fn list_width(size: usize) -> Result<i32> {
    i32::try_from(size).map_err(|_| Error::invalid_parameter(format!("List width {size} exceeds i32")))
}

fn item_field(data_type: DataType) -> FieldRef {
    Arc::new(Field::new("item", data_type, false))
}

fn list_of(values: ArrayRef, size: i32) -> Result<ArrayRef> {
    let item = item_field(values.data_type().clone());
    Ok(Arc::new(FixedSizeListArray::try_new(item, size, values, None)?))
}

impl WindowedDataset {
    /// Export every array as a named column of a single record batch
    ///
    /// Columns are named `seq_input`, `feature_input` and `output`, with an
    /// `_<n>` suffix for the second and later array of a group. Sequence
    /// columns are typed `list_type(list_type(Float32, 1), seq_size)`, the
    /// others `list_type(Float32, width)`.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = Vec::new();
        let mut columns: Vec<ArrayRef> = Vec::new();

        for (i, array) in self.sequence_inputs.iter().enumerate() {
            let (_, steps, width) = array.dim();
            let (steps, width) = (list_width(steps)?, list_width(width)?);
            let data_type = list_type(list_type(DataType::Float32, width), steps);
            fields.push(Field::new(column_name(SEQUENCE_INPUT, i), data_type, false));
            columns.push(list_of(list_of(flat_values(array), width)?, steps)?);
        }

        let flat_groups = [
            (FEATURE_INPUT, &self.feature_inputs),
            (OUTPUT, &self.outputs),
        ];
        for (prefix, arrays) in flat_groups {
            for (i, array) in arrays.iter().enumerate() {
                let width = list_width(array.ncols())?;
                fields.push(Field::new(column_name(prefix, i), list_type(DataType::Float32, width), false));
                columns.push(list_of(flat_values(array), width)?);
            }
        }

        if columns.is_empty() {
            return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        log::debug!(
            "Exported {} rows across {} columns",
            batch.num_rows(),
            batch.num_columns()
        );
        Ok(batch)
    }
}

/// Data type of a column holding `width` non-null `item` values per row
#[must_use]
pub fn list_type(item: DataType, width: i32) -> DataType {
    DataType::FixedSizeList(item_field(item), width)
}
