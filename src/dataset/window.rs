//! Sliding windows over scalar series

use ndarray::{Array2, Array3, ArrayView2, s};

/// Overlapping windows of length `seq_size` over `series`
///
/// Window `i` covers `series[i..i + seq_size]` and precedes the element at
/// `i + seq_size`, so a series of length `L` yields `max(L - seq_size, 0)`
/// windows. The result has shape `(windows, seq_size, 1)`; a short series
/// gives zero rows with the trailing shape intact.
#[must_use]
pub fn build_sequence_windows(series: &[f32], seq_size: usize) -> Array3<f32> {
    let windows = series.len().saturating_sub(seq_size);
    Array3::from_shape_fn((windows, seq_size, 1), |(i, t, _)| series[i + t])
}

/// Drop the first `seq_size` rows so rows line up with the predicted buckets
///
/// Arrays with `seq_size` rows or fewer come back with zero rows and the same
/// width.
#[must_use]
pub fn align_non_sequence_inputs(array: ArrayView2<'_, f32>, seq_size: usize) -> Array2<f32> {
    let start = seq_size.min(array.nrows());
    array.slice(s![start.., ..]).to_owned()
}
