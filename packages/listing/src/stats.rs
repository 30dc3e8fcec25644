//! Summary statistics shared by the model and the recommender.

/// Median of `values`, averaging the two middle values for even counts.
///
/// Sorts `values` in place. Returns `None` for an empty slice.
#[must_use]
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}
