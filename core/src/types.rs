//! Shared primitive types used across the dashboard core.

/// A stable, unique identifier for any record in the dataset.
pub type EntityId = String;

/// Monotonic counter bumped every time the dataset is replaced.
pub type DatasetVersion = u64;

/// Round to `places` decimal places, the way every reported metric is rounded.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `part / whole` as a percentage; zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Arithmetic mean; zero for an empty iterator.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
