//! Confidence score aggregation.

use crate::model::TestResults;

/// Number of decimals the confidence score is reported with.
pub const CONFIDENCE_DECIMALS: i32 = 2;

/// Mean of the drop, vibration and compression scores, rounded to two
/// decimals with ties going to the even neighbour.
///
/// # Examples
/// ```
/// use virtupack::model::TestResults;
/// use virtupack::score::confidence;
///
/// let results = TestResults { drop: 94, vibration: 82, compression: 90 };
/// assert_eq!(confidence(&results), 88.67);
/// ```
pub fn confidence(results: &TestResults) -> f64 {
    let sum = u32::from(results.drop) + u32::from(results.vibration) + u32::from(results.compression);
    round_half_even(f64::from(sum) / 3.0, CONFIDENCE_DECIMALS)
}

/// Rounds to `decimals` places, resolving exact ties to the even digit.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
