//! Family-history modifier for disease-risk percentages.

use super::HEURISTIC_CEILING;
use crate::models::RelativeCounts;

const FIRST_DEGREE_WEIGHT: f64 = 0.10;
const SECOND_DEGREE_WEIGHT: f64 = 0.05;
const THIRD_DEGREE_WEIGHT: f64 = 0.02;

/// Multiplier for a set of affected relatives.
pub fn multiplier(counts: RelativeCounts) -> f64 {
    1.0 + FIRST_DEGREE_WEIGHT * f64::from(counts.first_degree)
        + SECOND_DEGREE_WEIGHT * f64::from(counts.second_degree)
        + THIRD_DEGREE_WEIGHT * f64::from(counts.third_degree)
}

/// Scale a base percentage and cap it. A missing base stays missing.
pub fn adjust(base: Option<f64>, counts: RelativeCounts) -> Option<f64> {
    let base = base.filter(|b| b.is_finite())?;
    Some((base * multiplier(counts)).min(HEURISTIC_CEILING))
}
