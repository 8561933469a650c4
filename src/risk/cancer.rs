//! General cancer risk heuristic. Indicative only.

use crate::biomarkers;
use crate::models::client::finite;
use crate::models::ClientRecord;

/// Lower bound on the reported percentage. The current tiers bottom out at
/// 1 %, so only a lower age base would reach it.
const FLOOR: f64 = 0.5;

fn age_base(age: f64) -> f64 {
    match age {
        a if a < 50.0 => 2.0,
        a if a < 60.0 => 6.0,
        a if a < 70.0 => 10.0,
        _ => 15.0,
    }
}

/// Additive percentage from age, smoking, alcohol, BMI and activity.
/// Only age is required; other factors count when present.
pub fn percent(record: &ClientRecord) -> Option<f64> {
    let age = record.age()?;
    let mut risk = age_base(age);

    if record.is_smoker() {
        risk += 5.0;
    }
    if finite(record.lifestyle.alcohol_units_per_week).is_some_and(|u| u > 14.0) {
        risk += 2.0;
    }
    if biomarkers::bmi(record.biometrics.height_cm, record.biometrics.weight_kg)
        .is_some_and(|b| b >= 30.0)
    {
        risk += 2.0;
    }
    if finite(record.lifestyle.activity_days_per_week).is_some_and(|d| d >= 5.0) {
        risk -= 1.0;
    }

    Some(floored(risk))
}

fn floored(risk: f64) -> f64 {
    risk.max(FLOOR)
}
