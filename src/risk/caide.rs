//! CAIDE 20-year dementia risk.

use serde::{Deserialize, Serialize};

use crate::biomarkers;
use crate::models::client::finite;
use crate::models::{Analyte, ClientRecord, Sex};

/// Days of activity per week below which a client counts as inactive.
const ACTIVE_DAYS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaideScore {
    pub score: u32,
    pub percent: f64,
}

/// Score → 20-year percentage.
pub fn score_to_percent(score: u32) -> f64 {
    match score {
        0..=5 => 1.0,
        6 => 1.9,
        7 => 2.9,
        8 => 4.2,
        9 => 5.8,
        10 => 7.4,
        11 => 11.9,
        12 => 16.4,
        _ => 100.0,
    }
}

fn age_points(age: f64) -> u32 {
    match age {
        a if a < 47.0 => 0,
        a if a <= 53.0 => 3,
        _ => 4,
    }
}

fn education_points(years: f64) -> u32 {
    match years {
        y if y >= 10.0 => 0,
        y if y >= 7.0 => 2,
        _ => 3,
    }
}

/// Requires age, sex, education, systolic pressure, BMI and total cholesterol.
pub fn score(record: &ClientRecord) -> Option<CaideScore> {
    let age = record.age()?;
    let sex = record.sex()?;
    let education = finite(record.demographics.education_years)?;
    let sbp = finite(record.biometrics.sbp)?;
    let bmi = biomarkers::bmi(record.biometrics.height_cm, record.biometrics.weight_kg)?;
    let tc_mmol = record.labs.mmol(Analyte::TotalCholesterol)?;

    let mut score = age_points(age) + education_points(education);
    if sex == Sex::Male {
        score += 1;
    }
    if sbp > 140.0 {
        score += 2;
    }
    if bmi > 30.0 {
        score += 2;
    }
    if tc_mmol > 6.5 {
        score += 2;
    }
    if finite(record.lifestyle.activity_days_per_week).is_some_and(|d| d < ACTIVE_DAYS) {
        score += 1;
    }

    Some(CaideScore {
        score,
        percent: score_to_percent(score),
    })
}
