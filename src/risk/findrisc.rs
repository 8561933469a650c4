//! FINDRISC 10-year type 2 diabetes risk.

use serde::{Deserialize, Serialize};

use crate::biomarkers;
use crate::models::client::finite;
use crate::models::{ClientRecord, DiseaseCategory, Sex};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FindriscScore {
    pub score: u32,
    pub percent: f64,
}

fn age_points(age: f64) -> u32 {
    match age {
        a if a < 45.0 => 0,
        a if a < 55.0 => 2,
        a if a <= 64.0 => 3,
        _ => 4,
    }
}

fn bmi_points(bmi: f64) -> u32 {
    match bmi {
        b if b < 25.0 => 0,
        b if b <= 30.0 => 1,
        _ => 3,
    }
}

fn waist_points(sex: Sex, waist: f64) -> u32 {
    let (lower, upper) = match sex {
        Sex::Male => (94.0, 102.0),
        Sex::Female => (80.0, 88.0),
    };
    if waist < lower {
        0
    } else if waist <= upper {
        3
    } else {
        4
    }
}

/// Score → 10-year percentage.
pub fn score_to_percent(score: u32) -> f64 {
    match score {
        0..=11 => 1.0,
        12..=14 => 4.0,
        15..=20 => 17.0,
        _ => 33.0,
    }
}

/// Additive FINDRISC score. Requires age, sex, height/weight and waist.
pub fn score(record: &ClientRecord) -> Option<FindriscScore> {
    let age = record.age()?;
    let sex = record.sex()?;
    let bmi = biomarkers::bmi(record.biometrics.height_cm, record.biometrics.weight_kg)?;
    let waist = finite(record.biometrics.waist_cm)?;

    let mut score = age_points(age) + bmi_points(bmi) + waist_points(sex, waist);

    // Unknown activity or diet scores as the healthy answer.
    if finite(record.lifestyle.activity_days_per_week).is_some_and(|d| d < 5.0) {
        score += 2;
    }
    if record.lifestyle.daily_produce == Some(false) {
        score += 1;
    }
    if record.bp_treated() {
        score += 2;
    }
    if record.history.high_glucose_history == Some(true) {
        score += 5;
    }

    let family = record.family_history.counts(DiseaseCategory::T2d);
    if family.first_degree > 0 {
        score += 5;
    } else if family.second_degree > 0 {
        score += 3;
    }

    Some(FindriscScore {
        score,
        percent: score_to_percent(score),
    })
}
