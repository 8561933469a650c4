//! Framingham 10-year cardiovascular risk (ATP III point tables).

use serde::{Deserialize, Serialize};

use crate::models::client::finite;
use crate::models::{Analyte, ClientRecord, Sex};

/// HbA1c (%) at or above which diabetes is assumed.
pub const DIABETES_HBA1C: f64 = 6.5;

/// Fasting glucose (mg/dL) at or above which diabetes is assumed.
pub const DIABETES_GLUCOSE_MGDL: f64 = 126.0;

/// Age points per five-year band, 20-34 then 35-39 through 75-79.
const MEN_AGE: [i32; 10] = [-9, -4, 0, 3, 6, 8, 10, 11, 12, 13];
const WOMEN_AGE: [i32; 10] = [-7, -3, 0, 3, 6, 8, 10, 12, 14, 16];

/// Total-cholesterol points, row per cholesterol band (<160, 160-199,
/// 200-239, 240-279, ≥280), column per age decade (20-39 … 70-79).
const MEN_TC: [[i32; 5]; 5] = [
    [0, 0, 0, 0, 0],
    [4, 3, 2, 1, 0],
    [7, 5, 3, 1, 0],
    [9, 6, 4, 2, 1],
    [11, 8, 5, 3, 1],
];
const WOMEN_TC: [[i32; 5]; 5] = [
    [0, 0, 0, 0, 0],
    [4, 3, 2, 1, 1],
    [8, 6, 4, 2, 1],
    [11, 8, 5, 3, 2],
    [13, 10, 7, 4, 2],
];

/// Smoking points per age decade.
const MEN_SMOKER: [i32; 5] = [8, 5, 3, 1, 1];
const WOMEN_SMOKER: [i32; 5] = [9, 7, 4, 2, 1];

/// Systolic points per band (<120, 120-129, 130-139, 140-159, ≥160),
/// untreated then treated.
const MEN_SBP: [[i32; 2]; 5] = [[0, 0], [0, 1], [1, 2], [1, 2], [2, 3]];
const WOMEN_SBP: [[i32; 2]; 5] = [[0, 0], [1, 3], [2, 4], [3, 5], [4, 6]];

const MEN_DIABETES: i32 = 3;
const WOMEN_DIABETES: i32 = 4;

/// Points → 10-year percentage. Only the keys where the percentage changes
/// are listed; lookup takes the largest key not above the total.
const MEN_RISK: &[(i32, f64)] = &[
    (0, 1.0),
    (5, 2.0),
    (7, 3.0),
    (8, 4.0),
    (9, 5.0),
    (10, 6.0),
    (11, 8.0),
    (12, 10.0),
    (13, 12.0),
    (14, 16.0),
    (15, 20.0),
    (16, 25.0),
    (17, 30.0),
];
const WOMEN_RISK: &[(i32, f64)] = &[
    (9, 1.0),
    (13, 2.0),
    (15, 3.0),
    (16, 4.0),
    (17, 5.0),
    (18, 6.0),
    (19, 8.0),
    (20, 11.0),
    (21, 14.0),
    (22, 17.0),
    (23, 22.0),
    (24, 27.0),
    (25, 30.0),
];

/// Inputs the point tables need, already in mg/dL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraminghamInputs {
    pub sex: Sex,
    pub age: f64,
    pub total_cholesterol_mgdl: f64,
    pub hdl_mgdl: f64,
    pub sbp: f64,
    pub bp_treated: bool,
    pub smoker: bool,
    pub diabetes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraminghamScore {
    pub points: i32,
    pub percent: f64,
}

fn age_band(age: f64) -> usize {
    if age < 35.0 {
        0
    } else {
        (((age - 35.0) / 5.0).floor() as usize + 1).min(9)
    }
}

fn decade(age: f64) -> usize {
    match age {
        a if a < 40.0 => 0,
        a if a < 50.0 => 1,
        a if a < 60.0 => 2,
        a if a < 70.0 => 3,
        _ => 4,
    }
}

fn cholesterol_band(tc: f64) -> usize {
    match tc {
        t if t < 160.0 => 0,
        t if t < 200.0 => 1,
        t if t < 240.0 => 2,
        t if t < 280.0 => 3,
        _ => 4,
    }
}

fn hdl_points(hdl: f64) -> i32 {
    match hdl {
        h if h >= 60.0 => -1,
        h if h >= 50.0 => 0,
        h if h >= 40.0 => 1,
        _ => 2,
    }
}

fn sbp_band(sbp: f64) -> usize {
    match sbp {
        s if s < 120.0 => 0,
        s if s < 130.0 => 1,
        s if s < 140.0 => 2,
        s if s < 160.0 => 3,
        _ => 4,
    }
}

/// Total points for the inputs.
pub fn points(inputs: &FraminghamInputs) -> i32 {
    let (age_pts, tc_pts, smoke_pts, sbp_pts, dm_pts) = match inputs.sex {
        Sex::Male => (&MEN_AGE, &MEN_TC, &MEN_SMOKER, &MEN_SBP, MEN_DIABETES),
        Sex::Female => (&WOMEN_AGE, &WOMEN_TC, &WOMEN_SMOKER, &WOMEN_SBP, WOMEN_DIABETES),
    };
    let dec = decade(inputs.age);

    let mut total = age_pts[age_band(inputs.age)];
    total += tc_pts[cholesterol_band(inputs.total_cholesterol_mgdl)][dec];
    total += hdl_points(inputs.hdl_mgdl);
    total += sbp_pts[sbp_band(inputs.sbp)][usize::from(inputs.bp_treated)];
    if inputs.smoker {
        total += smoke_pts[dec];
    }
    if inputs.diabetes {
        total += dm_pts;
    }
    total
}

/// Floor lookup: the entry with the largest key ≤ `points`, or the first
/// entry when `points` is below every key.
fn floor_lookup(table: &[(i32, f64)], points: i32) -> f64 {
    table
        .iter()
        .take_while(|(key, _)| *key <= points)
        .last()
        .or(table.first())
        .map_or(0.0, |(_, pct)| *pct)
}

/// 10-year percentage for a point total.
pub fn points_to_percent(sex: Sex, points: i32) -> f64 {
    match sex {
        Sex::Male => floor_lookup(MEN_RISK, points),
        Sex::Female => floor_lookup(WOMEN_RISK, points),
    }
}

pub fn score(inputs: &FraminghamInputs) -> FraminghamScore {
    let points = points(inputs);
    FraminghamScore {
        points,
        percent: points_to_percent(inputs.sex, points),
    }
}

/// Diabetes status: recorded history, or HbA1c / fasting glucose in the
/// diabetic range.
pub fn has_diabetes(record: &ClientRecord) -> bool {
    record.history.diabetes == Some(true)
        || record
            .labs
            .value(Analyte::HbA1c)
            .is_some_and(|a| a >= DIABETES_HBA1C)
        || record
            .labs
            .mgdl(Analyte::Glucose)
            .is_some_and(|g| g >= DIABETES_GLUCOSE_MGDL)
}

/// Extract the table inputs from a record; `None` when age, sex, total
/// cholesterol, HDL or systolic pressure is missing.
pub fn inputs_from_record(record: &ClientRecord) -> Option<FraminghamInputs> {
    Some(FraminghamInputs {
        sex: record.sex()?,
        age: record.age()?,
        total_cholesterol_mgdl: record.labs.mgdl(Analyte::TotalCholesterol)?,
        hdl_mgdl: record.labs.mgdl(Analyte::Hdl)?,
        sbp: finite(record.biometrics.sbp)?,
        bp_treated: record.bp_treated(),
        smoker: record.is_smoker(),
        diabetes: has_diabetes(record),
    })
}

pub fn from_record(record: &ClientRecord) -> Option<FraminghamScore> {
    inputs_from_record(record).map(|i| score(&i))
}
