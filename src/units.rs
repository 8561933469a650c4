//! Mass ↔ molar conversions for the analytes the risk models consume.
//!
//! Each pair is an exact inverse. Nothing here rounds; rounding is a display
//! concern.

use crate::models::{Analyte, AnalyteValue, LabUnit};

/// mg/dL per mmol/L for glucose.
pub const GLUCOSE_FACTOR: f64 = 18.0;

/// mg/dL per mmol/L for triglycerides.
pub const TRIGLYCERIDE_FACTOR: f64 = 88.57;

/// mg/dL per mmol/L for total, HDL and LDL cholesterol.
pub const CHOLESTEROL_FACTOR: f64 = 38.67;

/// µmol/L per mg/dL for creatinine.
pub const CREATININE_FACTOR: f64 = 88.4;

/// mg/g per mg/mmol for the urine albumin-to-creatinine ratio.
pub const ACR_FACTOR: f64 = 8.84;

pub fn glucose_mgdl_to_mmol(mgdl: f64) -> f64 {
    mgdl / GLUCOSE_FACTOR
}

pub fn glucose_mmol_to_mgdl(mmol: f64) -> f64 {
    mmol * GLUCOSE_FACTOR
}

pub fn triglycerides_mgdl_to_mmol(mgdl: f64) -> f64 {
    mgdl / TRIGLYCERIDE_FACTOR
}

pub fn triglycerides_mmol_to_mgdl(mmol: f64) -> f64 {
    mmol * TRIGLYCERIDE_FACTOR
}

pub fn cholesterol_mgdl_to_mmol(mgdl: f64) -> f64 {
    mgdl / CHOLESTEROL_FACTOR
}

pub fn cholesterol_mmol_to_mgdl(mmol: f64) -> f64 {
    mmol * CHOLESTEROL_FACTOR
}

pub fn creatinine_mgdl_to_umol(mgdl: f64) -> f64 {
    mgdl * CREATININE_FACTOR
}

pub fn creatinine_umol_to_mgdl(umol: f64) -> f64 {
    umol / CREATININE_FACTOR
}

/// mg/dL per mmol/L for analytes that have a molar form.
pub fn molar_factor(analyte: Analyte) -> Option<f64> {
    match analyte {
        Analyte::Glucose => Some(GLUCOSE_FACTOR),
        Analyte::Triglycerides => Some(TRIGLYCERIDE_FACTOR),
        a if a.is_cholesterol() => Some(CHOLESTEROL_FACTOR),
        _ => None,
    }
}

/// Express a reading in mg/dL.
///
/// Creatinine is accepted in either mg/dL or µmol/L. Returns `None` when the
/// unit has no mg/dL equivalent for this analyte or the value is not finite.
pub fn to_mgdl(analyte: Analyte, reading: &AnalyteValue) -> Option<f64> {
    let v = reading.finite_value()?;
    match (analyte, reading.unit) {
        (_, LabUnit::MgDl) => Some(v),
        (Analyte::Creatinine, LabUnit::UmolL) => Some(creatinine_umol_to_mgdl(v)),
        (a, LabUnit::MmolL) => molar_factor(a).map(|f| v * f),
        _ => None,
    }
}

/// Express a reading in mmol/L (glucose, triglycerides, cholesterol fractions).
pub fn to_mmol(analyte: Analyte, reading: &AnalyteValue) -> Option<f64> {
    let v = reading.finite_value()?;
    match reading.unit {
        LabUnit::MmolL => molar_factor(analyte).map(|_| v),
        LabUnit::MgDl => molar_factor(analyte).map(|f| v / f),
        _ => None,
    }
}

/// Express a creatinine reading in µmol/L.
pub fn creatinine_to_umol(reading: &AnalyteValue) -> Option<f64> {
    let v = reading.finite_value()?;
    match reading.unit {
        LabUnit::UmolL => Some(v),
        LabUnit::MgDl => Some(creatinine_mgdl_to_umol(v)),
        _ => None,
    }
}

/// Canonicalise the secondary analytes (albumin g/L, CRP mg/dL, ACR mg/g).
/// Units that are already canonical pass through unchanged.
pub fn to_canonical(analyte: Analyte, reading: &AnalyteValue) -> Option<AnalyteValue> {
    let v = reading.finite_value()?;
    let converted = match (analyte, reading.unit) {
        (Analyte::Creatinine, _) => AnalyteValue::new(creatinine_to_umol(reading)?, LabUnit::UmolL),
        (Analyte::Albumin, LabUnit::GramsPerDl) => AnalyteValue::new(v * 10.0, LabUnit::GramsPerL),
        (Analyte::Crp, LabUnit::MgPerL) => AnalyteValue::new(v / 10.0, LabUnit::MgDl),
        (Analyte::Acr, LabUnit::MgPerMmol) => AnalyteValue::new(v * ACR_FACTOR, LabUnit::MgPerG),
        _ => *reading,
    };
    Some(converted)
}
