//! Numeric extraction, unit-token recognition and magnitude fallbacks.

use crate::models::{Analyte, LabUnit};

/// Glucose at or below this is taken as mmol/L when no unit is given.
pub const GLUCOSE_MMOL_CEILING: f64 = 15.0;

/// Triglycerides at or below this are taken as mmol/L when no unit is given.
pub const TRIGLYCERIDE_MMOL_CEILING: f64 = 5.0;

/// Cholesterol fractions at or below this are taken as mmol/L when no unit is given.
pub const CHOLESTEROL_MMOL_CEILING: f64 = 10.0;

/// Creatinine above this is already µmol/L; at or below it is mg/dL.
/// Healthy ranges (≈60–110 µmol/L vs ≈0.6–1.2 mg/dL) never overlap.
pub const CREATININE_UMOL_FLOOR: f64 = 15.0;

/// Albumin at or below this is g/dL (≈3.5–5), above it g/L (≈35–50).
pub const ALBUMIN_GDL_CEILING: f64 = 10.0;

/// Parse a lab value cell.
///
/// Everything except digits, sign characters and the decimal point is
/// dropped ("5.4 H" → 5.4, "<0.5" → 0.5). A single comma with no point is a
/// decimal comma ("5,4" → 5.4). A non-finite or unparseable result is
/// absent, never zero.
pub fn parse_lab_value(raw: &str) -> Option<f64> {
    let decimal_comma = !raw.contains('.') && raw.matches(',').count() == 1;
    let cleaned: String = raw
        .chars()
        .map(|c| if decimal_comma && c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lowercase, strip spaces, fold both micro signs to `u`.
pub fn normalize_unit_text(text: &str) -> String {
    text.to_lowercase()
        .replace(' ', "")
        .replace('µ', "u")
        .replace('μ', "u")
}

/// Explicit unit named in hint text, as far as the analyte cares.
///
/// Order inside each arm matters: "mg/dl" must be tested before "mg/l",
/// "mg/mmol" before "mmol".
pub fn explicit_unit(analyte: Analyte, hint: &str) -> Option<LabUnit> {
    let h = normalize_unit_text(hint);
    if h.is_empty() {
        return None;
    }

    let mgdl = h.contains("mg/dl") || h.contains("mg%");

    match analyte {
        Analyte::Glucose | Analyte::Triglycerides | Analyte::Hdl | Analyte::Ldl
        | Analyte::TotalCholesterol => {
            if mgdl {
                Some(LabUnit::MgDl)
            } else if h.contains("mmol") {
                Some(LabUnit::MmolL)
            } else {
                None
            }
        }
        Analyte::Creatinine => {
            if h.contains("umol") {
                Some(LabUnit::UmolL)
            } else if mgdl {
                Some(LabUnit::MgDl)
            } else {
                None
            }
        }
        Analyte::Albumin => {
            if h.contains("g/dl") {
                Some(LabUnit::GramsPerDl)
            } else if h.contains("g/l") {
                Some(LabUnit::GramsPerL)
            } else {
                None
            }
        }
        Analyte::Crp => {
            if mgdl {
                Some(LabUnit::MgDl)
            } else if h.contains("mg/l") {
                Some(LabUnit::MgPerL)
            } else {
                None
            }
        }
        Analyte::Acr => {
            if h.contains("mg/mmol") {
                Some(LabUnit::MgPerMmol)
            } else if h.contains("mg/g") {
                Some(LabUnit::MgPerG)
            } else {
                None
            }
        }
        Analyte::HbA1c | Analyte::Lymphocytes | Analyte::Rdw => {
            h.contains('%').then_some(LabUnit::Percent)
        }
        Analyte::Insulin => (h.contains("uu/ml") || h.contains("uiu/ml") || h.contains("mu/l")
            || h.contains("miu/l"))
        .then_some(LabUnit::MicroUnitsPerMl),
        Analyte::Mcv => h.contains("fl").then_some(LabUnit::Femtoliters),
        Analyte::Alp => (h.contains("u/l") || h.contains("iu/l")).then_some(LabUnit::UnitsPerL),
        Analyte::Wbc => (h.contains("10^3") || h.contains("10^9") || h.contains("10*3")
            || h.contains("10*9") || h.contains("/ul"))
        .then_some(LabUnit::ThousandPerUl),
    }
}

/// True when the hint names a unit the analyte's canonical form cannot hold:
/// absolute lymphocyte counts, RDW-SD in fL, IFCC HbA1c in mmol/mol.
/// Such rows are skipped rather than stored under an assumed unit.
pub fn conflicting_unit(analyte: Analyte, hint: &str) -> bool {
    let h = normalize_unit_text(hint);
    if h.contains('%') {
        return false;
    }

    match analyte {
        Analyte::Lymphocytes => ["10^", "10*", "/ul", "/l", "/mm3"]
            .iter()
            .any(|token| h.contains(token)),
        Analyte::Rdw => h.contains("fl") || h.contains("rdw-sd") || h.contains("rdwsd"),
        Analyte::HbA1c => h.contains("mmol/mol"),
        _ => false,
    }
}

/// Magnitude fallback for glucose and lipids: a display annotation only,
/// the value itself is not transformed.
pub fn guess_unit(analyte: Analyte, value: f64) -> Option<LabUnit> {
    let ceiling = match analyte {
        Analyte::Glucose => GLUCOSE_MMOL_CEILING,
        Analyte::Triglycerides => TRIGLYCERIDE_MMOL_CEILING,
        a if a.is_cholesterol() => CHOLESTEROL_MMOL_CEILING,
        _ => return None,
    };

    Some(if value <= ceiling {
        LabUnit::MmolL
    } else {
        LabUnit::MgDl
    })
}
