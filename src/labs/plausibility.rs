//! Physiological plausibility checks on a normalized panel.
//!
//! These are wide "life-compatible" ranges, not reference ranges. A value
//! outside one usually means a unit was misread, and the warning is the only
//! place that shows up; the value itself is still passed to the models.

use crate::models::{Analyte, LabPanel, LabUnit};

/// Physiological range for an analyte in a fixed comparison unit.
struct LabRange {
    analyte: Analyte,
    unit: LabUnit,
    min: f64,
    max: f64,
}

const LAB_PLAUSIBILITY: &[LabRange] = &[
    // Glycaemic
    LabRange { analyte: Analyte::Glucose, unit: LabUnit::MmolL, min: 0.5, max: 60.0 },
    LabRange { analyte: Analyte::HbA1c, unit: LabUnit::Percent, min: 2.0, max: 20.0 },
    LabRange { analyte: Analyte::Insulin, unit: LabUnit::MicroUnitsPerMl, min: 0.1, max: 1000.0 },
    // Lipids
    LabRange { analyte: Analyte::TotalCholesterol, unit: LabUnit::MmolL, min: 0.5, max: 20.0 },
    LabRange { analyte: Analyte::Triglycerides, unit: LabUnit::MmolL, min: 0.1, max: 50.0 },
    LabRange { analyte: Analyte::Hdl, unit: LabUnit::MmolL, min: 0.1, max: 5.0 },
    LabRange { analyte: Analyte::Ldl, unit: LabUnit::MmolL, min: 0.1, max: 15.0 },
    // Renal
    LabRange { analyte: Analyte::Creatinine, unit: LabUnit::UmolL, min: 5.0, max: 2000.0 },
    LabRange { analyte: Analyte::Acr, unit: LabUnit::MgPerG, min: 0.0, max: 10000.0 },
    // Liver and inflammation
    LabRange { analyte: Analyte::Albumin, unit: LabUnit::GramsPerL, min: 5.0, max: 60.0 },
    LabRange { analyte: Analyte::Alp, unit: LabUnit::UnitsPerL, min: 0.0, max: 5000.0 },
    LabRange { analyte: Analyte::Crp, unit: LabUnit::MgDl, min: 0.0, max: 50.0 },
    // Haematology
    LabRange { analyte: Analyte::Wbc, unit: LabUnit::ThousandPerUl, min: 0.1, max: 500.0 },
    LabRange { analyte: Analyte::Lymphocytes, unit: LabUnit::Percent, min: 0.0, max: 100.0 },
    LabRange { analyte: Analyte::Mcv, unit: LabUnit::Femtoliters, min: 40.0, max: 160.0 },
    LabRange { analyte: Analyte::Rdw, unit: LabUnit::Percent, min: 5.0, max: 40.0 },
];

/// Value of `analyte` expressed in `unit`, when the panel can produce it.
fn comparable(panel: &LabPanel, analyte: Analyte, unit: LabUnit) -> Option<f64> {
    match unit {
        LabUnit::MmolL => panel.mmol(analyte),
        LabUnit::UmolL if analyte == Analyte::Creatinine => panel.creatinine_umol(),
        _ => panel.canonical(analyte, unit),
    }
}

/// Warn about every reading outside its physiological range.
pub fn check_plausibility(panel: &LabPanel) -> Vec<String> {
    let mut warnings = Vec::new();

    for range in LAB_PLAUSIBILITY {
        let Some(value) = comparable(panel, range.analyte, range.unit) else {
            continue;
        };

        let bound = if value < range.min {
            Some(("below physiological minimum", range.min))
        } else if value > range.max {
            Some(("above physiological maximum", range.max))
        } else {
            None
        };

        if let Some((what, limit)) = bound {
            tracing::warn!(analyte = %range.analyte, value, limit, "Implausible lab value");
            warnings.push(format!(
                "Lab '{}': value {value} {} {what} ({limit}); check the unit",
                range.analyte, range.unit
            ));
        }
    }

    warnings
}
