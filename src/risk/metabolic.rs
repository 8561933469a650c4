//! Metabolic syndrome, ATP III criteria.
//!
//! Each criterion is evaluated on its own; a missing input fails that
//! criterion only.

use serde::{Deserialize, Serialize};

use crate::models::client::finite;
use crate::models::{Analyte, ClientRecord, Sex};

pub const TRIGLYCERIDES_MGDL: f64 = 150.0;
pub const GLUCOSE_MGDL: f64 = 100.0;
pub const HBA1C_PERCENT: f64 = 5.7;
pub const SBP_MMHG: f64 = 130.0;
pub const DBP_MMHG: f64 = 85.0;

/// Criteria met for a diagnosis.
pub const DIAGNOSIS_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Waist,
    Triglycerides,
    Hdl,
    BloodPressure,
    Glucose,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub passed: bool,
    /// Value compared, in the criterion's unit.
    pub value: Option<f64>,
    pub unit: &'static str,
    /// Human-readable value, or "—" when missing.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetabolicSyndrome {
    pub criteria: Vec<Criterion>,
    pub count: usize,
    pub diagnosis: bool,
}

fn missing() -> String {
    "—".to_string()
}

fn criterion(kind: CriterionKind, value: Option<f64>, unit: &'static str, passed: bool) -> Criterion {
    Criterion {
        kind,
        passed,
        value,
        unit,
        display: value.map_or_else(missing, |v| format!("{v:.1} {unit}")),
    }
}

fn waist_threshold(sex: Option<Sex>) -> Option<f64> {
    match sex? {
        Sex::Male => Some(102.0),
        Sex::Female => Some(88.0),
    }
}

fn hdl_threshold(sex: Option<Sex>) -> Option<f64> {
    match sex? {
        Sex::Male => Some(40.0),
        Sex::Female => Some(50.0),
    }
}

/// Evaluate all five criteria.
pub fn evaluate(record: &ClientRecord) -> MetabolicSyndrome {
    let sex = record.sex();
    let labs = &record.labs;

    let waist = finite(record.biometrics.waist_cm);
    let waist_pass = matches!((waist, waist_threshold(sex)), (Some(w), Some(t)) if w > t);

    let tg = labs.mgdl(Analyte::Triglycerides);
    let tg_pass = tg.is_some_and(|v| v >= TRIGLYCERIDES_MGDL);

    let hdl = labs.mgdl(Analyte::Hdl);
    let hdl_pass = matches!((hdl, hdl_threshold(sex)), (Some(h), Some(t)) if h < t);

    let sbp = finite(record.biometrics.sbp);
    let dbp = finite(record.biometrics.dbp);
    let bp_pass = sbp.is_some_and(|s| s >= SBP_MMHG)
        || dbp.is_some_and(|d| d >= DBP_MMHG)
        || record.bp_treated();
    let bp_display = match (sbp, dbp) {
        (None, None) => missing(),
        (s, d) => format!(
            "{}/{} mmHg",
            s.map_or_else(|| "?".to_string(), |v| format!("{v:.0}")),
            d.map_or_else(|| "?".to_string(), |v| format!("{v:.0}")),
        ),
    };

    let glucose = labs.mgdl(Analyte::Glucose);
    let hba1c = labs.value(Analyte::HbA1c);
    let glucose_pass =
        glucose.is_some_and(|g| g >= GLUCOSE_MGDL) || hba1c.is_some_and(|a| a >= HBA1C_PERCENT);
    let mut glucose_criterion = criterion(CriterionKind::Glucose, glucose, "mg/dL", glucose_pass);
    if glucose.is_none() {
        if let Some(a) = hba1c {
            glucose_criterion.display = format!("HbA1c {a:.1} %");
        }
    }

    let criteria = vec![
        criterion(CriterionKind::Waist, waist, "cm", waist_pass),
        criterion(CriterionKind::Triglycerides, tg, "mg/dL", tg_pass),
        criterion(CriterionKind::Hdl, hdl, "mg/dL", hdl_pass),
        Criterion {
            kind: CriterionKind::BloodPressure,
            passed: bp_pass,
            value: sbp,
            unit: "mmHg",
            display: bp_display,
        },
        glucose_criterion,
    ];

    let count = criteria.iter().filter(|c| c.passed).count();
    MetabolicSyndrome {
        criteria,
        count,
        diagnosis: count >= DIAGNOSIS_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LabPanel, LabUnit};

    fn record() -> ClientRecord {
        let mut r = ClientRecord::default();
        r.demographics.sex = Some(Sex::Male);
        r.biometrics.waist_cm = Some(105.0);
        r.biometrics.sbp = Some(135.0);
        r.biometrics.dbp = Some(80.0);
        r.labs = LabPanel::new()
            .with(Analyte::Triglycerides, 160.0, LabUnit::MgDl)
            .with(Analyte::Hdl, 35.0, LabUnit::MgDl)
            .with(Analyte::Glucose, 110.0, LabUnit::MgDl);
        r
    }

    #[test]
    fn all_five_criteria_pass() {
        let mets = evaluate(&record());
        assert_eq!(mets.count, 5);
        assert!(mets.diagnosis);
        assert!(mets.criteria.iter().all(|c| c.passed));
    }

    #[test]
    fn missing_inputs_fail_only_their_criterion() {
        let mut r = record();
        r.biometrics.waist_cm = None;
        r.labs.remove(Analyte::Hdl);
        let mets = evaluate(&r);
        assert_eq!(mets.count, 3);
        assert!(mets.diagnosis);
        let waist = &mets.criteria[0];
        assert!(!waist.passed);
        assert_eq!(waist.display, "—");
    }

    #[test]
    fn mmol_inputs_are_compared_in_mg_dl() {
        let mut r = record();
        r.labs = LabPanel::new()
            .with(Analyte::Triglycerides, 1.5, LabUnit::MmolL) // ≈133 mg/dL
            .with(Analyte::Hdl, 1.2, LabUnit::MmolL) // ≈46 mg/dL
            .with(Analyte::Glucose, 5.0, LabUnit::MmolL); // 90 mg/dL
        let mets = evaluate(&r);
        assert_eq!(mets.count, 2);
        assert!(!mets.diagnosis);
    }

    #[test]
    fn female_thresholds() {
        let mut r = record();
        r.demographics.sex = Some(Sex::Female);
        r.biometrics.waist_cm = Some(90.0);
        r.labs = LabPanel::new().with(Analyte::Hdl, 45.0, LabUnit::MgDl);
        let mets = evaluate(&r);
        assert!(mets.criteria[0].passed);
        assert!(mets.criteria[2].passed);
    }

    #[test]
    fn hba1c_satisfies_glucose_criterion() {
        let mut r = ClientRecord::default();
        r.labs = LabPanel::new().with(Analyte::HbA1c, 5.8, LabUnit::Percent);
        let mets = evaluate(&r);
        let glucose = &mets.criteria[4];
        assert!(glucose.passed);
        assert_eq!(glucose.display, "HbA1c 5.8 %");
    }

    #[test]
    fn treated_hypertension_passes_bp() {
        let mut r = ClientRecord::default();
        r.biometrics.bp_treated = Some(true);
        let mets = evaluate(&r);
        assert!(mets.criteria[3].passed);
        assert_eq!(mets.count, 1);
    }

    #[test]
    fn unknown_sex_fails_sex_specific_criteria() {
        let mut r = record();
        r.demographics.sex = None;
        let mets = evaluate(&r);
        assert!(!mets.criteria[0].passed);
        assert!(!mets.criteria[2].passed);
        assert_eq!(mets.count, 3);
    }
}
