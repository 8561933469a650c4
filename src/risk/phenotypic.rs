//! Phenotypic age and 10-year mortality (Levine 2018).
//!
//! All nine biomarkers and chronological age must be present. A single
//! missing input yields no estimate at all.

use serde::{Deserialize, Serialize};

use crate::models::{Analyte, ClientRecord, LabPanel, LabUnit};

const INTERCEPT: f64 = -19.907;
const GAMMA: f64 = 0.0077;
const HORIZON_MONTHS: f64 = 120.0;
const CRP_FLOOR_MGDL: f64 = 0.01;

/// Inputs in the units the coefficients expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhenotypicInputs {
    pub age: f64,
    /// g/L
    pub albumin: f64,
    /// µmol/L
    pub creatinine: f64,
    /// mmol/L
    pub glucose: f64,
    /// mg/dL
    pub crp: f64,
    /// %
    pub lymphocytes: f64,
    /// fL
    pub mcv: f64,
    /// %
    pub rdw: f64,
    /// U/L
    pub alp: f64,
    /// 10³/µL
    pub wbc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhenotypicAge {
    pub phenotypic_age: f64,
    /// 10-year mortality, percent.
    pub mortality_percent: f64,
    /// Phenotypic minus chronological age.
    pub age_gap: f64,
}

/// Collect inputs from a panel, naming the first one that is missing.
pub fn inputs_from_panel(age: Option<f64>, labs: &LabPanel) -> Result<PhenotypicInputs, &'static str> {
    fn need(value: Option<f64>, name: &'static str) -> Result<f64, &'static str> {
        value.filter(|v| v.is_finite()).ok_or(name)
    }

    Ok(PhenotypicInputs {
        age: need(age, "age")?,
        albumin: need(labs.canonical(Analyte::Albumin, LabUnit::GramsPerL), "albumin")?,
        creatinine: need(labs.creatinine_umol(), "creatinine")?,
        glucose: need(labs.mmol(Analyte::Glucose), "glucose")?,
        crp: need(labs.canonical(Analyte::Crp, LabUnit::MgDl), "crp")?,
        lymphocytes: need(labs.value(Analyte::Lymphocytes), "lymphocytes")?,
        mcv: need(labs.value(Analyte::Mcv), "mcv")?,
        rdw: need(labs.value(Analyte::Rdw), "rdw")?,
        alp: need(labs.value(Analyte::Alp), "alp")?,
        wbc: need(labs.value(Analyte::Wbc), "wbc")?,
    })
}

/// Linear predictor of the mortality model.
pub fn linear_predictor(i: &PhenotypicInputs) -> f64 {
    INTERCEPT - 0.0336 * i.albumin + 0.0095 * i.creatinine + 0.1953 * i.glucose
        + 0.0954 * i.crp.max(CRP_FLOOR_MGDL).ln()
        - 0.0120 * i.lymphocytes
        + 0.0268 * i.mcv
        + 0.3306 * i.rdw
        + 0.00188 * i.alp
        + 0.0554 * i.wbc
        + 0.0804 * i.age
}

/// Mortality probability (0..1) over the model horizon.
pub fn mortality(xb: f64) -> f64 {
    1.0 - (-xb.exp() * ((HORIZON_MONTHS * GAMMA).exp() - 1.0) / GAMMA).exp()
}

pub fn compute(inputs: &PhenotypicInputs) -> Option<PhenotypicAge> {
    let m = mortality(linear_predictor(inputs));
    let pheno = 141.50225 + (-0.00553 * (1.0 - m).ln()).ln() / 0.090165;
    if !pheno.is_finite() || !m.is_finite() {
        return None;
    }
    Some(PhenotypicAge {
        phenotypic_age: pheno,
        mortality_percent: (m * 100.0).clamp(0.0, 100.0),
        age_gap: pheno - inputs.age,
    })
}

pub fn from_record(record: &ClientRecord) -> Option<PhenotypicAge> {
    match inputs_from_panel(record.age(), &record.labs) {
        Ok(inputs) => compute(&inputs),
        Err(missing) => {
            tracing::debug!(missing, "Phenotypic age skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_panel() -> LabPanel {
        LabPanel::new()
            .with(Analyte::Albumin, 45.0, LabUnit::GramsPerL)
            .with(Analyte::Creatinine, 80.0, LabUnit::UmolL)
            .with(Analyte::Glucose, 5.0, LabUnit::MmolL)
            .with(Analyte::Crp, 0.1, LabUnit::MgDl)
            .with(Analyte::Lymphocytes, 30.0, LabUnit::Percent)
            .with(Analyte::Mcv, 90.0, LabUnit::Femtoliters)
            .with(Analyte::Rdw, 13.0, LabUnit::Percent)
            .with(Analyte::Alp, 70.0, LabUnit::UnitsPerL)
            .with(Analyte::Wbc, 6.0, LabUnit::ThousandPerUl)
    }

    fn record(age: f64, labs: LabPanel) -> ClientRecord {
        let mut r = ClientRecord::default();
        r.demographics.age = Some(age);
        r.labs = labs;
        r
    }

    #[test]
    fn healthy_panel_tracks_chronological_age() {
        let result = from_record(&record(50.0, full_panel())).unwrap();
        assert!((result.phenotypic_age - 50.0).abs() < 15.0);
        assert!(result.mortality_percent > 0.0 && result.mortality_percent < 20.0);
        assert!((result.age_gap - (result.phenotypic_age - 50.0)).abs() < 1e-12);
    }

    #[test]
    fn any_missing_biomarker_nulls_everything() {
        for analyte in [Analyte::Wbc, Analyte::Albumin, Analyte::Crp, Analyte::Glucose] {
            let mut labs = full_panel();
            labs.remove(analyte);
            assert!(from_record(&record(50.0, labs)).is_none(), "{analyte} missing");
        }
    }

    #[test]
    fn missing_age_nulls_everything() {
        let mut r = record(50.0, full_panel());
        r.demographics.age = None;
        assert!(from_record(&r).is_none());
        assert_eq!(inputs_from_panel(None, &full_panel()), Err("age"));
    }

    #[test]
    fn zero_crp_is_floored_before_log() {
        let mut labs = full_panel();
        labs.insert(Analyte::Crp, crate::models::AnalyteValue::new(0.0, LabUnit::MgDl));
        assert!(from_record(&record(50.0, labs)).is_some());
    }

    #[test]
    fn converts_alternate_units() {
        let labs = full_panel()
            .with(Analyte::Albumin, 4.5, LabUnit::GramsPerDl)
            .with(Analyte::Glucose, 90.0, LabUnit::MgDl)
            .with(Analyte::Crp, 1.0, LabUnit::MgPerL);
        let a = from_record(&record(50.0, labs)).unwrap();
        let b = from_record(&record(50.0, full_panel())).unwrap();
        assert!((a.phenotypic_age - b.phenotypic_age).abs() < 1e-9);
    }

    #[test]
    fn older_age_raises_mortality() {
        let young = from_record(&record(40.0, full_panel())).unwrap();
        let old = from_record(&record(70.0, full_panel())).unwrap();
        assert!(old.mortality_percent > young.mortality_percent);
        assert!(old.phenotypic_age > young.phenotypic_age);
    }
}
