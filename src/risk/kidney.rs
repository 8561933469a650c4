//! Kidney function: CKD-EPI 2021 eGFR and KDIGO staging.

use serde::{Deserialize, Serialize};

use crate::models::{Analyte, ClientRecord, LabUnit, Sex};

/// Glomerular filtration category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GfrCategory {
    G1,
    G2,
    G3a,
    G3b,
    G4,
    G5,
}

impl GfrCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::G1 => "G1",
            Self::G2 => "G2",
            Self::G3a => "G3a",
            Self::G3b => "G3b",
            Self::G4 => "G4",
            Self::G5 => "G5",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::G1 => "Normal or high",
            Self::G2 => "Mildly decreased",
            Self::G3a => "Mildly to moderately decreased",
            Self::G3b => "Moderately to severely decreased",
            Self::G4 => "Severely decreased",
            Self::G5 => "Kidney failure",
        }
    }

    fn row(&self) -> usize {
        *self as usize
    }
}

/// Albuminuria category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlbuminuriaCategory {
    A1,
    A2,
    A3,
}

impl AlbuminuriaCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
        }
    }

    fn column(&self) -> usize {
        *self as usize
    }
}

/// Nominal risk (%) by G row and A column.
const KDIGO_GRID: [[f64; 3]; 6] = [
    [2.0, 10.0, 25.0],
    [2.0, 10.0, 25.0],
    [10.0, 25.0, 50.0],
    [25.0, 50.0, 75.0],
    [50.0, 75.0, 90.0],
    [75.0, 90.0, 95.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdigoStage {
    pub gfr: GfrCategory,
    pub albuminuria: AlbuminuriaCategory,
    pub percent: f64,
}

impl KdigoStage {
    /// Combined label, e.g. "G2A1".
    pub fn label(&self) -> String {
        format!("{}{}", self.gfr.label(), self.albuminuria.label())
    }
}

/// CKD-EPI 2021 (race-free) eGFR, mL/min/1.73m², creatinine in mg/dL.
pub fn egfr(creatinine_mgdl: Option<f64>, age: Option<f64>, sex: Option<Sex>) -> Option<f64> {
    let scr = creatinine_mgdl.filter(|v| v.is_finite() && *v > 0.0)?;
    let age = age.filter(|v| v.is_finite())?;
    let sex = sex?;

    let (k, a) = match sex {
        Sex::Female => (0.7, -0.241),
        Sex::Male => (0.9, -0.302),
    };
    let ratio = scr / k;
    let mut value = 142.0 * ratio.min(1.0).powf(a) * ratio.max(1.0).powf(-1.200) * 0.9938f64.powf(age);
    if sex == Sex::Female {
        value *= 1.012;
    }
    value.is_finite().then_some(value)
}

pub fn gfr_category(egfr: f64) -> GfrCategory {
    match egfr {
        e if e >= 90.0 => GfrCategory::G1,
        e if e >= 60.0 => GfrCategory::G2,
        e if e >= 45.0 => GfrCategory::G3a,
        e if e >= 30.0 => GfrCategory::G3b,
        e if e >= 15.0 => GfrCategory::G4,
        _ => GfrCategory::G5,
    }
}

/// ACR in mg/g.
pub fn albuminuria_category(acr_mg_g: f64) -> AlbuminuriaCategory {
    match acr_mg_g {
        a if a < 30.0 => AlbuminuriaCategory::A1,
        a if a < 300.0 => AlbuminuriaCategory::A2,
        _ => AlbuminuriaCategory::A3,
    }
}

pub fn kdigo(egfr: Option<f64>, acr_mg_g: Option<f64>) -> Option<KdigoStage> {
    let egfr = egfr.filter(|v| v.is_finite())?;
    let acr = acr_mg_g.filter(|v| v.is_finite())?;
    let gfr = gfr_category(egfr);
    let albuminuria = albuminuria_category(acr);
    Some(KdigoStage {
        gfr,
        albuminuria,
        percent: KDIGO_GRID[gfr.row()][albuminuria.column()],
    })
}

/// eGFR for a record; creatinine may be stored in mg/dL or µmol/L.
pub fn egfr_from_record(record: &ClientRecord) -> Option<f64> {
    egfr(record.labs.mgdl(Analyte::Creatinine), record.age(), record.sex())
}

pub fn kdigo_from_record(record: &ClientRecord) -> Option<KdigoStage> {
    kdigo(
        egfr_from_record(record),
        record.labs.canonical(Analyte::Acr, LabUnit::MgPerG),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LabPanel;

    #[test]
    fn egfr_female_sixty() {
        let e = egfr(Some(0.8), Some(60.0), Some(Sex::Female)).unwrap();
        let expected = 142.0 * (0.8f64 / 0.7).powf(-1.2) * 0.9938f64.powf(60.0) * 1.012;
        assert!((e - expected).abs() < 1e-9);
        assert!(e > 80.0 && e < 90.0);
        assert_eq!(gfr_category(e), GfrCategory::G2);
    }

    #[test]
    fn egfr_low_creatinine_uses_min_branch() {
        let e = egfr(Some(0.6), Some(40.0), Some(Sex::Male)).unwrap();
        let expected = 142.0 * (0.6f64 / 0.9).powf(-0.302) * 0.9938f64.powf(40.0);
        assert!((e - expected).abs() < 1e-9);
        assert_eq!(gfr_category(e), GfrCategory::G1);
    }

    #[test]
    fn egfr_requires_all_inputs() {
        assert!(egfr(None, Some(60.0), Some(Sex::Male)).is_none());
        assert!(egfr(Some(1.0), None, Some(Sex::Male)).is_none());
        assert!(egfr(Some(1.0), Some(60.0), None).is_none());
        assert!(egfr(Some(0.0), Some(60.0), Some(Sex::Male)).is_none());
    }

    #[test]
    fn category_edges() {
        assert_eq!(gfr_category(90.0), GfrCategory::G1);
        assert_eq!(gfr_category(89.9), GfrCategory::G2);
        assert_eq!(gfr_category(44.9), GfrCategory::G3b);
        assert_eq!(gfr_category(14.9), GfrCategory::G5);
        assert_eq!(albuminuria_category(29.9), AlbuminuriaCategory::A1);
        assert_eq!(albuminuria_category(30.0), AlbuminuriaCategory::A2);
        assert_eq!(albuminuria_category(300.0), AlbuminuriaCategory::A3);
    }

    #[test]
    fn end_to_end_lowest_risk_cell() {
        let mut record = ClientRecord::default();
        record.demographics.sex = Some(Sex::Female);
        record.demographics.age = Some(60.0);
        record.labs = LabPanel::new()
            .with(Analyte::Creatinine, 0.8, LabUnit::MgDl)
            .with(Analyte::Acr, 20.0, LabUnit::MgPerG);

        let stage = kdigo_from_record(&record).unwrap();
        assert!(matches!(stage.gfr, GfrCategory::G1 | GfrCategory::G2));
        assert_eq!(stage.albuminuria, AlbuminuriaCategory::A1);
        assert_eq!(stage.percent, 2.0);
        assert_eq!(stage.label(), "G2A1");
    }

    #[test]
    fn creatinine_in_umol_gives_same_egfr() {
        let mut record = ClientRecord::default();
        record.demographics.sex = Some(Sex::Male);
        record.demographics.age = Some(55.0);
        record.labs = LabPanel::new().with(Analyte::Creatinine, 88.4, LabUnit::UmolL);
        let from_umol = egfr_from_record(&record).unwrap();
        let from_mgdl = egfr(Some(1.0), Some(55.0), Some(Sex::Male)).unwrap();
        assert!((from_umol - from_mgdl).abs() < 1e-9);
    }

    #[test]
    fn kdigo_needs_acr() {
        assert!(kdigo(Some(75.0), None).is_none());
        let stage = kdigo(Some(25.0), Some(500.0)).unwrap();
        assert_eq!(stage.percent, 90.0);
        assert_eq!(stage.label(), "G4A3");
    }
}
