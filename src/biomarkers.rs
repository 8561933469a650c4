//! Derived biomarkers: body composition and insulin-resistance indices.
//!
//! Every function returns `None` when an input is missing, non-finite or
//! would divide by zero.

use serde::{Deserialize, Serialize};

use crate::models::client::finite;
use crate::models::{Analyte, ClientRecord, LabPanel, Sex};

fn positive(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v > 0.0)
}

fn finite_result(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Body mass index, kg/m².
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let h = positive(height_cm)? / 100.0;
    let w = positive(weight_kg)?;
    finite_result(w / (h * h))
}

/// Waist-to-height ratio.
pub fn whtr(waist_cm: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let waist = finite(waist_cm)?;
    let height = positive(height_cm)?;
    finite_result(waist / height)
}

/// HOMA-IR from glucose (mg/dL) and fasting insulin (µU/mL).
pub fn homa_ir(glucose_mgdl: Option<f64>, insulin: Option<f64>) -> Option<f64> {
    let g = finite(glucose_mgdl)?;
    let i = finite(insulin)?;
    finite_result(g * i / 405.0)
}

/// Triglyceride-glucose index, both inputs in mg/dL.
pub fn tyg(triglycerides_mgdl: Option<f64>, glucose_mgdl: Option<f64>) -> Option<f64> {
    let product = finite(triglycerides_mgdl)? * finite(glucose_mgdl)? / 2.0;
    if product <= 0.0 {
        return None;
    }
    finite_result(product.ln())
}

/// Atherogenic index of plasma, both inputs in mg/dL.
pub fn aip(triglycerides_mgdl: Option<f64>, hdl_mgdl: Option<f64>) -> Option<f64> {
    let tg = finite(triglycerides_mgdl)?;
    let hdl = finite(hdl_mgdl).filter(|v| *v != 0.0)?;
    let ratio = tg / hdl;
    if ratio <= 0.0 {
        return None;
    }
    finite_result(ratio.log10())
}

/// Visceral adiposity index; triglycerides and HDL in mmol/L.
pub fn vai(
    sex: Option<Sex>,
    waist_cm: Option<f64>,
    bmi: Option<f64>,
    triglycerides_mmol: Option<f64>,
    hdl_mmol: Option<f64>,
) -> Option<f64> {
    let nonzero = |v: Option<f64>| finite(v).filter(|x| *x != 0.0);
    let waist = nonzero(waist_cm)?;
    let bmi = nonzero(bmi)?;
    let tg = nonzero(triglycerides_mmol)?;
    let hdl = nonzero(hdl_mmol)?;

    let value = match sex? {
        Sex::Male => (waist / (39.68 + 1.88 * bmi)) * (tg / 1.03) * (1.31 / hdl),
        Sex::Female => (waist / (36.58 + 1.89 * bmi)) * (tg / 0.81) * (1.52 / hdl),
    };
    finite_result(value)
}

/// All derived biomarkers for one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biomarkers {
    pub bmi: Option<f64>,
    pub whtr: Option<f64>,
    pub homa_ir: Option<f64>,
    pub tyg: Option<f64>,
    pub aip: Option<f64>,
    pub vai: Option<f64>,
}

impl Biomarkers {
    pub fn from_record(record: &ClientRecord) -> Self {
        let b = &record.biometrics;
        let labs: &LabPanel = &record.labs;
        let body_mass = bmi(b.height_cm, b.weight_kg);

        Self {
            bmi: body_mass,
            whtr: whtr(b.waist_cm, b.height_cm),
            homa_ir: homa_ir(labs.mgdl(Analyte::Glucose), labs.value(Analyte::Insulin)),
            tyg: tyg(labs.mgdl(Analyte::Triglycerides), labs.mgdl(Analyte::Glucose)),
            aip: aip(labs.mgdl(Analyte::Triglycerides), labs.mgdl(Analyte::Hdl)),
            vai: vai(
                record.sex(),
                b.waist_cm,
                body_mass,
                labs.mmol(Analyte::Triglycerides),
                labs.mmol(Analyte::Hdl),
            ),
        }
    }
}
