use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::biomarkers::Biomarkers;
use crate::models::DiseaseCategory;
use crate::risk::caide::CaideScore;
use crate::risk::copd::CopdScore;
use crate::risk::findrisc::FindriscScore;
use crate::risk::framingham::FraminghamScore;
use crate::risk::kidney::{GfrCategory, KdigoStage};
use crate::risk::metabolic::MetabolicSyndrome;
use crate::risk::phenotypic::PhenotypicAge;
use crate::risk::RiskResult;
use crate::models::ClientRecord;

/// A disease-risk percentage before and after the family-history modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustedRisk {
    pub base: RiskResult,
    pub adjusted: RiskResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KidneyAssessment {
    pub egfr: Option<f64>,
    pub gfr_category: Option<GfrCategory>,
    pub kdigo: Option<KdigoStage>,
    /// e.g. "G2A1"
    pub stage_label: Option<String>,
}

/// Everything the engine computed for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub record_key: Option<String>,
    pub client_name: Option<String>,
    pub assessed_on: Option<NaiveDate>,
    pub generated_at: DateTime<Utc>,
    pub family_history_applied: bool,
    pub biomarkers: Biomarkers,
    pub metabolic_syndrome: MetabolicSyndrome,
    pub framingham: Option<FraminghamScore>,
    pub findrisc: Option<FindriscScore>,
    pub copd: Option<CopdScore>,
    pub caide: Option<CaideScore>,
    pub kidney: KidneyAssessment,
    pub phenotypic_age: Option<PhenotypicAge>,
    /// Disease-risk view per category, base and adjusted side by side.
    pub risks: BTreeMap<DiseaseCategory, AdjustedRisk>,
}

impl RiskReport {
    pub fn risk(&self, category: DiseaseCategory) -> Option<&AdjustedRisk> {
        self.risks.get(&category)
    }

    /// Categories with a base percentage.
    pub fn available_count(&self) -> usize {
        self.risks.values().filter(|r| r.base.is_available()).count()
    }
}

/// Risk engine trait: assess a client record into a report.
pub trait RiskEngine {
    fn assess(&self, record: &ClientRecord) -> RiskReport;
}
