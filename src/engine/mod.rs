//! Report assembly: runs every model over one record.

pub mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::time::Instant;

use crate::biomarkers::Biomarkers;
use crate::config::EngineConfig;
use crate::models::{ClientRecord, DiseaseCategory};
use crate::risk::kidney::{self, KdigoStage};
use crate::risk::{
    caide, cancer, clamp_percent, copd, family, findrisc, framingham, metabolic, phenotypic,
    RiskResult, HEURISTIC_CEILING,
};

/// Default implementation of the risk engine.
pub struct DefaultRiskEngine {
    config: EngineConfig,
}

impl DefaultRiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn adjusted(&self, record: &ClientRecord, category: DiseaseCategory, base: Option<f64>) -> AdjustedRisk {
        let adjusted = if self.config.apply_family_history {
            family::adjust(base, record.family_history.counts(category))
        } else {
            base
        };
        AdjustedRisk {
            base: RiskResult::new(base),
            adjusted: RiskResult::new(adjusted),
        }
    }
}

impl Default for DefaultRiskEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RiskEngine for DefaultRiskEngine {
    fn assess(&self, record: &ClientRecord) -> RiskReport {
        let start = Instant::now();

        let biomarkers = Biomarkers::from_record(record);
        let metabolic_syndrome = metabolic::evaluate(record);
        let framingham = framingham::from_record(record);
        let findrisc = findrisc::score(record);
        let copd = copd::score(record);
        let caide = caide::score(record);

        let egfr = kidney::egfr_from_record(record);
        let kdigo = kidney::kdigo_from_record(record);
        let kidney = KidneyAssessment {
            egfr,
            gfr_category: egfr.map(kidney::gfr_category),
            kdigo,
            stage_label: kdigo.as_ref().map(KdigoStage::label),
        };

        let phenotypic_age = phenotypic::from_record(record);
        let cancer = cancer::percent(record).map(|p| clamp_percent(p, HEURISTIC_CEILING));

        let bases = [
            (DiseaseCategory::Cvd, framingham.map(|s| s.percent)),
            (DiseaseCategory::T2d, findrisc.map(|s| s.percent)),
            (DiseaseCategory::Cancer, cancer),
            (DiseaseCategory::Copd, copd.map(|s| s.percent)),
            (DiseaseCategory::Neuro, caide.map(|s| clamp_percent(s.percent, 100.0))),
            (DiseaseCategory::Ckd, kdigo.map(|k| k.percent)),
        ];
        let risks: BTreeMap<_, _> = bases
            .into_iter()
            .map(|(category, base)| (category, self.adjusted(record, category, base)))
            .collect();

        let record_key = record.id.map(|id| self.config.record_key(&id.to_string()));

        let report = RiskReport {
            record_key,
            client_name: record.name.clone(),
            assessed_on: record.assessed_on,
            generated_at: chrono::Utc::now(),
            family_history_applied: self.config.apply_family_history,
            biomarkers,
            metabolic_syndrome,
            framingham,
            findrisc,
            copd,
            caide,
            kidney,
            phenotypic_age,
            risks,
        };

        tracing::info!(
            record_key = report.record_key.as_deref().unwrap_or("-"),
            available = report.available_count(),
            unavailable = report.risks.len() - report.available_count(),
            mets_criteria = report.metabolic_syndrome.count,
            phenotypic_age = report.phenotypic_age.is_some(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Risk assessment complete"
        );

        report
    }
}
