//! Extraction from flattened document text (PDF or pasted report).
//!
//! Document text has no reliable row structure, so each analyte is searched
//! for with a pattern that requires an explicit unit after the number. Per
//! analyte the mass-unit pattern runs before the molar one, and the first
//! pattern to produce a value owns the analyte for the rest of the pass.

use std::sync::LazyLock;

use regex::Regex;

use super::plausibility::check_plausibility;
use super::types::{LabReading, NormalizedLabs, UnitSource};
use super::value::parse_lab_value;
use crate::models::{Analyte, AnalyteValue, LabUnit};
use crate::units;

/// Characters allowed between a label and its number.
const GAP: &str = r"[^\d]{0,40}?";

/// Captured number.
const NUM: &str = r"(\d+(?:\.\d+)?)";

/// One analyte/unit search.
struct TextPattern {
    analyte: Analyte,
    /// Unit the captured number is reported in.
    unit: LabUnit,
    pattern: Regex,
}

fn text_pattern(analyte: Analyte, label: &str, unit: LabUnit, suffix: &str) -> TextPattern {
    TextPattern {
        analyte,
        unit,
        pattern: Regex::new(&format!(r"(?i)\b(?:{label})\b{GAP}{NUM}\s*(?:{suffix})")).unwrap(),
    }
}

const MG_DL: &str = r"mg\s*/\s*dl";
const MMOL_L: &str = r"mmol\s*/\s*l\b";
const PERCENT: &str = "%";
/// 10^9/L and 10^3/µL are the same count.
const COUNT: &str = r"(?:x\s*)?10\s*[\^*]?\s*(?:9\s*/\s*l|3\s*/\s*[uµμ]l)\b|k\s*/\s*[uµμ]l\b";

/// Ordered search list; within an analyte, earlier entries take precedence.
static TEXT_PATTERNS: LazyLock<Vec<TextPattern>> = LazyLock::new(|| {
    let glucose = r"(?:fasting\s+)?(?:plasma\s+)?glucose";
    let triglycerides = r"triglycerides?";
    let hdl = r"hdl(?:[\s-]*c(?:holesterol)?)?";
    let ldl = r"ldl(?:[\s-]*c(?:holesterol)?)?";
    let total = r"total\s+cholesterol|cholesterol,?\s+total";
    let albumin = r"(?:serum\s+)?albumin";

    vec![
        text_pattern(Analyte::HbA1c, r"hba1c|hb\s*a1c|a1c", LabUnit::Percent, PERCENT),
        text_pattern(Analyte::Glucose, glucose, LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Glucose, glucose, LabUnit::MmolL, MMOL_L),
        text_pattern(Analyte::Triglycerides, triglycerides, LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Triglycerides, triglycerides, LabUnit::MmolL, MMOL_L),
        text_pattern(Analyte::Hdl, hdl, LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Hdl, hdl, LabUnit::MmolL, MMOL_L),
        text_pattern(Analyte::Ldl, ldl, LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Ldl, ldl, LabUnit::MmolL, MMOL_L),
        text_pattern(Analyte::TotalCholesterol, total, LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::TotalCholesterol, total, LabUnit::MmolL, MMOL_L),
        text_pattern(Analyte::Insulin, r"(?:fasting\s+)?insulin", LabUnit::MicroUnitsPerMl, r"[uµμ]i?u\s*/\s*ml|mu\s*/\s*l"),
        text_pattern(Analyte::Creatinine, r"creatinine", LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Creatinine, r"creatinine", LabUnit::UmolL, r"[uµμ]mol\s*/\s*l\b"),
        text_pattern(Analyte::Acr, r"acr|albumin[\s/-]*(?:to[\s-]*)?creatinine\s+ratio", LabUnit::MgPerG, r"mg\s*/\s*g\b"),
        text_pattern(Analyte::Acr, r"acr|albumin[\s/-]*(?:to[\s-]*)?creatinine\s+ratio", LabUnit::MgPerMmol, r"mg\s*/\s*mmol"),
        text_pattern(Analyte::Crp, r"(?:hs[\s-]?)?crp|c[\s-]reactive\s+protein", LabUnit::MgDl, MG_DL),
        text_pattern(Analyte::Crp, r"(?:hs[\s-]?)?crp|c[\s-]reactive\s+protein", LabUnit::MgPerL, r"mg\s*/\s*l\b"),
        text_pattern(Analyte::Albumin, albumin, LabUnit::GramsPerDl, r"g\s*/\s*dl\b"),
        text_pattern(Analyte::Albumin, albumin, LabUnit::GramsPerL, r"g\s*/\s*l\b"),
        text_pattern(Analyte::Wbc, r"wbc|white\s+(?:blood\s+)?cells?(?:\s+count)?|leu[ck]ocytes?", LabUnit::ThousandPerUl, COUNT),
        text_pattern(Analyte::Mcv, r"mcv|mean\s+(?:cell|corpuscular)\s+volume", LabUnit::Femtoliters, r"fl\b"),
        text_pattern(Analyte::Rdw, r"rdw(?:[\s-]*cv)?|red\s+cell\s+distribution\s+width", LabUnit::Percent, PERCENT),
        text_pattern(Analyte::Lymphocytes, r"lymphocytes?|lymphs?", LabUnit::Percent, PERCENT),
        text_pattern(Analyte::Alp, r"alp|alkaline\s+phosphatase", LabUnit::UnitsPerL, r"i?u\s*/\s*l\b"),
    ]
});

/// Collapse all whitespace runs to a single space.
pub fn flatten_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract lab values from document text.
pub fn normalize_text(text: &str) -> NormalizedLabs {
    let flat = flatten_text(text);
    let mut out = NormalizedLabs::default();

    for tp in TEXT_PATTERNS.iter() {
        if out.panel.contains(tp.analyte) {
            continue;
        }

        let Some(caps) = tp.pattern.captures(&flat) else {
            continue;
        };
        let Some(raw_value) = caps.get(1).and_then(|m| parse_lab_value(m.as_str())) else {
            continue;
        };

        let raw = AnalyteValue::new(raw_value, tp.unit);
        let value = match tp.analyte {
            Analyte::Creatinine | Analyte::Acr | Analyte::Crp | Analyte::Albumin => {
                units::to_canonical(tp.analyte, &raw).unwrap_or(raw)
            }
            _ => raw,
        };

        let label = caps.get(0).map_or(tp.analyte.as_str(), |m| m.as_str()).to_string();
        tracing::debug!(analyte = %tp.analyte, unit = %tp.unit, raw_value, "Lab value found in text");

        out.panel.insert(tp.analyte, value);
        out.readings.push(LabReading {
            analyte: tp.analyte,
            label,
            raw_value,
            value,
            unit_source: UnitSource::Explicit,
        });
    }

    out.warnings = check_plausibility(&out.panel);
    out
}
