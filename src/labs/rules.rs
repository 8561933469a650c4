//! Ordered label rules for tabular lab sources.
//!
//! Rules are evaluated top to bottom and the first whose label pattern
//! matches owns the row. Specific labels sit above the broader ones that
//! would otherwise shadow them: ACR above creatinine and albumin, HDL/LDL
//! above total cholesterol, and a catch-all for ratio rows above everything
//! cholesterol-shaped.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{LabReading, LabRow, NormalizedLabs, UnitSource};
use super::value::{
    conflicting_unit, explicit_unit, guess_unit, parse_lab_value, ALBUMIN_GDL_CEILING,
    CREATININE_UMOL_FLOOR,
};
use super::plausibility::check_plausibility;
use crate::models::{Analyte, AnalyteValue, LabUnit};
use crate::units;

/// What a matching row maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleTarget {
    Analyte(Analyte),
    /// Recognised but deliberately not captured (derived ratios, eGFR).
    Ignore,
}

/// A compiled label rule.
struct LabRule {
    pattern: Regex,
    target: RuleTarget,
}

fn rule(pattern: &str, target: RuleTarget) -> LabRule {
    LabRule {
        pattern: Regex::new(pattern).unwrap(),
        target,
    }
}

static LAB_RULES: LazyLock<Vec<LabRule>> = LazyLock::new(|| {
    use Analyte::*;
    use RuleTarget::Analyte as A;

    vec![
        rule(r"^(?:hba1c|hb\s*a1c|a1c|glyc(?:ated|osylated)\s+ha?emoglobin|ha?emoglobin\s+a1c)", A(HbA1c)),
        rule(r"^(?:u(?:rine)?\s*)?(?:acr\b|alb(?:umin)?\s*[/:-]?\s*(?:to\s+)?creat|micro\s*alb)", A(Acr)),
        rule(r"ratio|^e?gfr\b", RuleTarget::Ignore),
        rule(r"^(?:fasting\s+)?insulin", A(Insulin)),
        rule(r"^(?:fasting\s+)?(?:plasma\s+|blood\s+|serum\s+)?glucose|^(?:fbg|fpg|fbs|glu)\b", A(Glucose)),
        rule(r"^(?:trig|tg\b|triglyceride)", A(Triglycerides)),
        rule(r"^(?:hdl|high[\s-]density)", A(Hdl)),
        rule(r"^(?:ldl|low[\s-]density)", A(Ldl)),
        rule(r"^(?:total\s+cholesterol|(?:serum\s+)?cholesterol|tc\b|chol\b)", A(TotalCholesterol)),
        rule(r"^(?:serum\s+|plasma\s+)?creat|^cr\b", A(Creatinine)),
        rule(r"^(?:serum\s+)?albumin", A(Albumin)),
        rule(r"^(?:hs[\s-]?)?crp\b|c[\s-]reactive", A(Crp)),
        rule(r"^lymph", A(Lymphocytes)),
        rule(r"^mcv\b|mean\s+(?:cell|corpuscular)\s+volume", A(Mcv)),
        rule(r"^rdw|red\s+(?:blood\s+)?cell\s+distribution", A(Rdw)),
        rule(r"^alp\b|^alk(?:aline)?\.?\s*phos", A(Alp)),
        rule(r"^wbc\b|^white\s+(?:blood\s+)?cell|^(?:total\s+)?leu[ck]ocyte", A(Wbc)),
    ]
});

/// Normalize a label for rule matching: trim and lowercase.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// The analyte a label maps to under the first matching rule, if any.
pub fn classify_label(label: &str) -> Option<Analyte> {
    let normalized = normalize_label(label);
    LAB_RULES
        .iter()
        .find(|r| r.pattern.is_match(&normalized))
        .and_then(|r| match r.target {
            RuleTarget::Analyte(a) => Some(a),
            RuleTarget::Ignore => None,
        })
}

/// Resolve a parsed value and optional hint into a canonical reading.
pub fn resolve_reading(analyte: Analyte, value: f64, hint: Option<&str>) -> (AnalyteValue, UnitSource) {
    let explicit = hint.and_then(|h| explicit_unit(analyte, h));

    match analyte {
        Analyte::Creatinine => match explicit {
            Some(LabUnit::UmolL) => (AnalyteValue::new(value, LabUnit::UmolL), UnitSource::Explicit),
            Some(_) => (
                AnalyteValue::new(units::creatinine_mgdl_to_umol(value), LabUnit::UmolL),
                UnitSource::Explicit,
            ),
            None if value > CREATININE_UMOL_FLOOR => {
                (AnalyteValue::new(value, LabUnit::UmolL), UnitSource::Inferred)
            }
            None => (
                AnalyteValue::new(units::creatinine_mgdl_to_umol(value), LabUnit::UmolL),
                UnitSource::Inferred,
            ),
        },
        Analyte::Albumin => {
            let (unit, source) = match explicit {
                Some(u) => (u, UnitSource::Explicit),
                None if value <= ALBUMIN_GDL_CEILING => (LabUnit::GramsPerDl, UnitSource::Inferred),
                None => (LabUnit::GramsPerL, UnitSource::Inferred),
            };
            (canonicalize(analyte, value, unit), source)
        }
        Analyte::Glucose | Analyte::Triglycerides | Analyte::Hdl | Analyte::Ldl
        | Analyte::TotalCholesterol => match explicit {
            Some(u) => (AnalyteValue::new(value, u), UnitSource::Explicit),
            None => {
                // Annotation only; the stored number is the source number.
                let guessed = guess_unit(analyte, value).unwrap_or(LabUnit::MgDl);
                (AnalyteValue::new(value, guessed), UnitSource::Guessed)
            }
        },
        _ => match explicit {
            Some(u) => (canonicalize(analyte, value, u), UnitSource::Explicit),
            None => (canonicalize(analyte, value, default_unit(analyte)), UnitSource::Assumed),
        },
    }
}

/// Conventional reporting unit assumed when a source omits it.
fn default_unit(analyte: Analyte) -> LabUnit {
    match analyte {
        Analyte::HbA1c | Analyte::Lymphocytes | Analyte::Rdw => LabUnit::Percent,
        Analyte::Insulin => LabUnit::MicroUnitsPerMl,
        Analyte::Acr => LabUnit::MgPerG,
        Analyte::Crp => LabUnit::MgPerL,
        Analyte::Mcv => LabUnit::Femtoliters,
        Analyte::Alp => LabUnit::UnitsPerL,
        Analyte::Wbc => LabUnit::ThousandPerUl,
        Analyte::Creatinine => LabUnit::UmolL,
        Analyte::Albumin => LabUnit::GramsPerL,
        Analyte::Glucose | Analyte::Triglycerides | Analyte::Hdl | Analyte::Ldl
        | Analyte::TotalCholesterol => LabUnit::MgDl,
    }
}

fn canonicalize(analyte: Analyte, value: f64, unit: LabUnit) -> AnalyteValue {
    let raw = AnalyteValue::new(value, unit);
    units::to_canonical(analyte, &raw).unwrap_or(raw)
}

/// Normalize rows from a tabular source.
///
/// The first row to produce a value for an analyte keeps it; later rows for
/// the same analyte are skipped. Rows whose unit the analyte cannot hold
/// (absolute counts, IFCC HbA1c) are skipped before that check.
pub fn normalize_rows(rows: &[LabRow]) -> NormalizedLabs {
    let mut out = NormalizedLabs::default();

    for row in rows {
        let Some(analyte) = classify_label(&row.label) else {
            tracing::debug!(label = %row.label, "Lab row matched no rule");
            out.skipped.push(row.label.clone());
            continue;
        };

        let Some(raw_value) = parse_lab_value(&row.value) else {
            tracing::debug!(label = %row.label, analyte = %analyte, "Lab row has no numeric value");
            out.skipped.push(row.label.clone());
            continue;
        };

        if row.unit_hint.as_deref().is_some_and(|h| conflicting_unit(analyte, h)) {
            tracing::debug!(label = %row.label, analyte = %analyte, "Lab row unit not representable");
            out.skipped.push(row.label.clone());
            continue;
        }

        if out.panel.contains(analyte) {
            tracing::debug!(label = %row.label, analyte = %analyte, "Duplicate lab row ignored");
            out.skipped.push(row.label.clone());
            continue;
        }

        let (value, unit_source) = resolve_reading(analyte, raw_value, row.unit_hint.as_deref());
        out.panel.insert(analyte, value);
        out.readings.push(LabReading {
            analyte,
            label: row.label.clone(),
            raw_value,
            value,
            unit_source,
        });
    }

    out.warnings = check_plausibility(&out.panel);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn single(label: &str, value: &str, hint: Option<&str>) -> NormalizedLabs {
        normalize_rows(&[LabRow::new(label, value, hint)])
    }

    #[test]
    fn creatinine_without_unit_small_value_is_mg_dl() {
        let out = single("Creatinine", "1.0", None);
        let v = out.panel.get(Analyte::Creatinine).unwrap();
        assert_eq!(v.unit, LabUnit::UmolL);
        assert!(approx(v.value, 88.4));
        assert_eq!(out.readings[0].unit_source, UnitSource::Inferred);
    }

    #[test]
    fn creatinine_without_unit_large_value_is_umol() {
        let out = single("Creatinine", "80", None);
        let v = out.panel.get(Analyte::Creatinine).unwrap();
        assert!(approx(v.value, 80.0));
    }

    #[test]
    fn creatinine_with_mg_dl_hint_converts() {
        let out = single("Creatinine", "1.0", Some("mg/dL"));
        assert!(approx(out.panel.creatinine_umol().unwrap(), 88.4));
        assert_eq!(out.readings[0].unit_source, UnitSource::Explicit);
    }

    #[test]
    fn creatinine_with_umol_hint_is_kept() {
        let out = single("Creatinine", "80", Some("µmol/L"));
        assert!(approx(out.panel.creatinine_umol().unwrap(), 80.0));
    }

    #[test]
    fn creatinine_threshold_is_exclusive_above_fifteen() {
        let out = single("Creatinine", "15", None);
        assert!(approx(out.panel.creatinine_umol().unwrap(), 15.0 * 88.4));
    }

    #[test]
    fn total_cholesterol_not_shadowed_by_hdl() {
        let out = normalize_rows(&[
            LabRow::new("HDL Cholesterol", "1.2", Some("mmol/L")),
            LabRow::new("Total Cholesterol", "5.1", Some("mmol/L")),
            LabRow::new("LDL cholesterol", "3.0", Some("mmol/L")),
        ]);
        assert_eq!(out.panel.value(Analyte::Hdl), Some(1.2));
        assert_eq!(out.panel.value(Analyte::TotalCholesterol), Some(5.1));
        assert_eq!(out.panel.value(Analyte::Ldl), Some(3.0));
    }

    #[test]
    fn ratio_rows_are_not_cholesterol() {
        let out = single("Cholesterol/HDL ratio", "4.2", None);
        assert!(out.panel.is_empty());
        assert_eq!(out.skipped, vec!["Cholesterol/HDL ratio".to_string()]);
    }

    #[test]
    fn acr_beats_creatinine_and_albumin() {
        let out = single("Albumin/Creatinine Ratio", "2.0", Some("mg/mmol"));
        let acr = out.panel.get(Analyte::Acr).unwrap();
        assert_eq!(acr.unit, LabUnit::MgPerG);
        assert!(approx(acr.value, 17.68));
        assert!(!out.panel.contains(Analyte::Creatinine));
        assert!(!out.panel.contains(Analyte::Albumin));
    }

    #[test]
    fn egfr_row_is_ignored() {
        assert_eq!(classify_label("eGFR"), None);
        assert_eq!(classify_label("GFR (estimated)"), None);
    }

    #[test]
    fn classify_common_labels() {
        assert_eq!(classify_label("  HbA1c "), Some(Analyte::HbA1c));
        assert_eq!(classify_label("Fasting Glucose"), Some(Analyte::Glucose));
        assert_eq!(classify_label("Fasting Insulin"), Some(Analyte::Insulin));
        assert_eq!(classify_label("TG"), Some(Analyte::Triglycerides));
        assert_eq!(classify_label("Triglycerides"), Some(Analyte::Triglycerides));
        assert_eq!(classify_label("hs-CRP"), Some(Analyte::Crp));
        assert_eq!(classify_label("C-Reactive Protein"), Some(Analyte::Crp));
        assert_eq!(classify_label("Lymphocytes %"), Some(Analyte::Lymphocytes));
        assert_eq!(classify_label("MCV"), Some(Analyte::Mcv));
        assert_eq!(classify_label("RDW-CV"), Some(Analyte::Rdw));
        assert_eq!(classify_label("Alkaline Phosphatase"), Some(Analyte::Alp));
        assert_eq!(classify_label("White Blood Cells"), Some(Analyte::Wbc));
        assert_eq!(classify_label("Albumin"), Some(Analyte::Albumin));
        assert_eq!(classify_label("Serum Creatinine"), Some(Analyte::Creatinine));
        assert_eq!(classify_label("Potassium"), None);
    }

    #[test]
    fn glucose_without_unit_keeps_value_and_guesses_unit() {
        let out = single("Glucose", "5.4", None);
        let v = out.panel.get(Analyte::Glucose).unwrap();
        assert_eq!(v.unit, LabUnit::MmolL);
        assert_eq!(v.value, 5.4);
        assert_eq!(out.guessed().count(), 1);

        let out = single("Glucose", "98", None);
        assert_eq!(out.panel.get(Analyte::Glucose).unwrap().unit, LabUnit::MgDl);
    }

    #[test]
    fn label_reused_as_hint_supplies_unit() {
        let row = LabRow::from_cells(&["Glucose (mmol/L)", "16"]).unwrap();
        let out = normalize_rows(&[row]);
        let v = out.panel.get(Analyte::Glucose).unwrap();
        assert_eq!(v.unit, LabUnit::MmolL);
        assert_eq!(out.readings[0].unit_source, UnitSource::Explicit);
    }

    #[test]
    fn non_numeric_value_is_absent() {
        let out = single("Glucose", "pending", None);
        assert!(out.panel.is_empty());
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn first_row_for_an_analyte_wins() {
        let out = normalize_rows(&[
            LabRow::new("Glucose", "5.4", Some("mmol/L")),
            LabRow::new("Fasting glucose", "110", Some("mg/dL")),
        ]);
        assert_eq!(out.panel.value(Analyte::Glucose), Some(5.4));
        assert_eq!(out.skipped, vec!["Fasting glucose".to_string()]);
    }

    #[test]
    fn albumin_magnitude_heuristic() {
        let out = single("Albumin", "4.1", None);
        assert!(approx(out.panel.value(Analyte::Albumin).unwrap(), 41.0));
        let out = single("Albumin", "42", None);
        assert!(approx(out.panel.value(Analyte::Albumin).unwrap(), 42.0));
    }

    #[test]
    fn crp_defaults_to_mg_per_litre() {
        let out = single("CRP", "3.0", None);
        let v = out.panel.get(Analyte::Crp).unwrap();
        assert_eq!(v.unit, LabUnit::MgDl);
        assert!(approx(v.value, 0.3));
        assert_eq!(out.readings[0].unit_source, UnitSource::Assumed);

        let out = single("CRP", "0.3", Some("mg/dL"));
        assert!(approx(out.panel.value(Analyte::Crp).unwrap(), 0.3));
    }

    #[test]
    fn absolute_lymphocyte_count_never_shadows_percentage() {
        for csv in [
            "Lymphocytes,2.1,x10^9/L\nLymphocytes %,30,%\n",
            "Lymphocytes %,30,%\nLymphocytes,2.1,x10^9/L\n",
        ] {
            let out = crate::labs::normalize_delimited(csv).unwrap();
            let v = out.panel.get(Analyte::Lymphocytes).unwrap();
            assert_eq!(v.value, 30.0);
            assert_eq!(v.unit, LabUnit::Percent);
            assert_eq!(out.skipped.len(), 1);
        }
    }

    #[test]
    fn rdw_sd_in_femtoliters_is_skipped() {
        let out = normalize_rows(&[
            LabRow::new("RDW-SD", "42", Some("fL")),
            LabRow::new("RDW-CV", "13.1", Some("%")),
        ]);
        assert_eq!(out.panel.value(Analyte::Rdw), Some(13.1));
        assert_eq!(out.skipped, vec!["RDW-SD".to_string()]);
    }

    #[test]
    fn ifcc_hba1c_is_not_read_as_percent() {
        let out = single("HbA1c", "38", Some("mmol/mol"));
        assert!(!out.panel.contains(Analyte::HbA1c));
        assert_eq!(out.skipped, vec!["HbA1c".to_string()]);

        let out = normalize_rows(&[
            LabRow::new("HbA1c (IFCC)", "38", Some("mmol/mol")),
            LabRow::new("HbA1c", "5.6", Some("%")),
        ]);
        assert_eq!(out.panel.value(Analyte::HbA1c), Some(5.6));
    }
}
