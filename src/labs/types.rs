use serde::{Deserialize, Serialize};

use crate::models::{Analyte, AnalyteValue, LabPanel};

/// One labelled value from a tabular source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabRow {
    pub label: String,
    pub value: String,
    pub unit_hint: Option<String>,
}

impl LabRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>, unit_hint: Option<&str>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit_hint: unit_hint.map(str::to_string),
        }
    }

    /// Build a row from spreadsheet cells: column 1 is the label, column 2
    /// the value, column 3 the unit hint. Without a usable third column the
    /// label doubles as the hint ("Glucose (mmol/L)").
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let label = cells.first()?.as_ref().trim();
        let value = cells.get(1)?.as_ref().trim();
        if label.is_empty() {
            return None;
        }

        let hint = cells
            .get(2)
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(label);

        Some(Self::new(label, value, Some(hint)))
    }
}

/// How the unit of a normalized reading was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSource {
    /// The source named the unit.
    Explicit,
    /// No unit given; the value was left as-is and a unit guessed from its
    /// magnitude. Known to be imprecise near the thresholds.
    Guessed,
    /// No unit given; a magnitude rule picked the unit and the value was
    /// converted to the canonical unit.
    Inferred,
    /// No unit given; the conventional reporting unit was assumed.
    Assumed,
}

/// A reading that matched a rule, in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReading {
    pub analyte: Analyte,
    pub label: String,
    pub raw_value: f64,
    pub value: AnalyteValue,
    pub unit_source: UnitSource,
}

/// Output of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLabs {
    pub panel: LabPanel,
    pub readings: Vec<LabReading>,
    /// Labels that matched no rule, or matched one but carried no usable number.
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
}

impl NormalizedLabs {
    /// Readings whose unit came from the magnitude fallback only.
    pub fn guessed(&self) -> impl Iterator<Item = &LabReading> {
        self.readings
            .iter()
            .filter(|r| r.unit_source == UnitSource::Guessed)
    }
}
