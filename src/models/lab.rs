use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::Analyte;
use crate::units;

/// Measurement unit attached to a lab reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabUnit {
    #[serde(rename = "mg/dL")]
    MgDl,
    #[serde(rename = "mmol/L")]
    MmolL,
    #[serde(rename = "µmol/L", alias = "umol/L")]
    UmolL,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "µU/mL", alias = "uU/mL")]
    MicroUnitsPerMl,
    #[serde(rename = "mg/g")]
    MgPerG,
    #[serde(rename = "mg/mmol")]
    MgPerMmol,
    #[serde(rename = "g/L")]
    GramsPerL,
    #[serde(rename = "g/dL")]
    GramsPerDl,
    #[serde(rename = "mg/L")]
    MgPerL,
    #[serde(rename = "fL")]
    Femtoliters,
    #[serde(rename = "U/L")]
    UnitsPerL,
    #[serde(rename = "10^3/µL", alias = "10^3/uL")]
    ThousandPerUl,
}

impl LabUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::MgDl => "mg/dL",
            Self::MmolL => "mmol/L",
            Self::UmolL => "µmol/L",
            Self::Percent => "%",
            Self::MicroUnitsPerMl => "µU/mL",
            Self::MgPerG => "mg/g",
            Self::MgPerMmol => "mg/mmol",
            Self::GramsPerL => "g/L",
            Self::GramsPerDl => "g/dL",
            Self::MgPerL => "mg/L",
            Self::Femtoliters => "fL",
            Self::UnitsPerL => "U/L",
            Self::ThousandPerUl => "10^3/µL",
        }
    }
}

impl std::fmt::Display for LabUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An immutable lab value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyteValue {
    pub value: f64,
    pub unit: LabUnit,
}

impl AnalyteValue {
    pub fn new(value: f64, unit: LabUnit) -> Self {
        Self { value, unit }
    }

    /// The value, or `None` when it is NaN or infinite.
    pub fn finite_value(&self) -> Option<f64> {
        self.value.is_finite().then_some(self.value)
    }
}

/// Canonical analyte key → reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabPanel {
    values: BTreeMap<Analyte, AnalyteValue>,
}

impl LabPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, analyte: Analyte, value: f64, unit: LabUnit) -> Self {
        self.insert(analyte, AnalyteValue::new(value, unit));
        self
    }

    pub fn insert(&mut self, analyte: Analyte, value: AnalyteValue) -> Option<AnalyteValue> {
        self.values.insert(analyte, value)
    }

    pub fn remove(&mut self, analyte: Analyte) -> Option<AnalyteValue> {
        self.values.remove(&analyte)
    }

    pub fn get(&self, analyte: Analyte) -> Option<&AnalyteValue> {
        self.values.get(&analyte)
    }

    pub fn contains(&self, analyte: Analyte) -> bool {
        self.values.contains_key(&analyte)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Analyte, &AnalyteValue)> {
        self.values.iter()
    }

    /// Overlay `other` on top of this panel; `other` wins on conflicts.
    pub fn merge(&mut self, other: &LabPanel) {
        for (analyte, value) in other.iter() {
            self.values.insert(*analyte, *value);
        }
    }

    /// Raw finite value regardless of unit.
    pub fn value(&self, analyte: Analyte) -> Option<f64> {
        self.get(analyte)?.finite_value()
    }

    /// Value in mg/dL (glucose, lipids, creatinine).
    pub fn mgdl(&self, analyte: Analyte) -> Option<f64> {
        units::to_mgdl(analyte, self.get(analyte)?)
    }

    /// Value in mmol/L (glucose, lipids).
    pub fn mmol(&self, analyte: Analyte) -> Option<f64> {
        units::to_mmol(analyte, self.get(analyte)?)
    }

    /// Creatinine in µmol/L.
    pub fn creatinine_umol(&self) -> Option<f64> {
        units::creatinine_to_umol(self.get(Analyte::Creatinine)?)
    }

    /// Value expressed in the analyte's canonical unit, if the stored unit
    /// matches or converts to `unit`.
    pub fn canonical(&self, analyte: Analyte, unit: LabUnit) -> Option<f64> {
        let canonical = units::to_canonical(analyte, self.get(analyte)?)?;
        (canonical.unit == unit).then_some(canonical.value)
    }
}

impl FromIterator<(Analyte, AnalyteValue)> for LabPanel {
    fn from_iter<I: IntoIterator<Item = (Analyte, AnalyteValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_serializes_as_flat_map() {
        let panel = LabPanel::new().with(Analyte::Glucose, 5.4, LabUnit::MmolL);
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["glucose"]["unit"], "mmol/L");
        assert_eq!(json["glucose"]["value"], 5.4);
    }

    #[test]
    fn panel_deserializes_umol_alias() {
        let panel: LabPanel =
            serde_json::from_str(r#"{"creatinine":{"value":80,"unit":"umol/L"}}"#).unwrap();
        assert_eq!(panel.get(Analyte::Creatinine).unwrap().unit, LabUnit::UmolL);
    }

    #[test]
    fn merge_overrides_existing() {
        let mut base = LabPanel::new()
            .with(Analyte::Hdl, 40.0, LabUnit::MgDl)
            .with(Analyte::Glucose, 100.0, LabUnit::MgDl);
        let update = LabPanel::new().with(Analyte::Hdl, 1.2, LabUnit::MmolL);
        base.merge(&update);
        assert_eq!(base.len(), 2);
        assert_eq!(base.get(Analyte::Hdl).unwrap().unit, LabUnit::MmolL);
    }

    #[test]
    fn non_finite_values_read_as_absent() {
        let panel = LabPanel::new().with(Analyte::Wbc, f64::INFINITY, LabUnit::ThousandPerUl);
        assert!(panel.contains(Analyte::Wbc));
        assert!(panel.value(Analyte::Wbc).is_none());
    }

    #[test]
    fn canonical_requires_matching_unit() {
        let panel = LabPanel::new().with(Analyte::Albumin, 4.0, LabUnit::GramsPerDl);
        assert_eq!(panel.canonical(Analyte::Albumin, LabUnit::GramsPerL), Some(40.0));
        assert!(panel.canonical(Analyte::Albumin, LabUnit::GramsPerDl).is_none());
    }

    #[test]
    fn creatinine_in_umol() {
        let panel = LabPanel::new().with(Analyte::Creatinine, 1.0, LabUnit::MgDl);
        let umol = panel.creatinine_umol().unwrap();
        assert!((umol - 88.4).abs() < 1e-9);
    }
}
