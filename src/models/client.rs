use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DiseaseCategory, Sex};
use super::lab::LabPanel;

/// Everything the engine reads about one client.
///
/// Every field is optional. A model whose required inputs are missing yields
/// no value instead of computing on a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRecord {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub assessed_on: Option<NaiveDate>,
    pub demographics: Demographics,
    pub biometrics: Biometrics,
    pub lifestyle: Lifestyle,
    pub history: MedicalHistory,
    pub labs: LabPanel,
    pub family_history: FamilyHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    /// Age in years.
    pub age: Option<f64>,
    pub sex: Option<Sex>,
    pub education_years: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biometrics {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<f64>,
    /// Diastolic blood pressure, mmHg.
    pub dbp: Option<f64>,
    pub bp_treated: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifestyle {
    pub smoker: Option<bool>,
    pub pack_years: Option<f64>,
    pub activity_days_per_week: Option<f64>,
    pub daily_produce: Option<bool>,
    pub alcohol_units_per_week: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistory {
    pub diabetes: Option<bool>,
    /// Ever told of high blood glucose (illness, pregnancy, check-up).
    pub high_glucose_history: Option<bool>,
}

/// Affected relatives by degree of kinship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeCounts {
    pub first_degree: u32,
    pub second_degree: u32,
    pub third_degree: u32,
}

impl RelativeCounts {
    pub fn new(first_degree: u32, second_degree: u32, third_degree: u32) -> Self {
        Self {
            first_degree,
            second_degree,
            third_degree,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_degree == 0 && self.second_degree == 0 && self.third_degree == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyHistory {
    categories: BTreeMap<DiseaseCategory, RelativeCounts>,
}

impl FamilyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: DiseaseCategory, counts: RelativeCounts) -> Self {
        self.set(category, counts);
        self
    }

    pub fn set(&mut self, category: DiseaseCategory, counts: RelativeCounts) {
        self.categories.insert(category, counts);
    }

    /// Counts for a category; zero when nothing was recorded.
    pub fn counts(&self, category: DiseaseCategory) -> RelativeCounts {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}

/// Drop NaN/infinite inputs so they read as absent.
pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl ClientRecord {
    pub fn age(&self) -> Option<f64> {
        finite(self.demographics.age)
    }

    pub fn sex(&self) -> Option<Sex> {
        self.demographics.sex
    }

    pub fn is_smoker(&self) -> bool {
        self.lifestyle.smoker == Some(true)
    }

    pub fn bp_treated(&self) -> bool {
        self.biometrics.bp_treated == Some(true)
    }
}
