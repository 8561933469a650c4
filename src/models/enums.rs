use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown string for a string-backed enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: '{value}'")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Sex {
    Male => "male",
    Female => "female",
});

str_enum!(DiseaseCategory {
    Cvd => "cvd",
    T2d => "t2d",
    Cancer => "cancer",
    Copd => "copd",
    Neuro => "neuro",
    Ckd => "ckd",
});

str_enum!(Analyte {
    HbA1c => "hba1c",
    Glucose => "glucose",
    Insulin => "insulin",
    Triglycerides => "triglycerides",
    Hdl => "hdl",
    Ldl => "ldl",
    TotalCholesterol => "total_cholesterol",
    Acr => "acr",
    Creatinine => "creatinine",
    Albumin => "albumin",
    Crp => "crp",
    Lymphocytes => "lymphocytes",
    Mcv => "mcv",
    Rdw => "rdw",
    Alp => "alp",
    Wbc => "wbc",
});

impl DiseaseCategory {
    pub const ALL: [DiseaseCategory; 6] = [
        Self::Cvd,
        Self::T2d,
        Self::Cancer,
        Self::Copd,
        Self::Neuro,
        Self::Ckd,
    ];
}

impl Analyte {
    /// Cholesterol fractions share one mg/dL ↔ mmol/L factor.
    pub fn is_cholesterol(self) -> bool {
        matches!(self, Self::Hdl | Self::Ldl | Self::TotalCholesterol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sex_round_trip() {
        for (variant, s) in [(Sex::Male, "male"), (Sex::Female, "female")] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Sex::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn disease_category_round_trip() {
        for variant in DiseaseCategory::ALL {
            assert_eq!(DiseaseCategory::from_str(variant.as_str()).unwrap(), variant);
        }
    }

    #[test]
    fn analyte_serializes_with_canonical_key() {
        let json = serde_json::to_string(&Analyte::HbA1c).unwrap();
        assert_eq!(json, "\"hba1c\"");
        let back: Analyte = serde_json::from_str("\"total_cholesterol\"").unwrap();
        assert_eq!(back, Analyte::TotalCholesterol);
    }

    #[test]
    fn cholesterol_fractions() {
        assert!(Analyte::Hdl.is_cholesterol());
        assert!(Analyte::TotalCholesterol.is_cholesterol());
        assert!(!Analyte::Triglycerides.is_cholesterol());
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Sex::from_str("unknown").is_err());
        assert!(Analyte::from_str("").is_err());
        let err = DiseaseCategory::from_str("liver").unwrap_err();
        assert_eq!(err.field, "DiseaseCategory");
    }
}
