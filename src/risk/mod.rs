//! Risk models and the shared banding contract.
//!
//! Each model is a pure function of a [`ClientRecord`](crate::models::ClientRecord)
//! or of already-extracted inputs, and returns `None` (or a result with no
//! percentage) when its required inputs are missing.

pub mod caide;
pub mod cancer;
pub mod copd;
pub mod family;
pub mod findrisc;
pub mod framingham;
pub mod kidney;
pub mod metabolic;
pub mod phenotypic;

use serde::{Deserialize, Serialize};

/// Display band for a risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    /// No finite percentage to band.
    NotAvailable,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::NotAvailable => "N/A",
        }
    }

    /// CSS class used by report layers for the colour chip.
    pub fn color_class(&self) -> &'static str {
        match self {
            Self::Low => "risk-low",
            Self::Medium => "risk-medium",
            Self::High => "risk-high",
            Self::NotAvailable => "risk-na",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Band a percentage: <10 Low, <20 Medium, otherwise High.
pub fn band_for(percent: f64) -> RiskBand {
    if !percent.is_finite() {
        RiskBand::NotAvailable
    } else if percent < 10.0 {
        RiskBand::Low
    } else if percent < 20.0 {
        RiskBand::Medium
    } else {
        RiskBand::High
    }
}

/// Uniform output of every percentage-producing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub percent: Option<f64>,
    pub band: RiskBand,
}

impl RiskResult {
    pub fn new(percent: Option<f64>) -> Self {
        let percent = percent.filter(|p| p.is_finite());
        Self {
            percent,
            band: percent.map_or(RiskBand::NotAvailable, band_for),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.percent.is_some()
    }
}

impl From<Option<f64>> for RiskResult {
    fn from(percent: Option<f64>) -> Self {
        Self::new(percent)
    }
}

/// Upper bound for heuristic and family-adjusted percentages.
pub const HEURISTIC_CEILING: f64 = 95.0;

/// Clamp a percentage into `[0, max]`.
pub fn clamp_percent(percent: f64, max: f64) -> f64 {
    percent.clamp(0.0, max)
}
