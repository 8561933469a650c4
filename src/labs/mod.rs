//! Lab normalization: raw labelled values in, canonical panel out.
//!
//! Two entry points share one output shape. Tabular sources go through the
//! ordered label rules in [`rules`]; document text goes through the
//! unit-suffixed searches in [`document`].

pub mod document;
pub mod plausibility;
pub mod rows;
pub mod rules;
pub mod types;
pub mod value;

pub use document::normalize_text;
pub use plausibility::check_plausibility;
pub use rows::{parse_rows, split_rows};
pub use rules::{classify_label, normalize_rows};
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Lab source is empty")]
    EmptySource,

    #[error("No label/value rows found in lab source")]
    NoRows,
}

/// Split a delimited export and normalize its rows.
pub fn normalize_delimited(text: &str) -> Result<NormalizedLabs, LabError> {
    let rows = parse_rows(text)?;
    Ok(normalize_rows(&rows))
}
