//! Command-line surface: load a client record (and optionally a lab export),
//! run the engine, print the report as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::config::{self, EngineConfig};
use crate::engine::{DefaultRiskEngine, RiskEngine, RiskReport};
use crate::labs::{self, LabError, NormalizedLabs};
use crate::models::ClientRecord;

#[derive(Parser, Debug)]
#[command(name = "riskscope")]
#[command(version = config::APP_VERSION)]
#[command(about = "Compute clinical risk scores and derived biomarkers for a client record", long_about = None)]
pub struct Args {
    /// Client record (JSON)
    #[arg(short, long)]
    pub record: PathBuf,

    /// Lab export to merge into the record (.csv/.tsv rows or .txt report text)
    #[arg(short, long)]
    pub labs: Option<PathBuf>,

    /// Storage namespace for the record key (overrides RISKSCOPE_NAMESPACE)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Report base percentages without the family-history modifier
    #[arg(long)]
    pub no_family_history: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lab file error: {0}")]
    Lab(#[from] LabError),

    #[error("Unsupported lab file format: {0}")]
    UnsupportedLabFormat(String),
}

/// How a lab file is read, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabFormat {
    Delimited,
    Text,
}

impl LabFormat {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "tsv" => Ok(Self::Delimited),
            "txt" => Ok(Self::Text),
            _ => Err(CliError::UnsupportedLabFormat(path.display().to_string())),
        }
    }
}

pub fn load_record(path: &Path) -> Result<ClientRecord, CliError> {
    let raw = fs::read_to_string(path)?;
    let record = serde_json::from_str(&raw)?;
    Ok(record)
}

pub fn load_labs(path: &Path) -> Result<NormalizedLabs, CliError> {
    let format = LabFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;

    let normalized = match format {
        LabFormat::Delimited => labs::normalize_delimited(&text)?,
        LabFormat::Text => labs::normalize_text(&text),
    };

    for reading in normalized.guessed() {
        tracing::info!(
            analyte = %reading.analyte,
            unit = %reading.value.unit,
            "Unit guessed from magnitude"
        );
    }
    tracing::info!(
        file = %path.display(),
        found = normalized.panel.len(),
        skipped = normalized.skipped.len(),
        warnings = normalized.warnings.len(),
        "Lab file normalized"
    );
    Ok(normalized)
}

/// Engine configuration from the environment, overridden by flags.
pub fn engine_config(args: &Args) -> EngineConfig {
    let mut config = EngineConfig::from_env();
    if let Some(ns) = &args.namespace {
        config = config.with_namespace(ns.clone());
    }
    if args.no_family_history {
        config = config.with_family_history(false);
    }
    config
}

/// Load inputs and assess. Lab-file values override values in the record.
pub fn assess(args: &Args) -> Result<RiskReport, CliError> {
    let mut record = load_record(&args.record)?;

    if let Some(path) = &args.labs {
        let normalized = load_labs(path)?;
        record.labs.merge(&normalized.panel);
    }

    let engine = DefaultRiskEngine::new(engine_config(args));
    Ok(engine.assess(&record))
}

pub fn render(report: &RiskReport, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Full command: assess and write the report to the output file or stdout.
pub fn execute(args: &Args) -> Result<(), CliError> {
    let report = assess(args)?;
    let json = render(&report, args.pretty)?;

    match &args.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
