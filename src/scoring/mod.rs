pub mod categories;
pub mod engine;
pub mod evaluator;
pub mod findings;
pub mod patterns;
pub mod recommendations;
pub mod reference;

use thiserror::Error;

/// Errors that abort a single analysis request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unknown biomarker: {0}")]
    UnknownBiomarker(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: f64 },
}

/// Startup-time configuration failures. Never raised mid-request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration invariant violated: {0}")]
    Invariant(String),

    #[error("Range catalog load failed ({0}): {1}")]
    CatalogLoad(String, String),

    #[error("Range catalog parse failed ({0}): {1}")]
    CatalogParse(String, String),
}
