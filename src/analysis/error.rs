//! Error types of the analysis pipeline

use crate::symbolic::error::{ParseError, SymbolicError};
use thiserror::Error;

/// Invalid domain or solver parameters, or a malformed task file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("domain bounds must be finite, got [{xmin}, {xmax}]")]
    NonFiniteBound { xmin: f64, xmax: f64 },

    #[error("xmin ({xmin}) must be smaller than xmax ({xmax})")]
    EmptyDomain { xmin: f64, xmax: f64 },

    #[error("at least 2 samples are needed, got {0}")]
    TooFewSamples(usize),

    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("'{0}' cannot be used as the variable name")]
    InvalidVariable(String),

    #[error("malformed task file: {0}")]
    TaskFile(String),

    #[error("missing key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },

    #[error("invalid value '{value}' for '{section}.{key}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("invalid command line: {0}")]
    CommandLine(String),
}

/// Everything that can stop an analysis run. Evaluation failures inside the domain never
/// end up here, they are reported as undefined values instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("symbolic error: {0}")]
    Symbolic(#[from] SymbolicError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
