//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::schema::Variant;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a pipeline definition
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pipeline TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pipeline definition: {0}")]
    Invalid(String),
}

/// Errors that can occur while resolving scale parameters
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during log parsing
///
/// Unrecognized or malformed lines are tolerated; only scale
/// resolution can abort a parse.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Scale resolution failed for record {index}: {source}")]
    Resolve {
        index: usize,
        #[source]
        source: ConfigError,
    },
}

/// Errors that can occur while averaging runs
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No runs recorded for configuration '{config_key}' ({variant} variant)")]
    NoRuns { config_key: String, variant: Variant },
}

/// Errors that can occur during table output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to encode table: {0}")]
    EncodeFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Configuration '{config_key}' is missing its {variant} record")]
    MissingVariant { config_key: String, variant: Variant },
}
