//! Error types for the canvas crate.
//!
//! The diagram engine itself never fails: everything here happens at the
//! boundaries (reading documents, parsing the spec, loading configuration,
//! generating artifacts) and is degraded to an emptier view by the caller.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse spec document: {0}")]
    SpecParse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Artifact generation failures.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation script {0} not found")]
    ScriptMissing(PathBuf),

    #[error("generation failed: {status}\nOutput: {output}")]
    ScriptFailed { status: String, output: String },

    #[error("failed to run generator: {0}")]
    Spawn(io::Error),

    #[error("failed to read generated file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}
