//! Error types for ontask

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ontask operations
pub type Result<T> = std::result::Result<T, OntaskError>;

/// Main error type for ontask
#[derive(Error, Debug)]
pub enum OntaskError {
    /// Taskfile-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed source glob
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Malformed ignore glob
    #[error("Invalid ignore pattern: {0}")]
    IgnorePattern(#[from] globset::Error),

    /// Anything a task body chooses to fail with
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<glob::GlobError> for OntaskError {
    fn from(err: glob::GlobError) -> Self {
        OntaskError::Io(err.into_error())
    }
}

/// Taskfile parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find taskfile (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{0}' has a source but no target")]
    SourceWithoutTarget(String),

    #[error("Task '{0}' has a target but no source")]
    TargetWithoutSource(String),

    #[error("Task identifiers must not be empty")]
    EmptyTaskId,

    #[error("Circular alias detected: {0}")]
    CircularAlias(String),

    #[error("Invalid parameter '{0}', expected KEY=VALUE")]
    InvalidParam(String),

    #[error("Failed to load '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{0}' is not defined")]
    UndefinedTask(String),

    #[error("Command in task '{task}' failed with exit code {code:?}")]
    CommandFailed { task: String, code: Option<i32> },

    #[error("Failed to spawn '{program}': {error}")]
    Spawn { program: String, error: String },
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable references nest too deeply")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Returns the offending id when the error is an undefined task
pub fn undefined_task(err: &OntaskError) -> Option<&str> {
    match err {
        OntaskError::Execution(ExecutionError::UndefinedTask(id)) => Some(id),
        _ => None,
    }
}
