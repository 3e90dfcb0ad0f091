//! Error handling for tstmpl.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for tstmpl operations.
///
/// Local, continuable failures (a single unreadable file, a single malformed
/// ignore pattern) never surface here; they are logged where they happen.
/// Everything in this enum aborts the current run.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A directory needed for output could not be created
    #[error("Failed to create directory '{path}': {source}.")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Errors raised while rendering generated modules
    #[error("Template rendering error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// The manifest file is not a valid JSON array of template records
    #[error("Malformed manifest '{manifest}': {source}.")]
    ManifestParseError {
        manifest: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Invalid path: {0}.")]
    InvalidPath(String),

    #[error("Invalid template record: {0}.")]
    InvalidRecord(String),

    /// Two records resolve to the same file
    #[error("Duplicate template record: {0}.")]
    DuplicateRecord(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
