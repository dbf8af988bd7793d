//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a single trace file
///
/// A parse error only ever disqualifies the file it came from.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot read trace file: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("Unsupported trace file extension: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("Malformed trace markup: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("Invalid instruction count '{value}' on <{tag}>")]
    InvalidInstructionCount { tag: String, value: String },
}

/// Errors that abort a whole analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("No trace files found in {0}")]
    NoTraceFiles(PathBuf),

    #[error("None of the {0} trace files could be parsed")]
    NoUsableTraces(usize),

    #[error("Failed to list input directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors that can occur while loading the analysis config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Rendered output is not UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
