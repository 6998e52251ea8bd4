//! Error types for the pairing → rendering pipeline.
//!
//! - [`TransformError`] - wide CSV → narrow CSV failures
//! - [`RenderError`] - narrow CSV → diagram failures
//! - [`PipelineError`] - top-level wrapper returned by [`crate::pipeline::run`]
//! - [`ConfigError`] - configuration key lookups and persistence
//!
//! `From` conversions let `?` cross from the stage errors into
//! [`PipelineError`].

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Pairing Transformer Errors
// =============================================================================

/// Errors while converting the wide CSV into the narrow edge list.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Input or output file could not be opened, read or written.
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid UTF-8.
    #[error("Cannot decode input at line {line}: {message}")]
    Decoding {
        /// 1-based line number in the input file
        line: u64,
        /// Decoder message
        message: String,
    },

    /// The input ended before the header row was reached.
    #[error("Input ended before the header row (skip_rows = {skip_rows})")]
    MissingHeader {
        /// Number of rows that were to be skipped before the header
        skip_rows: usize,
    },

    /// A data row has fewer fields than the header.
    #[error("Row {row_index} has {actual_len} fields, expected at least {expected_len}")]
    MalformedRow {
        /// Zero-based index of the data row (after the header)
        row_index: usize,
        /// Header length
        expected_len: usize,
        /// Number of fields in the row
        actual_len: usize,
    },

    /// Any other CSV read/write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Diagram Renderer Errors
// =============================================================================

/// Errors while loading the narrow CSV or producing the diagram.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Narrow file or diagram output could not be accessed.
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Required columns absent from the narrow CSV header.
    #[error(
        "The file must contain the following columns: {{source, target, value}}; missing: {}",
        missing.join(", ")
    )]
    MissingColumns {
        /// Missing column names, in `source, target, value` order
        missing: Vec<String>,
    },

    /// A narrow row is too short to hold every required column.
    #[error("Edge row {row_index} has {actual_len} fields, expected {expected_len}")]
    MalformedRow {
        /// Zero-based index of the edge row
        row_index: usize,
        /// Fields needed to reach every required column
        expected_len: usize,
        /// Number of fields in the row
        actual_len: usize,
    },

    /// The `value` column holds something that is not a number.
    #[error("Edge row {row_index} has a non-numeric value '{value}'")]
    InvalidValue {
        /// Zero-based index of the edge row
        row_index: usize,
        /// Raw field content
        value: String,
    },

    /// An edge refers to a label missing from the label index.
    #[error("Label '{0}' is not in the label index")]
    UnknownLabel(String),

    /// Unrecognised narrow-file encoding name.
    #[error("Unsupported encoding: '{0}' (use iso-8859-1 or utf-8)")]
    UnsupportedEncoding(String),

    /// HTML template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Figure serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The diagram viewer could not be launched.
    #[error("Cannot open '{}' in a viewer: {source}", path.display())]
    Launch {
        /// Diagram file that was to be opened
        path: PathBuf,
        /// Launcher error
        #[source]
        source: std::io::Error,
    },

    /// Any other CSV parsing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// The two stages are not transactional: a [`PipelineError::Render`] leaves
/// the narrow CSV written by the first stage on disk.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Pairing stage failed.
    #[error("Pairing failed: {0}")]
    Transform(#[from] TransformError),

    /// Rendering stage failed.
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from configuration access.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key is not part of the configuration schema.
    #[error("Unknown config key: '{0}'")]
    UnknownKey(String),

    /// Value cannot be parsed for the key's type.
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue {
        /// Config key
        key: String,
        /// Rejected value
        value: String,
    },

    /// Config file I/O failed.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config could not be serialized.
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for pairing operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
