//! Error types for Synheart Balance
//!
//! The calculation core never fails. These errors only surface at the JSON
//! boundary (malformed syntax, serialization) and in the CLI/FFI layers.

use thiserror::Error;

/// Errors that can occur while decoding input or encoding output
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
