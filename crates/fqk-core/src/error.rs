//! Error types for flatten/unflatten operations.

use thiserror::Error;

/// Errors that can occur while unflattening or converting through JSON.
#[derive(Error, Debug)]
pub enum FqkError {
    /// Unflattening needs a separator to split keys on. Raised before any
    /// input is consumed. Flattening never raises this.
    #[error("Cannot unflatten with an empty separator")]
    EmptySeparator,

    /// The input string was not valid JSON (JSON helpers only).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The flat JSON input was valid JSON but not an object of FQK → value.
    #[error("Flat input must be a JSON object, got {0}")]
    FlatInput(String),
}

/// Convenience alias used throughout fqk-core.
pub type Result<T> = std::result::Result<T, FqkError>;
