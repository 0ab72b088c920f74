//! Error types for the slide-deck workspace.
//!
//! The slide parser itself never fails; these errors come from the pieces
//! around it (request validation, configuration loading, file I/O).

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around slide-deck parsing.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read input or write output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The deck request body is missing fields or out of range.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The text-generation service returned no usable text.
    #[error("No response text received from the model")]
    EmptyResponse,

    /// A parser configuration could not be understood.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
