//! Error types for dataset export/import operations.

use thiserror::Error;

/// Errors that can occur while converting annotations to or from an
/// external dataset format.
#[derive(Error, Debug)]
pub enum FormatError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// NumPy array encoding or decoding error
    #[error("npy error: {0}")]
    Npy(String),

    /// Invalid structure or content in the input
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description of the problem
        message: String,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },
}
