//! Decode error type.

use thiserror::Error;

/// Malformed or structurally incomplete archive input.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not well-formed JSON, or the `log`/`entries` structure is absent or mistyped.
    #[error("malformed HAR document: {0}")]
    Json(#[from] serde_json::Error),

    /// The input stream could not be read.
    #[error("read HAR stream: {0}")]
    Io(#[from] std::io::Error),

    /// A required per-entry field is absent.
    #[error("entry {entry}: missing required field `{field}`")]
    MissingField { entry: usize, field: &'static str },

    /// A required per-entry field is present but cannot be interpreted.
    #[error("entry {entry}: invalid `{field}`: {reason}")]
    InvalidField {
        entry: usize,
        field: &'static str,
        reason: String,
    },
}
