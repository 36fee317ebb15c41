//! Conversion error type.

use thiserror::Error;

/// Rejected configuration or an internal invariant violation during generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("batch threshold must be non-negative, got {0} ms")]
    NegativeThreshold(i64),

    #[error("return on failed check requires status code checks to be enabled")]
    ReturnWithoutChecks,

    #[error("entry {entry}: URL cannot be rendered: {url}")]
    UnrenderableUrl { entry: usize, url: String },
}
