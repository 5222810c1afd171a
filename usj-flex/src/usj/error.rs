//! Error types for USJ decoding

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a USJ payload
///
/// Unknown node types and markers are never errors; only a payload that
/// cannot be decoded as a USJ document at all is rejected.
#[derive(Error, Debug)]
pub enum UsjError {
    /// The payload is not valid JSON or does not match the USJ shape
    #[error("Invalid USJ payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The root object is not a USJ document
    #[error("Expected a USJ document but found root type '{0}'")]
    NotUsj(String),

    /// The payload could not be read
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),
}
