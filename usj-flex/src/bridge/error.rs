//! Bridge error taxonomy and stable error codes

use crate::config::ConfigError;
use crate::provider::ChapterRangeError;
use crate::store::StoreError;
use crate::usj::UsjError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable failure code
///
/// Callers branch on these codes; the accompanying message is for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The source payload or request is malformed
    InvalidInput,
    /// The target project does not exist
    ProjectNotFound,
    /// The target project is open in another process
    ProjectLocked,
    /// The target project needs a data migration first
    MigrationRequired,
    /// A text with the requested name already exists
    TextNameConflict,
    /// The requested text does not exist
    TextNotFound,
    /// Writing the text failed; nothing was committed
    WriteFailed,
    /// The target project's files could not be read
    ProjectReadFailed,
    /// The bridge configuration is invalid
    ConfigInvalid,
}

/// Errors returned by bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Usj(#[from] UsjError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ChapterRange(#[from] ChapterRangeError),

    /// The request itself is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A text with this name exists and overwrite was not requested
    #[error("A text named '{name}' already exists; suggested name: '{suggested_name}'")]
    TextNameConflict {
        /// Requested name
        name: String,
        /// First free alternative name
        suggested_name: String,
    },
}

impl BridgeError {
    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::Usj(_) | BridgeError::ChapterRange(_) | BridgeError::InvalidRequest(_) => {
                ErrorCode::InvalidInput
            }
            BridgeError::Config(_) => ErrorCode::ConfigInvalid,
            BridgeError::TextNameConflict { .. } => ErrorCode::TextNameConflict,
            BridgeError::Store(e) => match e {
                StoreError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
                StoreError::ProjectLocked(_) => ErrorCode::ProjectLocked,
                StoreError::MigrationRequired { .. } => ErrorCode::MigrationRequired,
                StoreError::TextNotFound(_) => ErrorCode::TextNotFound,
                StoreError::WriteFailed { .. } => ErrorCode::WriteFailed,
                StoreError::InvalidManifest(..)
                | StoreError::Io(..)
                | StoreError::Manifest(..)
                | StoreError::TextFile(..) => ErrorCode::ProjectReadFailed,
            },
        }
    }

    /// Suggested alternative text name, for naming conflicts
    pub fn suggested_name(&self) -> Option<&str> {
        match self {
            BridgeError::TextNameConflict { suggested_name, .. } => Some(suggested_name),
            _ => None,
        }
    }
}
