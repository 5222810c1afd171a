//! Error types for target project access

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a target project
#[derive(Error, Debug)]
pub enum StoreError {
    /// No project with this name or path exists
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// The project is open in another process
    #[error("Project '{0}' is locked by another process")]
    ProjectLocked(String),

    /// The project was written by a different data format version
    #[error("Project '{project}' uses format version {found}, but version {expected} is required; open it in the host tool to migrate it")]
    MigrationRequired {
        /// Project name
        project: String,
        /// Version recorded in the project
        found: u32,
        /// Version this tool reads and writes
        expected: u32,
    },

    /// No text with this name or id exists
    #[error("Text not found: {0}")]
    TextNotFound(String),

    /// The project manifest is structurally invalid
    #[error("Invalid project manifest {path}: {reason}", path = .0.display(), reason = .1)]
    InvalidManifest(PathBuf, String),

    /// Writing a text failed; nothing was committed
    #[error("Failed to write text '{name}': {source}")]
    WriteFailed {
        /// Text name
        name: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    #[error("IO error accessing {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Error parsing project manifest {path}: {source}", path = .0.display(), source = .1)]
    Manifest(PathBuf, #[source] toml::de::Error),

    #[error("Error parsing text file {path}: {source}", path = .0.display(), source = .1)]
    TextFile(PathBuf, #[source] serde_json::Error),
}
