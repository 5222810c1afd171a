//! Target project access
//!
//! A target project is the write-only sink for converted texts. The
//! [`TargetProject`] trait is the contract the bridge relies on; the
//! directory-backed and in-memory projects implement it.

use crate::assembler::RichParagraph;
use crate::text_run::WritingSystem;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Submodules
mod directory;
mod error;
mod memory;
mod naming;
mod registry;

// Re-export public types
pub use directory::{DirectoryProject, ProjectManifest, WritingSystemsConfig, FORMAT_VERSION};
pub use error::StoreError;
pub use memory::MemoryProject;
pub use naming::suggest_text_name;
pub use registry::{ProjectEntry, ProjectRegistry};

/// Summary of a text stored in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSummary {
    /// Stable text identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Number of paragraphs in the text
    pub paragraph_count: usize,
}

/// A complete stored text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredText {
    /// Stable text identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Paragraphs of writing-system tagged runs
    pub paragraphs: Vec<RichParagraph>,
}

impl StoredText {
    /// Summary of this text
    pub fn summary(&self) -> TextSummary {
        TextSummary {
            id: self.id,
            name: self.name.clone(),
            paragraph_count: self.paragraphs.len(),
        }
    }
}

/// Contract of a target project
pub trait TargetProject {
    /// Project name
    fn name(&self) -> &str;

    /// Default concrete writing-system identifier for a role
    fn default_writing_system(&self, role: WritingSystem) -> &str;

    /// All vernacular writing-system identifiers known to the project
    fn vernacular_writing_systems(&self) -> &[String];

    /// All analysis writing-system identifiers known to the project
    fn analysis_writing_systems(&self) -> &[String];

    /// All texts, sorted by name
    fn list_texts(&self) -> Result<Vec<TextSummary>, StoreError>;

    /// Create a text; either the whole text is committed or nothing is
    fn create_text(
        &mut self,
        name: &str,
        paragraphs: Vec<RichParagraph>,
    ) -> Result<TextSummary, StoreError>;

    /// Delete a text by id
    fn delete_text(&mut self, id: Uuid) -> Result<(), StoreError>;

    /// Look up a text by exact name
    fn find_text_by_name(&self, name: &str) -> Result<Option<TextSummary>, StoreError> {
        Ok(self.list_texts()?.into_iter().find(|text| text.name == name))
    }

    /// Look up a text by id
    fn find_text_by_id(&self, id: Uuid) -> Result<Option<TextSummary>, StoreError> {
        Ok(self.list_texts()?.into_iter().find(|text| text.id == id))
    }

    /// Whether a text with this exact name exists
    fn text_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.find_text_by_name(name)?.is_some())
    }

    /// Delete a text by name
    fn delete_text_by_name(&mut self, name: &str) -> Result<(), StoreError> {
        let text = self
            .find_text_by_name(name)?
            .ok_or_else(|| StoreError::TextNotFound(name.to_string()))?;
        self.delete_text(text.id)
    }
}
