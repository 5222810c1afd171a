//! In-memory target project

use super::{StoreError, StoredText, TargetProject, TextSummary};
use crate::assembler::RichParagraph;
use crate::text_run::WritingSystem;
use itertools::Itertools;
use uuid::Uuid;

/// A project held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryProject {
    name: String,
    vernacular: Vec<String>,
    analysis: Vec<String>,
    texts: Vec<StoredText>,
    fail_writes: bool,
}

impl MemoryProject {
    /// Create an empty project with one vernacular and one analysis writing system
    pub fn new(name: &str, vernacular: &str, analysis: &str) -> Self {
        Self {
            name: name.to_string(),
            vernacular: vec![vernacular.to_string()],
            analysis: vec![analysis.to_string()],
            texts: Vec::new(),
            fail_writes: false,
        }
    }

    /// Register an additional vernacular writing system
    pub fn with_vernacular(mut self, id: &str) -> Self {
        self.vernacular.push(id.to_string());
        self
    }

    /// Make every subsequent write fail, leaving the project untouched
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Full stored text by id
    pub fn text(&self, id: Uuid) -> Option<&StoredText> {
        self.texts.iter().find(|text| text.id == id)
    }
}

impl TargetProject for MemoryProject {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_writing_system(&self, role: WritingSystem) -> &str {
        let ids = match role {
            WritingSystem::Vernacular => &self.vernacular,
            WritingSystem::Analysis => &self.analysis,
        };
        ids.first().map(String::as_str).unwrap_or("")
    }

    fn vernacular_writing_systems(&self) -> &[String] {
        &self.vernacular
    }

    fn analysis_writing_systems(&self) -> &[String] {
        &self.analysis
    }

    fn list_texts(&self) -> Result<Vec<TextSummary>, StoreError> {
        Ok(self
            .texts
            .iter()
            .map(StoredText::summary)
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect())
    }

    fn create_text(
        &mut self,
        name: &str,
        paragraphs: Vec<RichParagraph>,
    ) -> Result<TextSummary, StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed {
                name: name.to_string(),
                source: std::io::Error::other("writes disabled"),
            });
        }
        let text = StoredText {
            id: Uuid::new_v4(),
            name: name.to_string(),
            paragraphs,
        };
        let summary = text.summary();
        self.texts.push(text);
        Ok(summary)
    }

    fn delete_text(&mut self, id: Uuid) -> Result<(), StoreError> {
        let before = self.texts.len();
        self.texts.retain(|text| text.id != id);
        if self.texts.len() == before {
            return Err(StoreError::TextNotFound(id.to_string()));
        }
        Ok(())
    }
}
