//! Writing-system tagged text runs
//!
//! A text run is a span of text in a single writing system. Runs never cross
//! a paragraph boundary.

use serde::{Deserialize, Serialize};

/// Abstract writing-system role of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingSystem {
    /// The translated (target language) text
    Vernacular,
    /// Markers, references and other metadata
    Analysis,
}

/// A span of text tagged with a writing system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Writing system role of the text
    pub writing_system: WritingSystem,
}

impl TextRun {
    /// Create a new run
    pub fn new(text: impl Into<String>, writing_system: WritingSystem) -> Self {
        Self {
            text: text.into(),
            writing_system,
        }
    }

    /// Create a vernacular run
    pub fn vernacular(text: impl Into<String>) -> Self {
        Self::new(text, WritingSystem::Vernacular)
    }

    /// Create an analysis run
    pub fn analysis(text: impl Into<String>) -> Self {
        Self::new(text, WritingSystem::Analysis)
    }

    /// Check if the run carries no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An ordered sequence of runs forming one paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Runs in reading order
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create a paragraph from runs
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    /// True when no run carries any text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }

    /// Plain text of the paragraph, ignoring writing systems
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}
