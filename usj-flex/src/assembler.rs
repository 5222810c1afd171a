//! Paragraph assembly and writing-system resolution
//!
//! Maps abstract vernacular/analysis tags onto the concrete writing-system
//! identifiers of a target project and produces the rich-text paragraphs the
//! project stores.

use crate::store::TargetProject;
use crate::text_run::{Paragraph, WritingSystem};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Concrete writing-system identifiers for one conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSystemBinding {
    /// Identifier used for vernacular runs
    pub vernacular: String,
    /// Identifier used for analysis runs
    pub analysis: String,
}

impl WritingSystemBinding {
    /// Resolve the binding against a project
    ///
    /// # Parameters
    /// * `project` - Target project supplying defaults and known identifiers
    /// * `vernacular_override` - Caller-requested vernacular identifier
    ///
    /// # Returns
    /// * `WritingSystemBinding` - The override (in the project's own spelling)
    ///   when the project knows it, otherwise the project's default
    ///   vernacular. Analysis is always the project default.
    pub fn resolve<P: TargetProject + ?Sized>(project: &P, vernacular_override: Option<&str>) -> Self {
        let requested = vernacular_override
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let vernacular = match requested {
            Some(id) => match project
                .vernacular_writing_systems()
                .iter()
                .find(|known| known.eq_ignore_ascii_case(id))
            {
                Some(known) => known.clone(),
                None => {
                    log::warn!(
                        "Writing system '{}' is not a vernacular writing system of project '{}', using the default",
                        id,
                        project.name()
                    );
                    project
                        .default_writing_system(WritingSystem::Vernacular)
                        .to_string()
                }
            },
            None => project
                .default_writing_system(WritingSystem::Vernacular)
                .to_string(),
        };

        Self {
            vernacular,
            analysis: project
                .default_writing_system(WritingSystem::Analysis)
                .to_string(),
        }
    }

    /// Concrete identifier for a role
    pub fn identifier(&self, role: WritingSystem) -> &str {
        match role {
            WritingSystem::Vernacular => &self.vernacular,
            WritingSystem::Analysis => &self.analysis,
        }
    }
}

/// A run of text in a concrete writing system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichRun {
    /// The text content
    pub text: String,
    /// Writing-system identifier
    pub ws: String,
}

/// A paragraph of the target document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichParagraph {
    /// Runs in reading order
    pub runs: Vec<RichRun>,
}

impl RichParagraph {
    /// Plain text of the paragraph
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Assemble converted paragraphs into target paragraphs
///
/// Empty runs are skipped, adjacent runs resolving to the same identifier are
/// merged, and paragraphs left without text are dropped. When nothing is
/// left, a single paragraph holding one empty vernacular run is returned so
/// the target text always has at least one paragraph.
pub fn assemble(paragraphs: &[Paragraph], binding: &WritingSystemBinding) -> Vec<RichParagraph> {
    let assembled: Vec<RichParagraph> = paragraphs
        .iter()
        .map(|paragraph| assemble_paragraph(paragraph, binding))
        .filter(|paragraph| !paragraph.runs.is_empty())
        .collect();

    if assembled.is_empty() {
        log::debug!("No content converted, emitting a placeholder paragraph");
        return vec![RichParagraph {
            runs: vec![RichRun {
                text: String::new(),
                ws: binding.vernacular.clone(),
            }],
        }];
    }

    assembled
}

fn assemble_paragraph(paragraph: &Paragraph, binding: &WritingSystemBinding) -> RichParagraph {
    let runs = paragraph
        .runs
        .iter()
        .filter(|run| !run.is_empty())
        .map(|run| RichRun {
            text: run.text.clone(),
            ws: binding.identifier(run.writing_system).to_string(),
        })
        .coalesce(|mut prev, next| {
            if prev.ws == next.ws {
                prev.text.push_str(&next.text);
                Ok(prev)
            } else {
                Err((prev, next))
            }
        })
        .collect();

    RichParagraph { runs }
}
