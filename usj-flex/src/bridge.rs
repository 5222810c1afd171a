//! Bridge operations
//!
//! Each command of the bridge executable is a function here returning a
//! serializable result or a [`BridgeError`] with a stable [`ErrorCode`].
//! Naming conflicts and project availability come back as typed errors,
//! never as panics.

use crate::assembler::WritingSystemBinding;
use crate::filter::FilterOptions;
use crate::pipeline;
use crate::store::{suggest_text_name, ProjectEntry, ProjectRegistry, TargetProject, TextSummary};
use crate::text_run::WritingSystem;
use crate::usj::UsjDocument;
use serde::Serialize;
use uuid::Uuid;

// Submodules
mod error;
mod response;

// Re-export public types
pub use error::{BridgeError, ErrorCode};
pub use response::BridgeResponse;

/// Result of `list-projects`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    pub projects: Vec<ProjectEntry>,
}

/// Result of `project-info`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub default_vernacular_ws: String,
    pub default_analysis_ws: String,
    pub vernacular_writing_systems: Vec<String>,
    pub analysis_writing_systems: Vec<String>,
    pub texts: Vec<TextSummary>,
}

/// Input of `create-text`
#[derive(Debug, Clone)]
pub struct CreateTextRequest {
    /// Name of the text to create
    pub title: String,
    /// Replace an existing text with the same name
    pub overwrite: bool,
    /// Vernacular writing system to use instead of the project default
    pub vernacular_override: Option<String>,
    /// Content categories to keep
    pub options: FilterOptions,
    /// Chapter documents in ascending order
    pub chapters: Vec<UsjDocument>,
    /// Whether the first chapter is the start of the book
    pub first_is_book_start: bool,
}

/// Result of `create-text`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedText {
    pub text_name: String,
    pub text_id: Uuid,
    pub paragraph_count: usize,
    pub vernacular_ws: String,
    pub analysis_ws: String,
    pub overwritten: bool,
}

/// Result of `check-text-name`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNameCheck {
    pub name: String,
    pub exists: bool,
    pub suggested_name: String,
}

/// Result of `verify-text-by-id`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextVerification {
    pub text_id: Uuid,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_count: Option<usize>,
}

/// Result of `check-host-tool-status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostToolStatus {
    /// True when any project is held open by the host tool
    pub running: bool,
    pub locked_projects: Vec<String>,
}

/// Result of `get-safe-navigation-target`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub text_id: Option<Uuid>,
    pub text_name: Option<String>,
}

/// List all projects in a registry
pub fn list_projects(registry: &ProjectRegistry) -> ProjectListing {
    ProjectListing {
        projects: registry.discover(),
    }
}

/// Describe a project
pub fn project_info<P: TargetProject + ?Sized>(project: &P) -> Result<ProjectInfo, BridgeError> {
    Ok(ProjectInfo {
        name: project.name().to_string(),
        default_vernacular_ws: project
            .default_writing_system(WritingSystem::Vernacular)
            .to_string(),
        default_analysis_ws: project
            .default_writing_system(WritingSystem::Analysis)
            .to_string(),
        vernacular_writing_systems: project.vernacular_writing_systems().to_vec(),
        analysis_writing_systems: project.analysis_writing_systems().to_vec(),
        texts: project.list_texts()?,
    })
}

/// Convert chapters and store them as a new text
///
/// # Parameters
/// * `project` - Target project
/// * `request` - Text name, overwrite flag, filter options and chapters
///
/// # Returns
/// * `Ok(CreatedText)` - The text was committed
/// * `Err(BridgeError::TextNameConflict)` - The name is taken and overwrite
///   was not requested; the project is not modified
/// * `Err(BridgeError::Store)` - The project refused the write or the
///   removal of the replaced text; the replacement is rolled back
pub fn create_text<P: TargetProject + ?Sized>(
    project: &mut P,
    request: &CreateTextRequest,
) -> Result<CreatedText, BridgeError> {
    let name = request.title.trim();
    if name.is_empty() {
        return Err(BridgeError::InvalidRequest(
            "text title must not be empty".to_string(),
        ));
    }

    let existing = project.find_text_by_name(name)?;
    if existing.is_some() && !request.overwrite {
        let suggested_name = suggest_text_name(project, name)?;
        log::info!(
            "Text '{}' already exists in '{}', suggesting '{}'",
            name,
            project.name(),
            suggested_name
        );
        return Err(BridgeError::TextNameConflict {
            name: name.to_string(),
            suggested_name,
        });
    }

    let binding = WritingSystemBinding::resolve(project, request.vernacular_override.as_deref());
    let paragraphs = pipeline::build_paragraphs(
        &request.chapters,
        request.first_is_book_start,
        &request.options,
        &binding,
    );

    // The replacement is committed before the old text is removed, so a
    // failed write leaves the existing text in place.
    let created = project.create_text(name, paragraphs)?;
    if let Some(old) = &existing {
        if let Err(e) = project.delete_text(old.id) {
            // Never leave two texts with the same name behind
            if let Err(rollback) = project.delete_text(created.id) {
                log::error!(
                    "Failed to remove replacement text '{}' ({}): {}",
                    name,
                    created.id,
                    rollback
                );
            }
            return Err(e.into());
        }
        log::info!("Replaced text '{}' ({})", name, old.id);
    }

    Ok(CreatedText {
        text_name: created.name,
        text_id: created.id,
        paragraph_count: created.paragraph_count,
        vernacular_ws: binding.vernacular,
        analysis_ws: binding.analysis,
        overwritten: existing.is_some(),
    })
}

/// Check whether a text name is taken
pub fn check_text_name<P: TargetProject + ?Sized>(
    project: &P,
    name: &str,
) -> Result<TextNameCheck, BridgeError> {
    let name = name.trim();
    Ok(TextNameCheck {
        name: name.to_string(),
        exists: project.text_exists(name)?,
        suggested_name: suggest_text_name(project, name)?,
    })
}

/// Check whether a text id exists
pub fn verify_text_by_id<P: TargetProject + ?Sized>(
    project: &P,
    id: Uuid,
) -> Result<TextVerification, BridgeError> {
    let text = project.find_text_by_id(id)?;
    Ok(TextVerification {
        text_id: id,
        exists: text.is_some(),
        text_name: text.as_ref().map(|t| t.name.clone()),
        paragraph_count: text.as_ref().map(|t| t.paragraph_count),
    })
}

/// Report which projects the host tool currently holds open
pub fn check_host_tool_status(registry: &ProjectRegistry) -> HostToolStatus {
    let locked_projects = registry.locked_projects();
    HostToolStatus {
        running: !locked_projects.is_empty(),
        locked_projects,
    }
}

/// Pick a text the host tool can safely navigate to
///
/// The requested text when it exists, otherwise the first text by name,
/// otherwise nothing.
pub fn get_safe_navigation_target<P: TargetProject + ?Sized>(
    project: &P,
    requested: Option<Uuid>,
) -> Result<NavigationTarget, BridgeError> {
    let requested_text = match requested {
        Some(id) => project.find_text_by_id(id)?,
        None => None,
    };
    let target = match requested_text {
        Some(text) => Some(text),
        None => project.list_texts()?.into_iter().next(),
    };

    Ok(NavigationTarget {
        text_id: target.as_ref().map(|t| t.id),
        text_name: target.map(|t| t.name),
    })
}
