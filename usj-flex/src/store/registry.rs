//! Discovery of directory projects under a common root

use super::directory::{DirectoryProject, ProjectManifest};
use super::StoreError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A project found by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Project name from its manifest
    pub name: String,
    /// Project directory
    pub path: PathBuf,
    /// Whether the project is currently locked by another process
    pub locked: bool,
}

/// Projects living in subdirectories of one root directory
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    root: PathBuf,
}

impl ProjectRegistry {
    /// Create a registry over `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Root directory searched for projects
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover all projects, sorted by name
    ///
    /// Directories with an unreadable manifest are skipped with a warning.
    pub fn discover(&self) -> Vec<ProjectEntry> {
        if !self.root.is_dir() {
            log::warn!("Projects directory {} does not exist", self.root.display());
            return Vec::new();
        }

        let mut entries: Vec<ProjectEntry> = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == "project.toml")
            .filter_map(|e| {
                let project_dir = e.path().parent()?.to_path_buf();
                match ProjectManifest::load(e.path()) {
                    Ok(manifest) => Some(ProjectEntry {
                        name: manifest.name,
                        locked: DirectoryProject::is_locked(&project_dir),
                        path: project_dir,
                    }),
                    Err(err) => {
                        log::warn!("Skipping {}: {}", e.path().display(), err);
                        None
                    }
                }
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Open a project by manifest name or directory name
    pub fn open(&self, name: &str) -> Result<DirectoryProject, StoreError> {
        let entry = self
            .discover()
            .into_iter()
            .find(|entry| {
                entry.name == name
                    || entry.path.file_name().and_then(|s| s.to_str()) == Some(name)
            })
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;

        DirectoryProject::open(&entry.path)
    }

    /// Names of projects currently locked by another process
    pub fn locked_projects(&self) -> Vec<String> {
        self.discover()
            .into_iter()
            .filter(|entry| entry.locked)
            .map(|entry| entry.name)
            .collect()
    }
}
