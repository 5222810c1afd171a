//! Directory-backed target project
//!
//! Layout:
//! ```text
//! <project>/
//!   project.toml        manifest (name, format version, writing systems)
//!   .lock               present while the project is open for writing
//!   texts/<uuid>.json   one file per text
//! ```

use super::{StoreError, StoredText, TargetProject, TextSummary};
use crate::assembler::RichParagraph;
use crate::text_run::WritingSystem;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Project data format version read and written by this tool
pub const FORMAT_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "project.toml";
const LOCK_FILE: &str = ".lock";
const TEXTS_DIR: &str = "texts";

/// Project manifest from project.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project name
    pub name: String,

    /// Data format version the project was written with
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    /// Writing systems configured for the project
    pub writing_systems: WritingSystemsConfig,
}

/// Writing-system inventory; the first entry of each list is the default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSystemsConfig {
    /// Vernacular writing-system identifiers
    pub vernacular: Vec<String>,

    /// Analysis writing-system identifiers
    pub analysis: Vec<String>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl ProjectManifest {
    /// Create a manifest with a single vernacular and analysis writing system
    pub fn new(name: &str, vernacular: &str, analysis: &str) -> Self {
        Self {
            name: name.to_string(),
            format_version: FORMAT_VERSION,
            writing_systems: WritingSystemsConfig {
                vernacular: vec![vernacular.to_string()],
                analysis: vec![analysis.to_string()],
            },
        }
    }

    /// Load a manifest from a project.toml file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| StoreError::Manifest(path.to_path_buf(), e))
    }

    /// Save the manifest to a project.toml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| StoreError::InvalidManifest(path.to_path_buf(), e.to_string()))?;
        fs::write(path, content).map_err(|e| StoreError::Io(path.to_path_buf(), e))
    }

    fn validate(&self, path: &Path) -> Result<(), StoreError> {
        if self.writing_systems.vernacular.is_empty() {
            return Err(StoreError::InvalidManifest(
                path.to_path_buf(),
                "no vernacular writing system configured".to_string(),
            ));
        }
        if self.writing_systems.analysis.is_empty() {
            return Err(StoreError::InvalidManifest(
                path.to_path_buf(),
                "no analysis writing system configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// A project stored in a directory
#[derive(Debug)]
pub struct DirectoryProject {
    root: PathBuf,
    manifest: ProjectManifest,
}

impl DirectoryProject {
    /// Open an existing project
    ///
    /// # Parameters
    /// * `root` - Project directory containing project.toml
    ///
    /// # Returns
    /// * `Ok(DirectoryProject)` - The opened project
    /// * `Err(StoreError::ProjectNotFound)` - No manifest at `root`
    /// * `Err(StoreError::ProjectLocked)` - Another process holds the lock
    /// * `Err(StoreError::MigrationRequired)` - Format version mismatch
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(StoreError::ProjectNotFound(root.display().to_string()));
        }

        let manifest = ProjectManifest::load(&manifest_path)?;

        if Self::is_locked(root) {
            return Err(StoreError::ProjectLocked(manifest.name));
        }
        if manifest.format_version != FORMAT_VERSION {
            return Err(StoreError::MigrationRequired {
                project: manifest.name,
                found: manifest.format_version,
                expected: FORMAT_VERSION,
            });
        }
        manifest.validate(&manifest_path)?;

        log::debug!("Opened project '{}' at {}", manifest.name, root.display());
        Ok(Self {
            root: root.to_path_buf(),
            manifest,
        })
    }

    /// Create a new, empty project
    pub fn create(root: &Path, manifest: ProjectManifest) -> Result<Self, StoreError> {
        let manifest_path = root.join(MANIFEST_FILE);
        manifest.validate(&manifest_path)?;

        fs::create_dir_all(root.join(TEXTS_DIR))
            .map_err(|e| StoreError::Io(root.to_path_buf(), e))?;
        manifest.save(&manifest_path)?;

        Ok(Self {
            root: root.to_path_buf(),
            manifest,
        })
    }

    /// Whether the project at `root` is currently locked
    pub fn is_locked(root: &Path) -> bool {
        root.join(LOCK_FILE).exists()
    }

    /// Project directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project manifest
    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Read a full text by id
    pub fn read_text(&self, id: Uuid) -> Result<StoredText, StoreError> {
        let path = self.text_path(id);
        if !path.is_file() {
            return Err(StoreError::TextNotFound(id.to_string()));
        }
        read_text_file(&path)
    }

    fn texts_dir(&self) -> PathBuf {
        self.root.join(TEXTS_DIR)
    }

    fn text_path(&self, id: Uuid) -> PathBuf {
        self.texts_dir().join(format!("{}.json", id))
    }
}

impl TargetProject for DirectoryProject {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn default_writing_system(&self, role: WritingSystem) -> &str {
        let ids = match role {
            WritingSystem::Vernacular => &self.manifest.writing_systems.vernacular,
            WritingSystem::Analysis => &self.manifest.writing_systems.analysis,
        };
        ids.first().map(String::as_str).unwrap_or("")
    }

    fn vernacular_writing_systems(&self) -> &[String] {
        &self.manifest.writing_systems.vernacular
    }

    fn analysis_writing_systems(&self) -> &[String] {
        &self.manifest.writing_systems.analysis
    }

    fn list_texts(&self) -> Result<Vec<TextSummary>, StoreError> {
        let texts_dir = self.texts_dir();
        if !texts_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&texts_dir).map_err(|e| StoreError::Io(texts_dir.clone(), e))?;

        let mut summaries = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StoreError::Io(texts_dir.clone(), e))?
                .path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            summaries.push(read_text_file(&path)?.summary());
        }

        Ok(summaries
            .into_iter()
            .sorted_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)))
            .collect())
    }

    fn create_text(
        &mut self,
        name: &str,
        paragraphs: Vec<RichParagraph>,
    ) -> Result<TextSummary, StoreError> {
        let _lock = ProjectLock::acquire(&self.root, &self.manifest.name)?;
        let write_failed = |source: std::io::Error| StoreError::WriteFailed {
            name: name.to_string(),
            source,
        };

        let texts_dir = self.texts_dir();
        fs::create_dir_all(&texts_dir).map_err(write_failed)?;

        let text = StoredText {
            id: Uuid::new_v4(),
            name: name.to_string(),
            paragraphs,
        };

        // Write to a temporary file first; it is removed on drop unless persisted
        let mut staged = tempfile::NamedTempFile::new_in(&texts_dir).map_err(write_failed)?;
        serde_json::to_writer_pretty(&mut staged, &text)
            .map_err(|e| write_failed(std::io::Error::from(e)))?;
        staged.flush().map_err(write_failed)?;
        staged.as_file().sync_all().map_err(write_failed)?;
        staged
            .persist(self.text_path(text.id))
            .map_err(|e| write_failed(e.error))?;

        log::info!(
            "Created text '{}' ({} paragraphs) in project '{}'",
            text.name,
            text.paragraphs.len(),
            self.manifest.name
        );
        Ok(text.summary())
    }

    fn delete_text(&mut self, id: Uuid) -> Result<(), StoreError> {
        let _lock = ProjectLock::acquire(&self.root, &self.manifest.name)?;

        let path = self.text_path(id);
        if !path.is_file() {
            return Err(StoreError::TextNotFound(id.to_string()));
        }
        fs::remove_file(&path).map_err(|e| StoreError::Io(path.clone(), e))?;

        log::info!("Deleted text {} from project '{}'", id, self.manifest.name);
        Ok(())
    }
}

fn read_text_file(path: &Path) -> Result<StoredText, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&content).map_err(|e| StoreError::TextFile(path.to_path_buf(), e))
}

/// Lock file held for the duration of a write; removed on drop
struct ProjectLock {
    path: PathBuf,
}

impl ProjectLock {
    fn acquire(root: &Path, project: &str) -> Result<Self, StoreError> {
        let path = root.join(LOCK_FILE);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StoreError::ProjectLocked(project.to_string()))
            }
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
