//! USJ (Unified Scripture JSON) document model
//!
//! This module defines the source tree handed over by the scripture provider:
//! a root document whose `content` is an ordered mix of plain text and marker
//! nodes.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

// Submodules
mod chapters;
mod error;
mod node;

// Re-export public types
pub use chapters::split_chapters;
pub use error::UsjError;
pub use node::{flatten_text, Content, NodeKind, UsjNode};

/// Root `type` value of every USJ document
pub const USJ_TYPE: &str = "USJ";

/// Version written on documents created by this crate
pub const USJ_VERSION: &str = "3.1";

/// A complete USJ document (or one chapter of one)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsjDocument {
    /// Always "USJ"
    #[serde(rename = "type")]
    pub doc_type: String,

    /// USJ schema version
    #[serde(default)]
    pub version: String,

    /// Top-level content in reading order
    #[serde(default)]
    pub content: Vec<Content>,
}

impl UsjDocument {
    /// Create a document from top-level content
    pub fn new(content: Vec<Content>) -> Self {
        Self {
            doc_type: USJ_TYPE.to_string(),
            version: USJ_VERSION.to_string(),
            content,
        }
    }

    /// Decode a USJ document from a JSON string
    ///
    /// # Returns
    /// * `Ok(UsjDocument)` - Decoded document
    /// * `Err(UsjError)` - Payload is not JSON, not USJ-shaped, or its root
    ///   type is not "USJ"
    pub fn from_json(json: &str) -> Result<Self, UsjError> {
        let doc: UsjDocument = serde_json::from_str(json)?;
        doc.check_root()
    }

    /// Decode a USJ document from a reader (e.g. stdin)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, UsjError> {
        let doc: UsjDocument = serde_json::from_reader(reader)?;
        doc.check_root()
    }

    /// Load a USJ document from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, UsjError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| UsjError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json)
    }

    /// Encode the document as JSON
    pub fn to_json(&self) -> Result<String, UsjError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Book code from the first `book` node, if any
    pub fn book_code(&self) -> Option<&str> {
        self.content.iter().find_map(|item| match item {
            Content::Node(node) if node.kind == NodeKind::Book => node.code.as_deref(),
            _ => None,
        })
    }

    fn check_root(self) -> Result<Self, UsjError> {
        if self.doc_type.eq_ignore_ascii_case(USJ_TYPE) {
            Ok(self)
        } else {
            Err(UsjError::NotUsj(self.doc_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal_chapter() {
        // Arrange
        let json = r#"{
            "type": "USJ",
            "version": "3.1",
            "content": [
                {"type": "book", "marker": "id", "code": "GEN"},
                {"type": "chapter", "marker": "c", "number": "1", "sid": "GEN 1"},
                {"type": "para", "marker": "p", "content": [
                    {"type": "verse", "marker": "v", "number": "1", "sid": "GEN 1:1"},
                    "In the beginning..."
                ]}
            ]
        }"#;

        // Act
        let doc = UsjDocument::from_json(json).unwrap();

        // Assert
        assert_eq!(doc.content.len(), 3);
        assert_eq!(doc.book_code(), Some("GEN"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = UsjDocument::from_json("not json at all");
        assert!(matches!(result, Err(UsjError::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_wrong_root_type() {
        let result = UsjDocument::from_json(r#"{"type": "USX", "version": "3.0", "content": []}"#);
        assert!(matches!(result, Err(UsjError::NotUsj(t)) if t == "USX"));
    }

    #[test]
    fn test_from_json_rejects_non_string_non_object_content() {
        let result = UsjDocument::from_json(r#"{"type": "USJ", "version": "3.1", "content": [42]}"#);
        assert!(matches!(result, Err(UsjError::Json(_))));
    }
}
