//! Splitting a whole-book USJ document into per-chapter documents

use super::node::{Content, NodeKind};
use super::UsjDocument;

/// Split a document at its top-level chapter markers
///
/// # Parameters
/// * `doc` - A book-level document
///
/// # Returns
/// * `Vec<(u32, UsjDocument)>` - One document per chapter, in document order.
///   Content before the first chapter marker (book id, titles, introduction)
///   belongs to the first chapter. Chapter markers with a non-numeric number
///   stay inside the preceding chapter. A document without chapters yields
///   nothing.
pub fn split_chapters(doc: &UsjDocument) -> Vec<(u32, UsjDocument)> {
    let mut chapters: Vec<(u32, Vec<Content>)> = Vec::new();
    let mut prelude: Vec<Content> = Vec::new();

    for item in &doc.content {
        let chapter_number = match item {
            Content::Node(node) if node.kind == NodeKind::Chapter => node
                .number
                .as_deref()
                .and_then(|n| n.trim().parse::<u32>().ok()),
            _ => None,
        };

        if let Some(number) = chapter_number {
            let mut content = std::mem::take(&mut prelude);
            content.push(item.clone());
            chapters.push((number, content));
        } else if let Some((_, content)) = chapters.last_mut() {
            content.push(item.clone());
        } else {
            prelude.push(item.clone());
        }
    }

    chapters
        .into_iter()
        .map(|(number, content)| {
            (
                number,
                UsjDocument {
                    doc_type: doc.doc_type.clone(),
                    version: doc.version.clone(),
                    content,
                },
            )
        })
        .collect()
}
