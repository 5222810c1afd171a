//! Three-stage conversion pipeline
//!
//! This module chains the stages of converting scripture into a target text:
//! 1. **Filtering**: Remove optional content categories from each chapter
//! 2. **Conversion**: Walk the chapters in order into tagged paragraphs
//! 3. **Assembly**: Bind writing systems and build target paragraphs
//!
//! Every stage is pure and synchronous; callers may run independent
//! conversions concurrently.

use crate::assembler::{assemble, RichParagraph, WritingSystemBinding};
use crate::converter::RunConverter;
use crate::filter::{filter_document, FilterOptions};
use crate::text_run::Paragraph;
use crate::usj::UsjDocument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stage 1: Filter an ordered sequence of chapters
///
/// # Parameters
/// * `chapters` - Chapter documents in ascending order
/// * `first_is_book_start` - Whether the first document starts the book
///   (chapter 1); only then is introduction content subject to removal
/// * `options` - Categories to keep
///
/// # Returns
/// * `Vec<UsjDocument>` - Filtered chapters, in the same order
pub fn filter_chapters(
    chapters: &[UsjDocument],
    first_is_book_start: bool,
    options: &FilterOptions,
) -> Vec<UsjDocument> {
    let filter_one = |(index, doc): (usize, &UsjDocument)| {
        filter_document(doc, index == 0 && first_is_book_start, options)
    };

    #[cfg(feature = "parallel")]
    let filtered: Vec<UsjDocument> = chapters.par_iter().enumerate().map(filter_one).collect();

    #[cfg(not(feature = "parallel"))]
    let filtered: Vec<UsjDocument> = chapters.iter().enumerate().map(filter_one).collect();

    filtered
}

/// Stages 1 and 2: Filter and convert chapters into tagged paragraphs
pub fn convert_chapters(
    chapters: &[UsjDocument],
    first_is_book_start: bool,
    options: &FilterOptions,
) -> Vec<Paragraph> {
    let filtered = filter_chapters(chapters, first_is_book_start, options);
    let paragraphs = RunConverter::convert_documents(&filtered);
    log::info!(
        "Converted {} chapters into {} paragraphs",
        chapters.len(),
        paragraphs.len()
    );
    paragraphs
}

/// Stages 1 to 3: Produce the target paragraphs for a text
///
/// Always returns at least one paragraph.
pub fn build_paragraphs(
    chapters: &[UsjDocument],
    first_is_book_start: bool,
    options: &FilterOptions,
    binding: &WritingSystemBinding,
) -> Vec<RichParagraph> {
    let paragraphs = convert_chapters(chapters, first_is_book_start, options);
    assemble(&paragraphs, binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_run::WritingSystem;
    use crate::usj::{Content, UsjNode};
    use pretty_assertions::assert_eq;

    fn binding() -> WritingSystemBinding {
        WritingSystemBinding {
            vernacular: "seh".to_string(),
            analysis: "en".to_string(),
        }
    }

    fn chapter(number: &str, intro: bool) -> UsjDocument {
        let mut content: Vec<Content> = Vec::new();
        if intro {
            content.push(UsjNode::para("ip").with_content(["Intro"]).into());
        }
        content.push(UsjNode::chapter(number).into());
        content.push(UsjNode::para("p").with_content(["Body"]).into());
        UsjDocument::new(content)
    }

    #[test]
    fn test_intro_filtered_only_in_first_chapter() {
        // Arrange: a stray intro paragraph in chapter 2 as well
        let chapters = vec![chapter("1", true), chapter("2", true)];

        // Act
        let filtered = filter_chapters(&chapters, true, &FilterOptions::default());

        // Assert
        assert_eq!(filtered[0].content.len(), 2);
        assert_eq!(filtered[1].content.len(), 3);
    }

    #[test]
    fn test_range_not_starting_at_book_keeps_intro() {
        let chapters = vec![chapter("2", true)];

        let filtered = filter_chapters(&chapters, false, &FilterOptions::default());

        assert_eq!(filtered, chapters);
    }

    #[test]
    fn test_zero_chapters_yield_placeholder() {
        let paragraphs = build_paragraphs(&[], true, &FilterOptions::default(), &binding());

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].runs.len(), 1);
        assert_eq!(paragraphs[0].runs[0].text, "");
        assert_eq!(paragraphs[0].runs[0].ws, "seh");
    }

    #[test]
    fn test_reference_scenario_with_and_without_cross_refs() {
        // Arrange
        let doc = UsjDocument::new(vec![
            UsjNode::para("r").with_content(["Matt 5:1-12"]).into(),
        ]);

        // Act
        let without = convert_chapters(&[doc.clone()], true, &FilterOptions::default());
        let options = FilterOptions {
            include_cross_refs: true,
            ..FilterOptions::default()
        };
        let with = convert_chapters(&[doc], true, &options);

        // Assert
        assert!(without.is_empty());
        assert_eq!(with.len(), 1);
        assert!(with[0]
            .runs
            .iter()
            .all(|run| run.writing_system == WritingSystem::Analysis));
    }

    #[test]
    fn test_build_paragraphs_end_to_end() {
        let chapters = vec![chapter("1", true), chapter("2", false)];

        let paragraphs =
            build_paragraphs(&chapters, true, &FilterOptions::default(), &binding());

        let texts: Vec<String> = paragraphs.iter().map(RichParagraph::text).collect();
        assert_eq!(texts, vec!["\\c 1 ", "\\p Body", "\\c 2 ", "\\p Body"]);
    }
}
