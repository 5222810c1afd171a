//! Scripture providers
//!
//! A provider hands out one USJ tree per requested chapter, or `None` when a
//! chapter is not available. Unavailable chapters are skipped, not errors.

use crate::usj::{split_chapters, UsjDocument, UsjError};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Source of per-chapter USJ documents
pub trait ChapterProvider {
    /// Fetch one chapter
    ///
    /// # Returns
    /// * `Ok(Some(doc))` - The chapter tree
    /// * `Ok(None)` - The chapter is not available
    /// * `Err(UsjError)` - The chapter exists but could not be decoded
    fn chapter(&self, book: &str, chapter: u32) -> Result<Option<UsjDocument>, UsjError>;
}

/// An inclusive chapter range such as `1-3` or `5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRange {
    /// First chapter
    pub start: u32,
    /// Last chapter (inclusive)
    pub end: u32,
}

impl ChapterRange {
    /// A range covering a single chapter
    pub fn single(chapter: u32) -> Self {
        Self {
            start: chapter,
            end: chapter,
        }
    }

    /// Iterate over the chapter numbers in ascending order
    pub fn chapters(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// Whether introduction filtering applies to this range
    pub fn starts_at_book_beginning(&self) -> bool {
        self.start == 1
    }
}

impl std::fmt::Display for ChapterRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Invalid chapter range text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid chapter range '{0}': expected N or N-M with 1 <= N <= M")]
pub struct ChapterRangeError(pub String);

impl FromStr for ChapterRange {
    type Err = ChapterRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChapterRangeError(s.to_string());
        let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => {
                let chapter = parse(s)?;
                (chapter, chapter)
            }
        };

        if start == 0 || start > end {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

/// Reads chapters from `<root>/<BOOK>/<chapter>.json`
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    /// Create a provider over a directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn chapter_path(&self, book: &str, chapter: u32) -> PathBuf {
        self.root
            .join(book.to_ascii_uppercase())
            .join(format!("{}.json", chapter))
    }
}

impl ChapterProvider for DirectoryProvider {
    fn chapter(&self, book: &str, chapter: u32) -> Result<Option<UsjDocument>, UsjError> {
        let path = self.chapter_path(book, chapter);
        if !path.is_file() {
            return Ok(None);
        }
        UsjDocument::load(&path).map(Some)
    }
}

/// Serves chapters out of one whole-book document
#[derive(Debug, Clone)]
pub struct BookProvider {
    book: Option<String>,
    chapters: Vec<(u32, UsjDocument)>,
}

impl BookProvider {
    /// Split a whole-book document into chapters
    pub fn new(doc: &UsjDocument) -> Self {
        Self {
            book: doc.book_code().map(str::to_ascii_uppercase),
            chapters: split_chapters(doc),
        }
    }
}

impl ChapterProvider for BookProvider {
    fn chapter(&self, book: &str, chapter: u32) -> Result<Option<UsjDocument>, UsjError> {
        if let Some(own) = &self.book {
            if !own.eq_ignore_ascii_case(book) {
                return Ok(None);
            }
        }
        Ok(self
            .chapters
            .iter()
            .find(|(number, _)| *number == chapter)
            .map(|(_, doc)| doc.clone()))
    }
}

/// Fetch the available chapters of a range, in ascending order
///
/// Missing chapters are logged and skipped.
pub fn collect_chapters<P: ChapterProvider + ?Sized>(
    provider: &P,
    book: &str,
    range: ChapterRange,
) -> Result<Vec<UsjDocument>, UsjError> {
    let mut chapters = Vec::new();
    for chapter in range.chapters() {
        match provider.chapter(book, chapter)? {
            Some(doc) => chapters.push(doc),
            None => log::debug!("Chapter {} {} not available, skipping", book, chapter),
        }
    }
    log::info!(
        "Collected {} of {} chapters for {} {}",
        chapters.len(),
        range.end - range.start + 1,
        book,
        range
    );
    Ok(chapters)
}
