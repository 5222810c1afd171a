//! Marker classification tables
//!
//! Maps a marker name to the role it plays during filtering and conversion.
//! Numbered variants (`s1`, `q2`, `li3`, ...) are normalized to their base
//! name once, so the tables only list base names. Introduction markers are
//! matched with a pattern because several of them collide with body markers
//! after normalization (`ip` vs `p`, `imt` vs `mt`).

use regex::Regex;
use std::sync::OnceLock;

/// Role of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// Body, poetry, list and identification paragraph styles
    ParagraphStarter,
    /// Section and title headings; marker is analysis, heading text vernacular
    SectionHeading,
    /// Parallel-passage and section references; marker and text analysis
    Reference,
    /// Book introduction (front matter) paragraphs
    Intro,
    /// Translator remark (`\rem`)
    Remark,
    /// Footnote container
    Footnote,
    /// Cross-reference container
    CrossReference,
    /// Figure
    Figure,
    /// Milestone (`\qt-s`, `\ts-e`, ...)
    Milestone,
    /// Known character style
    CharacterStyle,
    /// Anything else, including the empty marker
    Default,
}

impl MarkerRole {
    /// Whether a paragraph-kind node with this role opens a new paragraph
    pub fn starts_paragraph(self) -> bool {
        matches!(
            self,
            MarkerRole::ParagraphStarter
                | MarkerRole::SectionHeading
                | MarkerRole::Reference
                | MarkerRole::Intro
                | MarkerRole::Remark
        )
    }
}

/// Role of a character marker nested inside a footnote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    /// `\fr` origin reference; analysis
    Reference,
    /// `\fk`, `\ft`, `\fq`, `\fqa`; vernacular text
    Content,
    /// `\fv` verse number; analysis, explicitly closed
    VerseNumber,
    /// Any other marker; analysis marker, vernacular text
    Other,
}

const PARAGRAPH_STARTERS: &[&str] = &[
    // identification and headers
    "h", "toc", "toca", "cl", "cd", "d", "sd", "sp",
    // body paragraphs
    "p", "m", "po", "pr", "cls", "pmo", "pm", "pmc", "pmr", "pi", "mi", "nb", "pc", "ph", "b",
    // poetry
    "q", "qr", "qc", "qa", "qm", "qd",
    // lists
    "lh", "li", "lf", "lim",
];

const SECTION_MARKERS: &[&str] = &["s", "ms", "mt", "mte"];

const REFERENCE_MARKERS: &[&str] = &["sr", "r", "mr", "rq"];

const FOOTNOTE_MARKERS: &[&str] = &["f", "fe", "ef"];

const CROSS_REF_MARKERS: &[&str] = &["x", "ex"];

const REMARK_MARKERS: &[&str] = &["rem"];

const FIGURE_MARKERS: &[&str] = &["fig"];

const CHARACTER_STYLES: &[&str] = &[
    // special text
    "add", "bk", "dc", "k", "nd", "ord", "pn", "png", "addpn", "qt", "sig", "sls", "tl", "wj",
    // character formatting
    "em", "bd", "it", "bdit", "no", "sc", "sup",
    // word-level
    "w", "rb", "pro", "wg", "wh", "wa", "jmp",
    // poetry and lists
    "qs", "qac", "litl", "lik", "liv",
    // alternate numbering
    "ca", "va", "vp", "cp",
    // table cells
    "th", "thr", "tc", "tcr",
    // footnote fields
    "fr", "fk", "ft", "fq", "fqa", "fl", "fw", "fp", "fv", "fdc", "fm",
    // cross-reference fields
    "xo", "xk", "xq", "xt", "xta", "xop", "xot", "xnt", "xdc",
];

const INTRO_PATTERN: &str =
    r"^(imt\d?|is\d?|ip|ipi|im|imi|ipq|imq|ipr|iq\d?|ib|ili\d?|iot|io\d?|iex|ie)$";

fn intro_pattern() -> Option<&'static Regex> {
    static INTRO: OnceLock<Option<Regex>> = OnceLock::new();
    INTRO
        .get_or_init(|| match Regex::new(INTRO_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::error!("Intro marker pattern is invalid: {}", e);
                None
            }
        })
        .as_ref()
}

/// Normalize a marker for table lookup
///
/// Trims, lowercases and strips a trailing level number: `"S2"` -> `"s"`,
/// `"toc1"` -> `"toc"`, `"li"` -> `"li"`. Milestone suffixes are kept
/// (`"qt1-s"` -> `"qt1-s"`).
pub fn normalize(marker: &str) -> String {
    let lowered = marker.trim().to_ascii_lowercase();
    let base = lowered.trim_end_matches(|c: char| c.is_ascii_digit());
    if base.is_empty() {
        lowered
    } else {
        base.to_string()
    }
}

/// Whether a marker is valid only in a book introduction
pub fn is_intro_marker(marker: &str) -> bool {
    let marker = marker.trim().to_ascii_lowercase();
    intro_pattern().is_some_and(|pattern| pattern.is_match(&marker))
}

/// Classify a marker
///
/// Total: every input, including the empty string, yields a role.
pub fn classify(marker: &str) -> MarkerRole {
    if marker.trim().is_empty() {
        return MarkerRole::Default;
    }
    if is_intro_marker(marker) {
        return MarkerRole::Intro;
    }

    let base = normalize(marker);
    let base = base.as_str();

    if FOOTNOTE_MARKERS.contains(&base) {
        MarkerRole::Footnote
    } else if CROSS_REF_MARKERS.contains(&base) {
        MarkerRole::CrossReference
    } else if REFERENCE_MARKERS.contains(&base) {
        MarkerRole::Reference
    } else if SECTION_MARKERS.contains(&base) {
        MarkerRole::SectionHeading
    } else if REMARK_MARKERS.contains(&base) {
        MarkerRole::Remark
    } else if FIGURE_MARKERS.contains(&base) {
        MarkerRole::Figure
    } else if base.ends_with("-s") || base.ends_with("-e") || base == "ts" {
        MarkerRole::Milestone
    } else if PARAGRAPH_STARTERS.contains(&base) {
        MarkerRole::ParagraphStarter
    } else if CHARACTER_STYLES.contains(&base) {
        MarkerRole::CharacterStyle
    } else {
        MarkerRole::Default
    }
}

/// Classify a character marker found inside a footnote container
pub fn classify_note_field(marker: &str) -> NoteField {
    match marker.trim().to_ascii_lowercase().as_str() {
        "fr" => NoteField::Reference,
        "fk" | "ft" | "fq" | "fqa" => NoteField::Content,
        "fv" => NoteField::VerseNumber,
        _ => NoteField::Other,
    }
}
