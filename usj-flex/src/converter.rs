//! USJ tree to tagged-run converter
//!
//! Walks a (filtered) USJ tree in document order and produces paragraphs of
//! runs tagged vernacular or analysis. Marker tokens are rendered USFM-style
//! (`\p `, `\v 1 `, `\f + `, `\f*`) and always tagged analysis; text leaves
//! are vernacular unless an enclosing node forces analysis.

use crate::markers::{classify, classify_note_field, MarkerRole, NoteField};
use crate::text_run::{Paragraph, TextRun, WritingSystem};
use crate::usj::{Content, NodeKind, UsjDocument, UsjNode};

/// Converter state: the paragraph being built and the finished paragraphs
pub struct RunConverter {
    /// Runs of the paragraph currently being built
    current_runs: Vec<TextRun>,

    /// Completed paragraphs
    paragraphs: Vec<Paragraph>,
}

/// Inherited context for the children of a node
#[derive(Debug, Clone, Copy, Default)]
struct WalkContext {
    /// Tag all descendant text as analysis
    force_analysis: bool,

    /// Inside a footnote container; character children use footnote field rules
    in_footnote: bool,
}

impl WalkContext {
    fn forcing_analysis(self) -> Self {
        Self {
            force_analysis: true,
            ..self
        }
    }

    fn in_footnote(self) -> Self {
        Self {
            in_footnote: true,
            ..self
        }
    }

    fn outside_footnote(self) -> Self {
        Self {
            in_footnote: false,
            ..self
        }
    }

    fn text_writing_system(self) -> WritingSystem {
        if self.force_analysis {
            WritingSystem::Analysis
        } else {
            WritingSystem::Vernacular
        }
    }
}

impl RunConverter {
    /// Create a new converter with empty state
    pub fn new() -> Self {
        Self {
            current_runs: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Convert one content list into paragraphs
    ///
    /// # Parameters
    /// * `content` - Top-level content of a filtered document
    ///
    /// # Returns
    /// * `Vec<Paragraph>` - Non-empty paragraphs in document order
    pub fn convert(content: &[Content]) -> Vec<Paragraph> {
        let mut converter = Self::new();
        converter.process_content(content);
        converter.finish()
    }

    /// Convert an ordered sequence of chapter documents as one continuous walk
    pub fn convert_documents<'a, I>(documents: I) -> Vec<Paragraph>
    where
        I: IntoIterator<Item = &'a UsjDocument>,
    {
        let mut converter = Self::new();
        for doc in documents {
            converter.process_content(&doc.content);
        }
        converter.finish()
    }

    /// Feed more content into the walk
    pub fn process_content(&mut self, content: &[Content]) {
        self.process_children(content, WalkContext::default());
    }

    /// Flush the trailing paragraph and return all paragraphs
    pub fn finish(mut self) -> Vec<Paragraph> {
        self.flush_paragraph();
        self.paragraphs
    }

    fn process_children(&mut self, content: &[Content], ctx: WalkContext) {
        for item in content {
            match item {
                Content::Text(text) => self.push_run(text.as_str(), ctx.text_writing_system()),
                Content::Node(node) => self.process_node(node, ctx),
            }
        }
    }

    /// Dispatch a node by kind
    fn process_node(&mut self, node: &UsjNode, ctx: WalkContext) {
        match &node.kind {
            NodeKind::Book => self.handle_book(node, ctx),
            NodeKind::Chapter => self.handle_chapter(node, ctx),
            NodeKind::Verse => self.handle_verse(node, ctx),
            NodeKind::Paragraph => self.handle_paragraph(node, ctx),
            NodeKind::CharacterStyle => self.handle_character(node, ctx),
            NodeKind::Note => self.handle_note(node, ctx),
            NodeKind::Figure => self.handle_figure(node, ctx),
            NodeKind::Milestone => self.handle_milestone(node, ctx),
            NodeKind::Other(kind) => self.handle_other(kind, node, ctx),
        }
    }

    fn handle_book(&mut self, node: &UsjNode, ctx: WalkContext) {
        self.push_analysis(opening_token(node.marker.as_deref().unwrap_or("id")));
        if let Some(code) = &node.code {
            self.push_analysis(format!("{} ", code));
        }
        // Book titles on the id line may be translated
        self.process_children(&node.content, ctx);
    }

    fn handle_chapter(&mut self, node: &UsjNode, ctx: WalkContext) {
        self.flush_paragraph();
        self.push_analysis(numbered_token("c", node.number.as_deref()));
        self.process_children(&node.content, ctx);
    }

    fn handle_verse(&mut self, node: &UsjNode, ctx: WalkContext) {
        self.push_analysis(numbered_token("v", node.number.as_deref()));
        self.process_children(&node.content, ctx);
    }

    fn handle_paragraph(&mut self, node: &UsjNode, ctx: WalkContext) {
        let role = classify(node.marker_str());

        if role.starts_paragraph() {
            self.flush_paragraph();
        }
        if let Some(marker) = &node.marker {
            self.push_analysis(opening_token(marker));
        }

        // Section headings keep the vernacular default; only reference
        // paragraphs carry analysis text.
        let child_ctx = if role == MarkerRole::Reference {
            ctx.forcing_analysis()
        } else {
            ctx
        };
        self.process_children(&node.content, child_ctx);
    }

    fn handle_character(&mut self, node: &UsjNode, ctx: WalkContext) {
        let marker = node.marker_str();
        let role = classify(marker);

        if matches!(role, MarkerRole::Footnote | MarkerRole::CrossReference) {
            self.handle_note(node, ctx);
            return;
        }
        if ctx.in_footnote {
            self.handle_note_field(node, ctx);
            return;
        }

        let child_ctx = if role == MarkerRole::Reference {
            ctx.forcing_analysis()
        } else {
            ctx
        };
        self.push_analysis(opening_token(marker));
        self.process_children(&node.content, child_ctx);
        self.push_analysis(closing_token(marker));
    }

    fn handle_note(&mut self, node: &UsjNode, ctx: WalkContext) {
        let marker = node.marker.as_deref().unwrap_or("f");
        let caller = node.caller.as_deref().unwrap_or("+");

        self.push_analysis(format!("\\{} {} ", marker, caller));

        let child_ctx = match classify(marker) {
            MarkerRole::Footnote => ctx.in_footnote(),
            // Cross-reference targets are references, not translated text
            MarkerRole::CrossReference => ctx.forcing_analysis().outside_footnote(),
            _ => {
                log::debug!("Note with unrecognized marker '{}'", marker);
                ctx.outside_footnote()
            }
        };
        self.process_children(&node.content, child_ctx);

        self.push_analysis(closing_token(marker));
    }

    /// Character markers directly inside a footnote (`\fr`, `\ft`, `\fv`, ...)
    ///
    /// Only the footnote's own fields follow field rules; character styles
    /// nested in a field are ordinary spans with a closing token.
    fn handle_note_field(&mut self, node: &UsjNode, ctx: WalkContext) {
        let marker = node.marker_str();
        let field_ctx = ctx.outside_footnote();
        self.push_analysis(opening_token(marker));

        match classify_note_field(marker) {
            NoteField::Reference => {
                self.process_children(&node.content, field_ctx.forcing_analysis());
            }
            NoteField::Content => {
                self.process_children(&node.content, field_ctx);
            }
            NoteField::VerseNumber => {
                self.process_children(&node.content, field_ctx.forcing_analysis());
                self.push_analysis(closing_token(marker));
            }
            NoteField::Other => {
                log::debug!("Footnote field '{}' uses the default tagging", marker);
                self.process_children(&node.content, field_ctx);
            }
        }
    }

    fn handle_figure(&mut self, node: &UsjNode, ctx: WalkContext) {
        let marker = node.marker.as_deref().unwrap_or("fig");

        self.push_analysis(opening_token(marker));
        if let Some(file) = &node.file {
            self.push_analysis(format!("src=\"{}\" ", file));
        }
        if let Some(reference) = &node.reference {
            self.push_analysis(format!("ref=\"{}\" ", reference));
        }
        // Captions are translated text
        self.process_children(&node.content, ctx);
        self.push_analysis(closing_token(marker));
    }

    fn handle_milestone(&mut self, node: &UsjNode, ctx: WalkContext) {
        self.push_analysis(format!("\\{}", node.marker_str()));
        if let Some(sid) = &node.sid {
            self.push_analysis(format!(" |sid=\"{}\"", sid));
        }
        self.push_analysis("\\*");
        self.process_children(&node.content, ctx.forcing_analysis());
    }

    fn handle_other(&mut self, kind: &str, node: &UsjNode, ctx: WalkContext) {
        log::debug!(
            "Unrecognized node type '{}' (marker '{}'), using default tagging",
            kind,
            node.marker_str()
        );
        if let Some(marker) = &node.marker {
            self.push_analysis(opening_token(marker));
        }
        self.process_children(&node.content, ctx);
    }

    fn push_analysis(&mut self, text: impl Into<String>) {
        self.push_run(text, WritingSystem::Analysis);
    }

    /// Append a run to the current paragraph; empty text is dropped
    fn push_run(&mut self, text: impl Into<String>, writing_system: WritingSystem) {
        let text = text.into();
        if !text.is_empty() {
            self.current_runs.push(TextRun::new(text, writing_system));
        }
    }

    /// Close the current paragraph; a no-op when nothing was accumulated
    fn flush_paragraph(&mut self) {
        if self.current_runs.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.current_runs);
        self.paragraphs.push(Paragraph::new(runs));
    }
}

impl Default for RunConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn opening_token(marker: &str) -> String {
    format!("\\{} ", marker)
}

fn closing_token(marker: &str) -> String {
    format!("\\{}*", marker)
}

fn numbered_token(marker: &str, number: Option<&str>) -> String {
    match number {
        Some(number) => format!("\\{} {} ", marker, number),
        None => opening_token(marker),
    }
}
