//! USJ node tree
//!
//! A USJ document is a JSON tree whose `content` arrays mix plain strings with
//! nested marker nodes. The mixed array is decoded element by element into
//! [`Content`], so every consumer matches on the variant instead of probing
//! the JSON value.

use serde::{Deserialize, Serialize};

/// The kind of a USJ node, taken from its `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Book identification (`\id`)
    Book,
    /// Chapter marker (`\c`)
    Chapter,
    /// Verse marker (`\v`)
    Verse,
    /// Paragraph-level marker (USJ `para`)
    Paragraph,
    /// Character-level marker (USJ `char`)
    CharacterStyle,
    /// Footnote or cross-reference container
    Note,
    /// Figure with caption
    Figure,
    /// Milestone marker (USJ `ms`)
    Milestone,
    /// Any other node type (`table`, `sidebar`, `ref`, ...), kept verbatim
    Other(String),
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "book" => NodeKind::Book,
            "chapter" => NodeKind::Chapter,
            "verse" => NodeKind::Verse,
            "para" => NodeKind::Paragraph,
            "char" => NodeKind::CharacterStyle,
            "note" => NodeKind::Note,
            "figure" => NodeKind::Figure,
            "ms" => NodeKind::Milestone,
            _ => NodeKind::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl NodeKind {
    /// The USJ `type` string for this kind
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Book => "book",
            NodeKind::Chapter => "chapter",
            NodeKind::Verse => "verse",
            NodeKind::Paragraph => "para",
            NodeKind::CharacterStyle => "char",
            NodeKind::Note => "note",
            NodeKind::Figure => "figure",
            NodeKind::Milestone => "ms",
            NodeKind::Other(name) => name,
        }
    }
}

/// One element of a `content` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text leaf
    Text(String),
    /// Nested marker node
    Node(UsjNode),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<UsjNode> for Content {
    fn from(node: UsjNode) -> Self {
        Content::Node(node)
    }
}

/// A marker node of the USJ tree
///
/// Attribute fields never carry translated text; the converter always tags
/// them as analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsjNode {
    /// Node type
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Marker name (e.g. "p", "v", "f", "xt")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Ordered children, in reading order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,

    /// Chapter or verse number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Start id (verses, chapters, milestones)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// End id (milestones)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altnumber: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubnumber: Option<String>,

    /// Note call-out symbol ("+", "-", or a literal caller)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Book code (e.g. "GEN")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Figure file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,

    /// Scripture reference target (figures, `ref` nodes)
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl UsjNode {
    /// Create a node with a kind and marker and no children or attributes
    pub fn new(kind: NodeKind, marker: &str) -> Self {
        Self {
            kind,
            marker: Some(marker.to_string()),
            content: Vec::new(),
            number: None,
            sid: None,
            eid: None,
            altnumber: None,
            pubnumber: None,
            caller: None,
            category: None,
            code: None,
            file: None,
            size: None,
            loc: None,
            copy: None,
            reference: None,
        }
    }

    /// Book node (`\id CODE`)
    pub fn book(code: &str) -> Self {
        let mut node = Self::new(NodeKind::Book, "id");
        node.code = Some(code.to_string());
        node
    }

    /// Chapter node (`\c N`)
    pub fn chapter(number: &str) -> Self {
        let mut node = Self::new(NodeKind::Chapter, "c");
        node.number = Some(number.to_string());
        node
    }

    /// Verse node (`\v N`)
    pub fn verse(number: &str) -> Self {
        let mut node = Self::new(NodeKind::Verse, "v");
        node.number = Some(number.to_string());
        node
    }

    /// Paragraph node with the given marker
    pub fn para(marker: &str) -> Self {
        Self::new(NodeKind::Paragraph, marker)
    }

    /// Character style node with the given marker
    pub fn char_style(marker: &str) -> Self {
        Self::new(NodeKind::CharacterStyle, marker)
    }

    /// Note container (`\f`, `\x`, ...) with a caller
    pub fn note(marker: &str, caller: &str) -> Self {
        let mut node = Self::new(NodeKind::Note, marker);
        node.caller = Some(caller.to_string());
        node
    }

    /// Append children, builder style
    pub fn with_content<I, C>(mut self, content: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        self.content.extend(content.into_iter().map(Into::into));
        self
    }

    /// Marker name, or "" when the node has none
    pub fn marker_str(&self) -> &str {
        self.marker.as_deref().unwrap_or("")
    }
}

/// Concatenate every text leaf under `content`, in document order
pub fn flatten_text(content: &[Content]) -> String {
    let mut out = String::new();
    collect_text(content, &mut out);
    out
}

fn collect_text(content: &[Content], out: &mut String) {
    for item in content {
        match item {
            Content::Text(text) => out.push_str(text),
            Content::Node(node) => collect_text(&node.content, out),
        }
    }
}
