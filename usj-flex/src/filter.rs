//! Optional-content filtering
//!
//! Removes whole subtrees for content categories the caller did not ask for
//! (footnotes, cross-references, introduction, remarks, figures) before the
//! tree is converted. Removal cascades through nested `content` arrays; text
//! leaves are never removed on their own.

use crate::markers::{classify, MarkerRole};
use crate::usj::{Content, NodeKind, UsjDocument, UsjNode};
use serde::{Deserialize, Serialize};

/// Which optional content categories to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Keep footnote containers (`\f`, `\fe`, `\ef`)
    pub include_footnotes: bool,

    /// Keep cross-reference containers and reference paragraphs
    pub include_cross_refs: bool,

    /// Keep book introduction paragraphs (first chapter only)
    pub include_intro: bool,

    /// Keep translator remarks (`\rem`)
    pub include_remarks: bool,

    /// Keep figures
    pub include_figures: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include_footnotes: false,
            include_cross_refs: false,
            include_intro: false,
            include_remarks: false,
            include_figures: true,
        }
    }
}

impl FilterOptions {
    /// Options that keep every category
    pub fn all() -> Self {
        Self {
            include_footnotes: true,
            include_cross_refs: true,
            include_intro: true,
            include_remarks: true,
            include_figures: true,
        }
    }
}

/// Filter a whole document
///
/// # Parameters
/// * `doc` - Source document (one chapter, or a whole book)
/// * `is_first_chapter` - Whether this is the first chapter of the exported
///   range; introduction content is only removed there
/// * `options` - Categories to keep
///
/// # Returns
/// * `UsjDocument` - A new document with disallowed subtrees removed
pub fn filter_document(
    doc: &UsjDocument,
    is_first_chapter: bool,
    options: &FilterOptions,
) -> UsjDocument {
    UsjDocument {
        doc_type: doc.doc_type.clone(),
        version: doc.version.clone(),
        content: filter_content(&doc.content, is_first_chapter, options),
    }
}

/// Filter a content list, recursing into surviving nodes
pub fn filter_content(
    content: &[Content],
    is_first_chapter: bool,
    options: &FilterOptions,
) -> Vec<Content> {
    content
        .iter()
        .filter_map(|item| match item {
            Content::Text(text) => Some(Content::Text(text.clone())),
            Content::Node(node) => {
                if should_drop(node, is_first_chapter, options) {
                    log::debug!(
                        "Filtered out {} node '{}'",
                        node.kind.as_str(),
                        node.marker_str()
                    );
                    None
                } else {
                    Some(Content::Node(filter_node(node, is_first_chapter, options)))
                }
            }
        })
        .collect()
}

fn filter_node(node: &UsjNode, is_first_chapter: bool, options: &FilterOptions) -> UsjNode {
    UsjNode {
        content: filter_content(&node.content, is_first_chapter, options),
        ..node.clone()
    }
}

/// Decide whether a node and its whole subtree are removed
fn should_drop(node: &UsjNode, is_first_chapter: bool, options: &FilterOptions) -> bool {
    let role = classify(node.marker_str());

    match role {
        MarkerRole::Footnote => !options.include_footnotes,
        MarkerRole::CrossReference | MarkerRole::Reference => !options.include_cross_refs,
        // Later chapters of a range are left alone even if a stray intro
        // marker shows up there.
        MarkerRole::Intro => is_first_chapter && !options.include_intro,
        MarkerRole::Remark => !options.include_remarks,
        MarkerRole::Figure => !options.include_figures,
        _ if node.kind == NodeKind::Figure => !options.include_figures,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usj::UsjNode;
    use pretty_assertions::assert_eq;

    fn footnote() -> UsjNode {
        UsjNode::note("f", "+").with_content([UsjNode::char_style("ft").with_content(["note text"])])
    }

    fn sample_chapter() -> UsjDocument {
        UsjDocument::new(vec![
            UsjNode::book("MAT").into(),
            UsjNode::para("ip").with_content(["Matthew wrote..."]).into(),
            UsjNode::para("rem").with_content(["check this"]).into(),
            UsjNode::chapter("5").into(),
            UsjNode::para("s1").with_content(["The Beatitudes"]).into(),
            UsjNode::para("r").with_content(["Luke 6:20-23"]).into(),
            UsjNode::para("p")
                .with_content(vec![
                    Content::from(UsjNode::verse("1")),
                    Content::from("Blessed"),
                    Content::from(footnote()),
                    Content::from(
                        UsjNode::note("x", "-")
                            .with_content([UsjNode::char_style("xt").with_content(["Luke 6:20"])]),
                    ),
                    Content::from(" are the poor"),
                ])
                .into(),
            UsjNode::new(NodeKind::Figure, "fig")
                .with_content(["The mount"])
                .into(),
        ])
    }

    fn markers(content: &[Content]) -> Vec<String> {
        let mut out = Vec::new();
        for item in content {
            if let Content::Node(node) = item {
                out.push(node.marker_str().to_string());
                out.extend(markers(&node.content));
            }
        }
        out
    }

    #[test]
    fn test_default_options_drop_optional_content() {
        // Act
        let filtered = filter_document(&sample_chapter(), true, &FilterOptions::default());

        // Assert: footnotes, cross-refs, references, intro and remarks gone; figure kept
        assert_eq!(
            markers(&filtered.content),
            vec!["id", "c", "s1", "p", "v", "fig"]
        );
    }

    #[test]
    fn test_all_options_keep_everything() {
        let doc = sample_chapter();

        let filtered = filter_document(&doc, true, &FilterOptions::all());

        assert_eq!(filtered, doc);
    }

    #[test]
    fn test_footnote_removed_entirely_from_nested_content() {
        // Arrange
        let doc = UsjDocument::new(vec![UsjNode::para("p")
            .with_content(vec![Content::from("text"), Content::from(footnote())])
            .into()]);

        // Act
        let filtered = filter_document(&doc, true, &FilterOptions::default());

        // Assert
        let Content::Node(para) = &filtered.content[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.content, vec![Content::from("text")]);
    }

    #[test]
    fn test_reference_paragraph_follows_cross_ref_flag() {
        let doc = UsjDocument::new(vec![UsjNode::para("r").with_content(["Matt 5:1-12"]).into()]);

        let dropped = filter_document(&doc, true, &FilterOptions::default());
        assert!(dropped.content.is_empty());

        let options = FilterOptions {
            include_cross_refs: true,
            ..FilterOptions::default()
        };
        let kept = filter_document(&doc, true, &options);
        assert_eq!(kept, doc);
    }

    #[test]
    fn test_intro_only_removed_from_first_chapter() {
        let doc = UsjDocument::new(vec![UsjNode::para("ip").with_content(["intro"]).into()]);
        let options = FilterOptions::default();

        assert!(filter_document(&doc, true, &options).content.is_empty());
        assert_eq!(filter_document(&doc, false, &options), doc);
    }

    #[test]
    fn test_figures_dropped_when_excluded() {
        let doc = sample_chapter();
        let options = FilterOptions {
            include_figures: false,
            ..FilterOptions::default()
        };

        let filtered = filter_document(&doc, true, &options);

        assert!(!markers(&filtered.content).contains(&"fig".to_string()));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let doc = sample_chapter();
        let option_sets = [
            FilterOptions::default(),
            FilterOptions::all(),
            FilterOptions {
                include_footnotes: true,
                include_figures: false,
                ..FilterOptions::default()
            },
        ];

        for options in option_sets {
            for first in [true, false] {
                let once = filter_document(&doc, first, &options);
                let twice = filter_document(&once, first, &options);
                assert_eq!(twice, once);
            }
        }
    }

    #[test]
    fn test_default_options_values() {
        let options = FilterOptions::default();
        assert!(!options.include_footnotes);
        assert!(!options.include_cross_refs);
        assert!(!options.include_intro);
        assert!(!options.include_remarks);
        assert!(options.include_figures);
    }
}
