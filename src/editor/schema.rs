//! Document schema: the closed set of node and mark types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::model::Document;

/// A formatting attribute that can be attached to inline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
}

impl MarkType {
    /// Every mark type, in toolbar order.
    pub const ALL: [Self; 3] = [Self::Bold, Self::Italic, Self::Underline];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Bold => 0b001,
            Self::Italic => 0b010,
            Self::Underline => 0b100,
        }
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mark| mark.name() == s)
            .ok_or_else(|| SchemaError::UnknownMark(s.to_string()))
    }
}

/// A set of marks. Membership only; no ordering or duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(u8);

impl MarkSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, mark: MarkType) -> bool {
        self.0 & mark.bit() != 0
    }

    #[must_use]
    pub const fn with(self, mark: MarkType) -> Self {
        Self(self.0 | mark.bit())
    }

    #[must_use]
    pub const fn without(self, mark: MarkType) -> Self {
        Self(self.0 & !mark.bit())
    }

    #[must_use]
    pub const fn toggled(self, mark: MarkType) -> Self {
        Self(self.0 ^ mark.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.iter().count()
    }

    /// Marks in the set, in [`MarkType::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = MarkType> {
        MarkType::ALL
            .into_iter()
            .filter(move |mark| self.contains(*mark))
    }
}

impl FromIterator<MarkType> for MarkSet {
    fn from_iter<I: IntoIterator<Item = MarkType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for MarkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(MarkType::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Node types allowed in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Doc,
    Paragraph,
    Text,
}

impl NodeType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
        }
    }
}

/// Errors raised while validating content against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{node} requires content matching `{expected}`")]
    InvalidContent {
        node: &'static str,
        expected: &'static str,
    },
    #[error("empty text run in paragraph {block}")]
    EmptyTextRun { block: usize },
    #[error("adjacent text runs with identical marks in paragraph {block}")]
    UnmergedRuns { block: usize },
    #[error("unknown mark type `{0}`")]
    UnknownMark(String),
}

/// Content rule for a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub node: NodeType,
    /// Content expression, e.g. `block+`.
    pub content: &'static str,
}

/// The editor schema: `doc` holds `block+`, `paragraph` holds `text*`,
/// and text may carry any of the three marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    nodes: [NodeSpec; 3],
    marks: MarkSet,
}

impl Schema {
    pub fn new() -> Self {
        Self {
            nodes: [
                NodeSpec {
                    node: NodeType::Doc,
                    content: "block+",
                },
                NodeSpec {
                    node: NodeType::Paragraph,
                    content: "text*",
                },
                NodeSpec {
                    node: NodeType::Text,
                    content: "",
                },
            ],
            marks: MarkType::ALL.into_iter().collect(),
        }
    }

    pub const fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub const fn marks(&self) -> MarkSet {
        self.marks
    }

    pub fn node_spec(&self, node: NodeType) -> Option<&NodeSpec> {
        self.nodes.iter().find(|spec| spec.node == node)
    }

    pub fn mark(&self, name: &str) -> Result<MarkType, SchemaError> {
        let mark = name.parse::<MarkType>()?;
        if self.marks.contains(mark) {
            Ok(mark)
        } else {
            Err(SchemaError::UnknownMark(name.to_string()))
        }
    }

    /// Validate a document against the content rules and run normalization.
    ///
    /// # Errors
    ///
    /// Returns the first rule the document violates.
    pub fn check(&self, doc: &Document) -> Result<(), SchemaError> {
        if doc.blocks().is_empty() {
            return Err(SchemaError::InvalidContent {
                node: NodeType::Doc.name(),
                expected: self.content_of(NodeType::Doc),
            });
        }
        for (block, paragraph) in doc.blocks().iter().enumerate() {
            let mut prev = None;
            for run in paragraph.runs() {
                if run.text().is_empty() {
                    return Err(SchemaError::EmptyTextRun { block });
                }
                if prev == Some(run.marks()) {
                    return Err(SchemaError::UnmergedRuns { block });
                }
                if run.marks().iter().any(|mark| !self.marks.contains(mark)) {
                    return Err(SchemaError::UnknownMark(run.marks().to_string()));
                }
                prev = Some(run.marks());
            }
        }
        Ok(())
    }

    fn content_of(&self, node: NodeType) -> &'static str {
        self.node_spec(node).map_or("", |spec| spec.content)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::{Paragraph, TextRun};

    #[test]
    fn test_mark_names_round_trip_through_from_str() {
        for mark in MarkType::ALL {
            assert_eq!(mark.name().parse::<MarkType>(), Ok(mark));
        }
        assert_eq!(
            "strike".parse::<MarkType>(),
            Err(SchemaError::UnknownMark("strike".to_string()))
        );
    }

    #[test]
    fn test_mark_set_has_no_duplicates() {
        let set = MarkSet::EMPTY.with(MarkType::Bold).with(MarkType::Bold);
        assert_eq!(set.len(), 1);
        assert!(set.contains(MarkType::Bold));
        assert!(!set.contains(MarkType::Italic));
    }

    #[test]
    fn test_mark_set_toggled_flips_one_mark() {
        let set = MarkSet::EMPTY.with(MarkType::Italic);
        let flipped = set.toggled(MarkType::Bold);
        assert!(flipped.contains(MarkType::Bold));
        assert!(flipped.contains(MarkType::Italic));
        assert_eq!(flipped.toggled(MarkType::Bold), set);
    }

    #[test]
    fn test_mark_set_display_lists_names_in_order() {
        let set: MarkSet = [MarkType::Underline, MarkType::Bold].into_iter().collect();
        assert_eq!(set.to_string(), "{bold, underline}");
        assert_eq!(MarkSet::EMPTY.to_string(), "{}");
    }

    #[test]
    fn test_schema_has_exactly_three_nodes_and_marks() {
        let schema = Schema::new();
        let names: Vec<&str> = schema.nodes().iter().map(|s| s.node.name()).collect();
        assert_eq!(names, vec!["doc", "paragraph", "text"]);
        assert_eq!(schema.marks().len(), 3);
        assert_eq!(schema.mark("italic"), Ok(MarkType::Italic));
    }

    #[test]
    fn test_check_accepts_seeded_document() {
        let schema = Schema::new();
        assert_eq!(schema.check(&Document::from_seed("Hello")), Ok(()));
        assert_eq!(schema.check(&Document::from_seed("")), Ok(()));
    }

    #[test]
    fn test_check_rejects_empty_doc() {
        let schema = Schema::new();
        let doc = Document::from_blocks_unchecked(Vec::new());
        assert_eq!(
            schema.check(&doc),
            Err(SchemaError::InvalidContent {
                node: "doc",
                expected: "block+",
            })
        );
    }

    #[test]
    fn test_check_rejects_unmerged_runs() {
        let schema = Schema::new();
        let paragraph = Paragraph::from_runs_unchecked(vec![
            TextRun::new("a", MarkSet::EMPTY),
            TextRun::new("b", MarkSet::EMPTY),
        ]);
        let doc = Document::from_blocks_unchecked(vec![paragraph]);
        assert_eq!(
            schema.check(&doc),
            Err(SchemaError::UnmergedRuns { block: 0 })
        );
    }
}
