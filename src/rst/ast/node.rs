//! The node envelope, node identity and the closed set of node kinds

use super::elements::{
    CitationDef, Comment, DefinitionListItem, Directive, DoctestBlock, DocumentRoot,
    EnumeratedList, FieldListItem, FootnoteDef, HyperlinkRef, HyperlinkTarget, InlineText,
    InterpretedText, ListItem, LiteralBlock, OptionListItem, Section, SubstitutionDef, Table,
    TableCell, TableRow,
};
use super::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node, assigned once by the [Registrar](super::Registrar).
///
/// Ids are 1-based and strictly increasing in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    pub(crate) fn index(self) -> usize {
        self.0 - 1
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload-free discriminant of [NodeKind]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Document,
    Section,
    Transition,
    Paragraph,
    Blockquote,
    BlockquoteAttribution,
    LiteralBlock,
    DoctestBlock,
    LineBlock,
    LineBlockLine,
    BulletList,
    BulletListItem,
    EnumeratedList,
    EnumeratedListItem,
    FieldList,
    FieldListItem,
    OptionList,
    OptionListItem,
    DefinitionList,
    DefinitionListItem,
    Table,
    TableRow,
    TableCell,
    Directive,
    SubstitutionDef,
    FootnoteDefGroup,
    FootnoteDef,
    CitationDefGroup,
    CitationDef,
    HyperlinkTarget,
    Comment,
    Text,
    Emphasis,
    StrongEmphasis,
    InlineLiteral,
    InterpretedText,
    SubstitutionRef,
    FootnoteRef,
    CitationRef,
    HyperlinkRef,
    InlineInternalTarget,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Document => "Document",
            NodeType::Section => "Section",
            NodeType::Transition => "Transition",
            NodeType::Paragraph => "Paragraph",
            NodeType::Blockquote => "Blockquote",
            NodeType::BlockquoteAttribution => "BlockquoteAttribution",
            NodeType::LiteralBlock => "LiteralBlock",
            NodeType::DoctestBlock => "DoctestBlock",
            NodeType::LineBlock => "LineBlock",
            NodeType::LineBlockLine => "LineBlockLine",
            NodeType::BulletList => "BulletList",
            NodeType::BulletListItem => "BulletListItem",
            NodeType::EnumeratedList => "EnumeratedList",
            NodeType::EnumeratedListItem => "EnumeratedListItem",
            NodeType::FieldList => "FieldList",
            NodeType::FieldListItem => "FieldListItem",
            NodeType::OptionList => "OptionList",
            NodeType::OptionListItem => "OptionListItem",
            NodeType::DefinitionList => "DefinitionList",
            NodeType::DefinitionListItem => "DefinitionListItem",
            NodeType::Table => "Table",
            NodeType::TableRow => "TableRow",
            NodeType::TableCell => "TableCell",
            NodeType::Directive => "Directive",
            NodeType::SubstitutionDef => "SubstitutionDef",
            NodeType::FootnoteDefGroup => "FootnoteDefGroup",
            NodeType::FootnoteDef => "FootnoteDef",
            NodeType::CitationDefGroup => "CitationDefGroup",
            NodeType::CitationDef => "CitationDef",
            NodeType::HyperlinkTarget => "HyperlinkTarget",
            NodeType::Comment => "Comment",
            NodeType::Text => "Text",
            NodeType::Emphasis => "Emphasis",
            NodeType::StrongEmphasis => "StrongEmphasis",
            NodeType::InlineLiteral => "InlineLiteral",
            NodeType::InterpretedText => "InterpretedText",
            NodeType::SubstitutionRef => "SubstitutionRef",
            NodeType::FootnoteRef => "FootnoteRef",
            NodeType::CitationRef => "CitationRef",
            NodeType::HyperlinkRef => "HyperlinkRef",
            NodeType::InlineInternalTarget => "InlineInternalTarget",
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeType::Text
                | NodeType::Emphasis
                | NodeType::StrongEmphasis
                | NodeType::InlineLiteral
                | NodeType::InterpretedText
                | NodeType::SubstitutionRef
                | NodeType::FootnoteRef
                | NodeType::CitationRef
                | NodeType::HyperlinkRef
                | NodeType::InlineInternalTarget
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            NodeType::BulletList
                | NodeType::EnumeratedList
                | NodeType::FieldList
                | NodeType::OptionList
                | NodeType::DefinitionList
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node-kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document(DocumentRoot),
    Section(Section),
    Transition,
    Paragraph,
    Blockquote,
    BlockquoteAttribution,
    LiteralBlock(LiteralBlock),
    DoctestBlock(DoctestBlock),
    LineBlock,
    LineBlockLine,
    BulletList,
    BulletListItem(ListItem),
    EnumeratedList(EnumeratedList),
    EnumeratedListItem(ListItem),
    FieldList,
    FieldListItem(FieldListItem),
    OptionList,
    OptionListItem(OptionListItem),
    DefinitionList,
    DefinitionListItem(DefinitionListItem),
    Table(Table),
    TableRow(TableRow),
    TableCell(TableCell),
    Directive(Directive),
    SubstitutionDef(SubstitutionDef),
    FootnoteDefGroup,
    FootnoteDef(FootnoteDef),
    CitationDefGroup,
    CitationDef(CitationDef),
    HyperlinkTarget(HyperlinkTarget),
    Comment(Comment),
    Text(InlineText),
    Emphasis(InlineText),
    StrongEmphasis(InlineText),
    InlineLiteral(InlineText),
    InterpretedText(InterpretedText),
    SubstitutionRef(InlineText),
    FootnoteRef(InlineText),
    CitationRef(InlineText),
    HyperlinkRef(HyperlinkRef),
    InlineInternalTarget(InlineText),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document(_) => NodeType::Document,
            NodeKind::Section(_) => NodeType::Section,
            NodeKind::Transition => NodeType::Transition,
            NodeKind::Paragraph => NodeType::Paragraph,
            NodeKind::Blockquote => NodeType::Blockquote,
            NodeKind::BlockquoteAttribution => NodeType::BlockquoteAttribution,
            NodeKind::LiteralBlock(_) => NodeType::LiteralBlock,
            NodeKind::DoctestBlock(_) => NodeType::DoctestBlock,
            NodeKind::LineBlock => NodeType::LineBlock,
            NodeKind::LineBlockLine => NodeType::LineBlockLine,
            NodeKind::BulletList => NodeType::BulletList,
            NodeKind::BulletListItem(_) => NodeType::BulletListItem,
            NodeKind::EnumeratedList(_) => NodeType::EnumeratedList,
            NodeKind::EnumeratedListItem(_) => NodeType::EnumeratedListItem,
            NodeKind::FieldList => NodeType::FieldList,
            NodeKind::FieldListItem(_) => NodeType::FieldListItem,
            NodeKind::OptionList => NodeType::OptionList,
            NodeKind::OptionListItem(_) => NodeType::OptionListItem,
            NodeKind::DefinitionList => NodeType::DefinitionList,
            NodeKind::DefinitionListItem(_) => NodeType::DefinitionListItem,
            NodeKind::Table(_) => NodeType::Table,
            NodeKind::TableRow(_) => NodeType::TableRow,
            NodeKind::TableCell(_) => NodeType::TableCell,
            NodeKind::Directive(_) => NodeType::Directive,
            NodeKind::SubstitutionDef(_) => NodeType::SubstitutionDef,
            NodeKind::FootnoteDefGroup => NodeType::FootnoteDefGroup,
            NodeKind::FootnoteDef(_) => NodeType::FootnoteDef,
            NodeKind::CitationDefGroup => NodeType::CitationDefGroup,
            NodeKind::CitationDef(_) => NodeType::CitationDef,
            NodeKind::HyperlinkTarget(_) => NodeType::HyperlinkTarget,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Emphasis(_) => NodeType::Emphasis,
            NodeKind::StrongEmphasis(_) => NodeType::StrongEmphasis,
            NodeKind::InlineLiteral(_) => NodeType::InlineLiteral,
            NodeKind::InterpretedText(_) => NodeType::InterpretedText,
            NodeKind::SubstitutionRef(_) => NodeType::SubstitutionRef,
            NodeKind::FootnoteRef(_) => NodeType::FootnoteRef,
            NodeKind::CitationRef(_) => NodeType::CitationRef,
            NodeKind::HyperlinkRef(_) => NodeType::HyperlinkRef,
            NodeKind::InlineInternalTarget(_) => NodeType::InlineInternalTarget,
        }
    }

    /// Text of an inline leaf, with escapes removed. `None` for block kinds.
    pub fn inline_text(&self) -> Option<String> {
        match self {
            NodeKind::Text(t)
            | NodeKind::Emphasis(t)
            | NodeKind::StrongEmphasis(t)
            | NodeKind::SubstitutionRef(t)
            | NodeKind::FootnoteRef(t)
            | NodeKind::CitationRef(t)
            | NodeKind::InlineInternalTarget(t) => Some(t.text()),
            // Literals keep their backslashes
            NodeKind::InlineLiteral(t) => Some(t.raw.clone()),
            NodeKind::InterpretedText(t) => Some(t.text()),
            NodeKind::HyperlinkRef(r) => Some(r.label.clone()),
            _ => None,
        }
    }
}

/// A registered node: shared envelope around a [NodeKind]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) nth_of_type: usize,
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) retired: bool,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// 1-based position of this node among all registered nodes of its type
    pub fn nth_of_type(&self) -> usize {
        self.nth_of_type
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Retired nodes were replaced by the list merge step and are no longer in the tree
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_one_based() {
        let id = NodeId::from_index(0);
        assert_eq!(id.get(), 1);
        assert_eq!(id.index(), 0);
        assert_eq!(id.to_string(), "#1");
    }

    #[test]
    fn test_node_type_names() {
        assert_eq!(NodeType::FootnoteRef.to_string(), "FootnoteRef");
        assert_eq!(
            NodeKind::Text(InlineText::new("a")).node_type(),
            NodeType::Text
        );
        assert!(NodeType::HyperlinkRef.is_inline());
        assert!(!NodeType::Paragraph.is_inline());
        assert!(NodeType::OptionList.is_list());
    }

    #[test]
    fn test_inline_text_removes_escapes_except_literal() {
        let text = NodeKind::Text(InlineText::new(r"a\*b"));
        assert_eq!(text.inline_text().as_deref(), Some("a*b"));

        let literal = NodeKind::InlineLiteral(InlineText::new(r"a\*b"));
        assert_eq!(literal.inline_text().as_deref(), Some(r"a\*b"));

        assert_eq!(NodeKind::Paragraph.inline_text(), None);
    }
}
