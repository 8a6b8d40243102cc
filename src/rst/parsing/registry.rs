//! Ordered parser units
//!
//! The order of [NodeParser::ORDER] is the disambiguation policy. Explicit markup comes
//! first since `..` lines are never anything else; lists come before literal blocks and
//! blockquotes; sections and transitions come late because a marker line alone is also a
//! valid table border or paragraph. Paragraph is last and always matches.

use super::state::ParserState;
use super::{explicit, grid_table, lists, simple_table, text_blocks};
use crate::rst::ast::{NodeId, NodeType};
use crate::rst::error::{ParseError, ParserResult};
use std::fmt;
use tracing::debug;

/// One grammar-specific parser unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeParser {
    Directive,
    FootnoteDefGroup,
    CitationDefGroup,
    SubstitutionDef,
    HyperlinkTarget,
    Comment,
    BulletList,
    EnumeratedList,
    FieldList,
    OptionList,
    DefinitionList,
    LiteralBlock,
    LineBlock,
    BlockquoteAttribution,
    Blockquote,
    DoctestBlock,
    GridTable,
    SimpleTable,
    Section,
    Transition,
    Paragraph,
}

impl NodeParser {
    pub const ORDER: [NodeParser; 21] = [
        NodeParser::Directive,
        NodeParser::FootnoteDefGroup,
        NodeParser::CitationDefGroup,
        NodeParser::SubstitutionDef,
        NodeParser::HyperlinkTarget,
        NodeParser::Comment,
        NodeParser::BulletList,
        NodeParser::EnumeratedList,
        NodeParser::FieldList,
        NodeParser::OptionList,
        NodeParser::DefinitionList,
        NodeParser::LiteralBlock,
        NodeParser::LineBlock,
        NodeParser::BlockquoteAttribution,
        NodeParser::Blockquote,
        NodeParser::DoctestBlock,
        NodeParser::GridTable,
        NodeParser::SimpleTable,
        NodeParser::Section,
        NodeParser::Transition,
        NodeParser::Paragraph,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NodeParser::Directive => "directive",
            NodeParser::FootnoteDefGroup => "footnote-def-group",
            NodeParser::CitationDefGroup => "citation-group",
            NodeParser::SubstitutionDef => "substitution-def",
            NodeParser::HyperlinkTarget => "hyperlink-target",
            NodeParser::Comment => "comment",
            NodeParser::BulletList => "bullet-list",
            NodeParser::EnumeratedList => "enumerated-list",
            NodeParser::FieldList => "field-list",
            NodeParser::OptionList => "option-list",
            NodeParser::DefinitionList => "definition-list",
            NodeParser::LiteralBlock => "literal-block",
            NodeParser::LineBlock => "line-block",
            NodeParser::BlockquoteAttribution => "blockquote-attribution",
            NodeParser::Blockquote => "blockquote",
            NodeParser::DoctestBlock => "doctest-block",
            NodeParser::GridTable => "grid-table",
            NodeParser::SimpleTable => "simple-table",
            NodeParser::Section => "section",
            NodeParser::Transition => "transition",
            NodeParser::Paragraph => "paragraph",
        }
    }

    /// An attribution closes the blockquote it ends
    pub fn exits_body(&self) -> bool {
        matches!(self, NodeParser::BlockquoteAttribution)
    }

    /// Try this unit at the cursor. `Ok(None)` means the unit refused and consumed nothing.
    pub fn parse(
        &self,
        state: &mut ParserState<'_>,
        indent: usize,
        parent: NodeType,
        prev: Option<NodeId>,
    ) -> ParserResult<Option<NodeId>> {
        match self {
            NodeParser::Directive => explicit::parse_directive(state, indent),
            NodeParser::FootnoteDefGroup => explicit::parse_footnote_def_group(state, indent),
            NodeParser::CitationDefGroup => explicit::parse_citation_def_group(state, indent),
            NodeParser::SubstitutionDef => explicit::parse_substitution_def(state, indent),
            NodeParser::HyperlinkTarget => explicit::parse_hyperlink_target(state, indent),
            NodeParser::Comment => explicit::parse_comment(state, indent),
            NodeParser::BulletList => lists::parse_bullet_list(state, indent),
            NodeParser::EnumeratedList => lists::parse_enumerated_list(state, indent),
            NodeParser::FieldList => lists::parse_field_list(state, indent),
            NodeParser::OptionList => lists::parse_option_list(state, indent),
            NodeParser::DefinitionList => lists::parse_definition_list(state, indent),
            NodeParser::LiteralBlock => text_blocks::parse_literal_block(state, indent, prev),
            NodeParser::LineBlock => text_blocks::parse_line_block(state, indent),
            NodeParser::BlockquoteAttribution => {
                text_blocks::parse_blockquote_attribution(state, indent, parent)
            }
            NodeParser::Blockquote => text_blocks::parse_blockquote(state, indent),
            NodeParser::DoctestBlock => text_blocks::parse_doctest_block(state, indent),
            NodeParser::GridTable => grid_table::parse_grid_table(state, indent),
            NodeParser::SimpleTable => simple_table::parse_simple_table(state, indent),
            NodeParser::Section => text_blocks::parse_section(state, indent),
            NodeParser::Transition => text_blocks::parse_transition(state, indent),
            NodeParser::Paragraph => text_blocks::parse_paragraph(state, indent, parent).map(Some),
        }
    }
}

impl fmt::Display for NodeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offer the cursor to every unit in order; the first match wins.
///
/// Returns the new node and whether the enclosing body should end after it.
pub(crate) fn dispatch(
    state: &mut ParserState<'_>,
    indent: usize,
    parent: NodeType,
    prev: Option<NodeId>,
) -> ParserResult<(NodeId, bool)> {
    let line = state.cursor.line_idx();

    for parser in NodeParser::ORDER {
        let Some(node) = parser.parse(state, indent, parent, prev)? else {
            continue;
        };
        if state.cursor.line_idx() == line {
            return Err(state.internal_error(format!("{} matched without consuming input", parser)));
        }
        debug!(unit = parser.name(), line, indent, parent = %parent, "parser unit matched");
        return Ok((node, parser.exits_body()));
    }

    Err(Box::new(ParseError::NoParserMatched {
        line,
        text: state.cursor.peek(0).unwrap_or_default().to_string(),
    }))
}
