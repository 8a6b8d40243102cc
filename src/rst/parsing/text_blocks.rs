//! Text-bearing blocks: paragraphs, sections, transitions, literal and doctest blocks,
//! line blocks and blockquotes

use super::state::ParserState;
use crate::rst::ast::{DoctestBlock, LiteralBlock, NodeId, NodeKind, NodeType, Section, Span};
use crate::rst::error::ParserResult;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that may underline (and overline) a section title
pub const SECTION_CHARS: [char; 13] = [
    '=', '-', '`', ':', '.', '\'', '"', '~', '^', '_', '*', '+', '#',
];

fn marker_line_regex(min_repeat: usize) -> Regex {
    let alternatives: Vec<String> = SECTION_CHARS
        .iter()
        .map(|c| format!("{}{{{},}}", regex::escape(&c.to_string()), min_repeat))
        .collect();
    Regex::new(&format!("^(?:{})[ ]*$", alternatives.join("|"))).unwrap()
}

static SECTION_MARK_RE: Lazy<Regex> = Lazy::new(|| marker_line_regex(2));
static TRANSITION_MARK_RE: Lazy<Regex> = Lazy::new(|| marker_line_regex(4));

static CONTENT_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S").unwrap());
static QUOTED_LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ ]*)>+(?: .+)?$").unwrap());
static DOCTEST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ ]*)>>> (.+)$").unwrap());
static ATTRIBUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ ]*)(?P<marker>---?[ ]+)(?P<text>.+)$").unwrap());
static LINE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ ]*)\|(?: (?P<indent> *)(?P<text>.+))?$").unwrap());

/// Catch-all: consecutive content lines
pub(crate) fn parse_paragraph(
    state: &mut ParserState<'_>,
    indent: usize,
    parent: NodeType,
) -> ParserResult<NodeId> {
    let start = state.cursor.line_idx();
    let text = state.parse_body_text(indent, parent, Some(&CONTENT_LINE_RE))?;
    let span = Span::new(start, state.cursor.line_idx());
    let children = state.parse_inline(&text, span);
    Ok(state.register(NodeKind::Paragraph, span, children))
}

struct SectionTitle {
    text: String,
    marker: char,
    has_overline: bool,
    lines: usize,
}

fn peek_section_title(state: &ParserState<'_>) -> Option<SectionTitle> {
    let cursor = &state.cursor;
    if cursor.peek_matches(&SECTION_MARK_RE, 0) && cursor.peek_matches(&SECTION_MARK_RE, 2) {
        let overline = cursor.peek(0)?;
        let text = cursor.peek(1)?;
        let underline = cursor.peek(2)?;
        if overline != underline {
            return None;
        }
        return Some(SectionTitle {
            text: text.trim().to_string(),
            marker: underline.chars().next()?,
            has_overline: true,
            lines: 3,
        });
    }

    if cursor.peek_matches(&SECTION_MARK_RE, 1) {
        let text = cursor.peek(0)?;
        let underline = cursor.peek(1)?;
        return Some(SectionTitle {
            text: text.trim().to_string(),
            marker: underline.chars().next()?,
            has_overline: false,
            lines: 2,
        });
    }

    None
}

/// Title plus underline, optionally with a matching overline
pub(crate) fn parse_section(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) {
        return Ok(None);
    }
    let Some(title) = peek_section_title(state) else {
        return Ok(None);
    };

    state.cursor.advance(title.lines)?;
    let end = state.cursor.line_idx();

    let title_line = start + usize::from(title.has_overline);
    let children = state.parse_inline(&title.text, Span::new(title_line, title_line + 1));
    let level = state.register_section_marker(title.marker);

    Ok(Some(state.register(
        NodeKind::Section(Section { level }),
        Span::new(start, end),
        children,
    )))
}

pub(crate) fn parse_transition(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) || !state.cursor.peek_matches(&TRANSITION_MARK_RE, 0) {
        return Ok(None);
    }
    state.cursor.consume()?;
    Ok(Some(state.register(
        NodeKind::Transition,
        Span::new(start, state.cursor.line_idx()),
        Vec::new(),
    )))
}

/// Whether `node` is a paragraph whose trailing text ends in `::`
fn introduces_literal_block(state: &ParserState<'_>, node: NodeId) -> bool {
    let registrar = state.registrar();
    let Some(paragraph) = registrar.get(node) else {
        return false;
    };
    if paragraph.node_type() != NodeType::Paragraph {
        return false;
    }
    paragraph
        .children()
        .last()
        .and_then(|last| registrar.get(*last))
        .filter(|last| last.node_type() == NodeType::Text)
        .and_then(|last| last.kind().inline_text())
        .is_some_and(|text| text.ends_with("::"))
}

/// Indented or quoted block after a paragraph ending in `::`
pub(crate) fn parse_literal_block(
    state: &mut ParserState<'_>,
    indent: usize,
    prev: Option<NodeId>,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !prev.is_some_and(|p| introduces_literal_block(state, p)) {
        return Ok(None);
    }

    let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
    let text = if state.cursor.peek_is_at_least_indented(body_indent, 0) {
        state.parse_body_text(body_indent, NodeType::LiteralBlock, None)?
    } else if state.cursor.peek_is_indented(indent, 0)
        && state.cursor.peek_matches(&QUOTED_LITERAL_RE, 0)
    {
        state.parse_body_text(indent, NodeType::LiteralBlock, Some(&QUOTED_LITERAL_RE))?
    } else {
        return Ok(None);
    };

    Ok(Some(state.register(
        NodeKind::LiteralBlock(LiteralBlock { text }),
        Span::new(start, state.cursor.line_idx()),
        Vec::new(),
    )))
}

pub(crate) fn parse_line_block(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    parse_line_block_at(state, indent, 0)
}

/// `line_block_indent` is the indent after the `|`, which nests line blocks without
/// changing the line's own indent.
fn parse_line_block_at(
    state: &mut ParserState<'_>,
    indent: usize,
    line_block_indent: usize,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) || !state.cursor.peek_matches(&LINE_BLOCK_RE, 0) {
        return Ok(None);
    }

    let mut lines = Vec::new();
    while state.cursor.peek_indent_size(0) >= indent {
        let Some((inner_indent, text)) = state.cursor.peek_test(&LINE_BLOCK_RE, 0).map(|caps| {
            (
                caps.name("indent").map_or(0, |m| m.as_str().len()),
                caps.name("text").map_or("", |m| m.as_str()).to_string(),
            )
        }) else {
            break;
        };
        if inner_indent < line_block_indent {
            break;
        }

        if inner_indent >= line_block_indent + state.opts().input_indent_size {
            let nested = parse_line_block_at(state, indent, inner_indent)?
                .ok_or_else(|| state.internal_error("nested line block did not parse"))?;
            lines.push(nested);
            continue;
        }

        state.cursor.consume()?;
        let line = state.cursor.line_idx() - 1;
        let span = Span::line(line);
        let children = state.parse_inline(&text, span);
        lines.push(state.register(NodeKind::LineBlockLine, span, children));
    }

    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(
        NodeKind::LineBlock,
        Span::new(start, state.cursor.line_idx()),
        lines,
    )))
}

/// `-- name` closing a blockquote
pub(crate) fn parse_blockquote_attribution(
    state: &mut ParserState<'_>,
    indent: usize,
    parent: NodeType,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if parent != NodeType::Blockquote || !state.cursor.peek_is_indented(indent, 0) {
        return Ok(None);
    }
    let Some((marker_len, first_line)) = state
        .cursor
        .peek_test(&ATTRIBUTION_RE, 0)
        .map(|caps| (caps["marker"].len(), caps["text"].to_string()))
    else {
        return Ok(None);
    };

    state.cursor.consume()?;
    let text = state.parse_init_content_text(indent + marker_len, &first_line, true)?;
    let span = Span::new(start, state.cursor.line_idx());
    let children = state.parse_inline(&text, span);
    Ok(Some(state.register(NodeKind::BlockquoteAttribution, span, children)))
}

/// Body indented one step deeper than the current block
pub(crate) fn parse_blockquote(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let body_indent = indent + state.opts().input_indent_size;
    if !state.cursor.peek_is_at_least_indented(body_indent, 0) {
        return Ok(None);
    }
    let children = state.parse_body_nodes(body_indent, NodeType::Blockquote, Vec::new())?;
    Ok(Some(state.register(
        NodeKind::Blockquote,
        Span::new(start, state.cursor.line_idx()),
        children,
    )))
}

/// `>>> ` session up to the next blank line
pub(crate) fn parse_doctest_block(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_matches(&DOCTEST_RE, 0) {
        return Ok(None);
    }
    let text = state.parse_body_text(indent, NodeType::DoctestBlock, Some(&CONTENT_LINE_RE))?;
    Ok(Some(state.register(
        NodeKind::DoctestBlock(DoctestBlock { text }),
        Span::new(start, state.cursor.line_idx()),
        Vec::new(),
    )))
}
