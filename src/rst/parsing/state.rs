//! Parser state shared by every parser unit
//!
//! A [ParserState] owns the line cursor for one (sub-)document and borrows the arena it
//! registers nodes into. Body helpers here implement the loops every container construct
//! shares: collect blocks at an indent, collect raw text at an indent, and read the
//! "init content" that follows an explicit-markup or list marker.

use super::lists::is_field_marker;
use super::merge::merge_sequential_lists;
use super::registry;
use crate::rst::ast::{NodeId, NodeKind, NodeType, Registrar, Span};
use crate::rst::config::ParserOptions;
use crate::rst::error::{ParseError, ParserResult};
use crate::rst::inlines::{InlineNode, InlineParser, RoleValidator};
use crate::rst::lexing::{is_blank, split_lines, strip_columns, trim_common_indent, LineCursor};
use once_cell::sync::Lazy;
use regex::Regex;

/// A lone `..` ends the enclosing body when followed by a blank line
static EMPTY_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *\.\.$").unwrap());

static EXPLICIT_MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *\.\. +").unwrap());

pub struct ParserState<'a> {
    registrar: &'a mut Registrar,
    opts: &'a ParserOptions,
    validators: &'a [RoleValidator],
    pub cursor: LineCursor,
    section_markers: Vec<char>,
}

impl<'a> ParserState<'a> {
    pub fn new(
        registrar: &'a mut Registrar,
        opts: &'a ParserOptions,
        validators: &'a [RoleValidator],
        lines: Vec<String>,
        line_offset: usize,
    ) -> Self {
        Self {
            registrar,
            opts,
            validators,
            cursor: LineCursor::new(lines, line_offset),
            section_markers: Vec::new(),
        }
    }

    pub fn opts(&self) -> &ParserOptions {
        self.opts
    }

    pub fn registrar(&self) -> &Registrar {
        self.registrar
    }

    pub fn register(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        self.registrar.register(kind, span, children)
    }

    pub(crate) fn registrar_mut(&mut self) -> &mut Registrar {
        self.registrar
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.registrar.get(id).map(|n| n.node_type())
    }

    /// 1-based section level of an underline character, in order of first use
    pub fn register_section_marker(&mut self, marker: char) -> usize {
        match self.section_markers.iter().position(|m| *m == marker) {
            Some(idx) => idx + 1,
            None => {
                self.section_markers.push(marker);
                self.section_markers.len()
            }
        }
    }

    fn at_nested_exit(&self, indent: usize, parent: NodeType) -> bool {
        parent != NodeType::Document && self.cursor.peek_indent_size(0) < indent
    }

    fn at_empty_comment(&self, parent: NodeType) -> bool {
        parent != NodeType::Document
            && self.cursor.peek_matches(&EMPTY_COMMENT_RE, 0)
            && self.cursor.peek_is_blank(1)
    }

    /// Parse blocks at `indent` until the body ends.
    ///
    /// Inside a container the body ends at a line indented less than `indent` or at an
    /// empty comment (which is consumed). `init` nodes are placed ahead of the parsed ones,
    /// and adjacent compatible lists are merged before returning.
    pub fn parse_body_nodes(
        &mut self,
        indent: usize,
        parent: NodeType,
        init: Vec<NodeId>,
    ) -> ParserResult<Vec<NodeId>> {
        let mut nodes = init;

        loop {
            self.cursor.consume_all_blank_lines();
            if !self.cursor.can_consume(0) {
                break;
            }
            if self.at_empty_comment(parent) {
                self.cursor.consume()?;
                break;
            }
            if self.at_nested_exit(indent, parent) {
                break;
            }

            let prev = nodes.last().copied();
            let (node, exits_body) = registry::dispatch(self, indent, parent, prev)?;
            nodes.push(node);
            if exits_body {
                break;
            }
        }

        Ok(merge_sequential_lists(self.registrar, nodes))
    }

    /// Collect raw text at `indent`, keeping interior blank lines.
    ///
    /// `line_re`, when given, must match the next line for collection to continue.
    /// Leading and trailing blank lines are dropped from the result.
    pub fn parse_body_text(
        &mut self,
        indent: usize,
        parent: NodeType,
        line_re: Option<&Regex>,
    ) -> ParserResult<String> {
        let mut text = String::new();

        loop {
            if let Some(re) = line_re {
                if !self.cursor.peek_matches(re, 0) {
                    break;
                }
            }
            while self.cursor.peek_is_blank(0) {
                text.push('\n');
                self.cursor.consume()?;
            }
            if !self.cursor.can_consume(0) {
                break;
            }
            if self.at_empty_comment(parent) {
                self.cursor.consume()?;
                break;
            }
            if self.at_nested_exit(indent, parent) {
                break;
            }

            let line = self.cursor.consume()?;
            text.push('\n');
            text.push_str(strip_columns(&line, indent));
        }

        Ok(text.trim_matches('\n').to_string())
    }

    /// Text of a marker's first line plus any lines continuing it.
    ///
    /// The second line continues the first unless it is blank, a field marker or other
    /// explicit markup. Continuation lines must be indented at least `nested_indent`.
    pub fn parse_init_content_text(
        &mut self,
        nested_indent: usize,
        first_line: &str,
        preserve_line_breaks: bool,
    ) -> ParserResult<String> {
        let continues = self.cursor.peek(0).is_some_and(|line| {
            !is_blank(line) && !is_field_marker(line) && !EXPLICIT_MARKUP_RE.is_match(line)
        });

        let mut text = first_line.to_string();
        if continues {
            while self.cursor.peek_is_content(0)
                && self.cursor.peek_is_at_least_indented(nested_indent, 0)
            {
                let line = self.cursor.consume()?;
                if preserve_line_breaks {
                    text.push('\n');
                }
                text.push_str(strip_columns(&line, nested_indent));
            }
        }

        Ok(text.trim_matches('\n').to_string())
    }

    /// Init content parsed as blocks; see [Self::parse_init_content_text]
    pub fn parse_init_content(
        &mut self,
        nested_indent: usize,
        first_line: &str,
        start_line: usize,
    ) -> ParserResult<Vec<NodeId>> {
        let text = self.parse_init_content_text(nested_indent, first_line, true)?;
        self.cursor.consume_all_blank_lines();
        self.parse_nested(&text, start_line)
    }

    /// Parse `input` as a document of its own whose first line is `start_line`.
    ///
    /// The text is trimmed of its common indent first. Nodes land in the same arena and
    /// are returned unattached, ready to become children of the caller's node.
    pub fn parse_nested(&mut self, input: &str, start_line: usize) -> ParserResult<Vec<NodeId>> {
        let leading_blank = input.split('\n').take_while(|l| is_blank(l)).count();
        let lines = split_lines(&trim_common_indent(input));
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let mut sub = ParserState::new(
            &mut *self.registrar,
            self.opts,
            self.validators,
            lines,
            start_line + leading_blank,
        );
        sub.parse_body_nodes(0, NodeType::Document, Vec::new())
    }

    fn inline_parser(&self) -> InlineParser<'a> {
        InlineParser::new(self.opts).with_role_validators(self.validators)
    }

    /// Parse and register the inline nodes of `text`, all sharing `span`'s lines
    pub fn parse_inline(&mut self, text: &str, span: Span) -> Vec<NodeId> {
        let nodes = self.inline_parser().parse(text);
        self.register_inline(nodes, span)
    }

    /// Like [Self::parse_inline], split into groups at `delimiter`
    pub fn parse_inline_groups(&mut self, text: &str, span: Span, delimiter: &str) -> Vec<Vec<NodeId>> {
        let groups = self.inline_parser().parse_with_delimiter(text, delimiter);
        groups
            .into_iter()
            .map(|group| self.register_inline(group, span))
            .collect()
    }

    fn register_inline(&mut self, nodes: Vec<InlineNode>, span: Span) -> Vec<NodeId> {
        nodes
            .into_iter()
            .map(|node| {
                self.registrar
                    .register(node.kind, span.with_columns(node.start, node.end), Vec::new())
            })
            .collect()
    }

    pub(crate) fn internal_error(&self, message: impl Into<String>) -> Box<ParseError> {
        ParseError::internal(self.cursor.line_idx(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_state<T>(text: &str, f: impl FnOnce(&mut ParserState<'_>) -> T) -> T {
        let opts = ParserOptions::default();
        let mut registrar = Registrar::new();
        let mut state = ParserState::new(&mut registrar, &opts, &[], split_lines(text), 0);
        f(&mut state)
    }

    #[test]
    fn test_section_markers_are_numbered_by_first_use() {
        with_state("", |state| {
            assert_eq!(state.register_section_marker('='), 1);
            assert_eq!(state.register_section_marker('-'), 2);
            assert_eq!(state.register_section_marker('='), 1);
        });
    }

    #[test]
    fn test_body_text_keeps_inner_blank_lines() {
        let text = with_state("    a\n\n    b\n\nc", |state| {
            state
                .parse_body_text(4, NodeType::LiteralBlock, None)
                .unwrap()
        });
        assert_eq!(text, "a\n\nb");
    }

    #[test]
    fn test_body_text_stops_at_empty_comment() {
        with_state("    a\n    ..\n\n    b", |state| {
            let text = state
                .parse_body_text(4, NodeType::LiteralBlock, None)
                .unwrap();
            assert_eq!(text, "a");
            assert_eq!(state.cursor.peek(0), Some(""));
        });
    }

    #[test]
    fn test_init_content_text_continuation() {
        with_state("  second\n  third\n\n  body", |state| {
            let text = state.parse_init_content_text(2, "first", true).unwrap();
            assert_eq!(text, "first\nsecond\nthird");
        });
        with_state("  :field: x", |state| {
            let text = state.parse_init_content_text(2, "first", true).unwrap();
            assert_eq!(text, "first");
            assert_eq!(state.cursor.line_idx(), 0);
        });
    }

    #[test]
    fn test_init_content_without_line_breaks() {
        with_state("   https://example.org/\n   long/path", |state| {
            let text = state.parse_init_content_text(3, "", false).unwrap();
            assert_eq!(text, "https://example.org/long/path");
        });
    }

    #[test]
    fn test_nested_parse_offsets_lines() {
        with_state("", |state| {
            let nodes = state.parse_nested("\n  para one\n\n  para two\n", 10).unwrap();
            assert_eq!(nodes.len(), 2);
            let spans: Vec<_> = nodes
                .iter()
                .map(|id| state.registrar().get(*id).unwrap().span().start_line)
                .collect();
            assert_eq!(spans, vec![11, 13]);
        });
    }

    #[test]
    fn test_inline_columns() {
        with_state("", |state| {
            let ids = state.parse_inline("a *b*", Span::line(3));
            let span = state.registrar().get(ids[1]).unwrap().span();
            assert_eq!(span.start_line, 3);
            assert_eq!((span.start_col, span.end_col), (Some(2), Some(5)));
        });
    }
}
