//! Explicit markup: directives, footnote and citation definitions, substitution
//! definitions, hyperlink targets and comments
//!
//! All of these start with `..` (anonymous targets may also start with `__`). Comment is
//! tried last and takes every `..` line the others refuse.

use super::lists::parse_field_list;
use super::state::ParserState;
use crate::rst::ast::{
    CitationDef, Comment, Directive, FootnoteDef, HyperlinkTarget, NodeId, NodeKind, NodeType,
    Span, SubstitutionDef,
};
use crate::rst::error::ParserResult;
use crate::rst::lexing::{indent_of, is_blank, strip_columns};
use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *\.\. +(?P<directive>\S+?)(?P<space> ?)::(?: (?P<first>.*))?$").unwrap()
});

static SUBSTITUTION_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *\.\. +\|(?P<needle>.+)\| (?P<directive>\S+)::(?: (?P<first>.*))?$").unwrap()
});

static FOOTNOTE_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *\.\. +\[(?P<label>[0-9]+|#(?:[a-zA-Z][a-zA-Z0-9_.:+<>]*)?|\*)\] +(?P<first>.+)$")
        .unwrap()
});

static CITATION_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *\.\. +\[(?P<label>[a-zA-Z][a-zA-Z0-9_.:+<>]*)\] +(?P<first>.+)$").unwrap()
});

static EXPLICIT_TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^ *\.\. +_(?:(?P<anon>_)",
        r"|`(?P<phrase>(?:\\`|[^`])+)`",
        r"|(?P<name>(?:\\:|[^:])+))",
        r":(?: (?P<first>.*))?$",
    ))
    .unwrap()
});

static ANONYMOUS_TARGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *__(?: (?P<target>.+))?$").unwrap());

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]*\.\.(?: (?P<text>.*))?$").unwrap());

/// An odd run of trailing backslashes escapes whatever follows
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

struct MarkupLine {
    start: usize,
    captures: Vec<(String, String)>,
}

impl MarkupLine {
    fn get(&self, name: &str) -> &str {
        self.captures
            .iter()
            .find(|(key, _)| key == name)
            .map_or("", |(_, value)| value.as_str())
    }
}

/// Test the current line at exactly `indent` and keep the named groups
fn peek_markup(state: &ParserState<'_>, indent: usize, re: &Regex) -> Option<MarkupLine> {
    if !state.cursor.peek_is_indented(indent, 0) {
        return None;
    }
    let caps = state.cursor.peek_test(re, 0)?;
    let captures = re
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
        .collect();
    Some(MarkupLine {
        start: state.cursor.line_idx(),
        captures,
    })
}

/// Init content, config field list and body shared by directives and substitution
/// definitions.
///
/// Returns `(init_content, config, children, raw_body)`. Init content nodes stay apart
/// only when `keep_init` is set; otherwise they lead the body.
fn parse_directive_parts(
    state: &mut ParserState<'_>,
    indent: usize,
    line: &MarkupLine,
    parent: NodeType,
    keep_init: bool,
    raw_text: bool,
) -> ParserResult<(Vec<NodeId>, Option<NodeId>, Vec<NodeId>, Option<String>)> {
    state.cursor.consume()?;
    let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
    let init = state.parse_init_content(body_indent, line.get("first"), line.start)?;
    let config = parse_field_list(state, body_indent)?;

    let mut children = Vec::new();
    let body_init = if keep_init || config.is_some() {
        children.extend(init.iter().copied());
        children.extend(config);
        Vec::new()
    } else {
        init.clone()
    };
    let init_content = if keep_init { init } else { Vec::new() };

    if raw_text {
        children.extend(body_init);
        let raw = state.parse_body_text(body_indent, parent, None)?;
        return Ok((init_content, config, children, Some(raw)));
    }

    children.extend(state.parse_body_nodes(body_indent, parent, body_init)?);
    Ok((init_content, config, children, None))
}

pub(crate) fn parse_directive(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let Some(line) = peek_markup(state, indent, &DIRECTIVE_RE) else {
        return Ok(None);
    };
    let raw_name = line.get("directive");
    if line.get("space").is_empty() && ends_with_escape(raw_name) {
        return Ok(None);
    }
    let name = raw_name.to_lowercase();

    let opts = state.opts();
    let keep_init = opts.is_init_content_directive(&name);
    let raw_text = opts.is_raw_text_directive(&name);
    let invisible = opts.is_invisible_directive(&name);

    let (init_content, config, children, raw_body) =
        parse_directive_parts(state, indent, &line, NodeType::Directive, keep_init, raw_text)?;

    Ok(Some(state.register(
        NodeKind::Directive(Directive {
            name,
            init_content,
            config,
            raw_body,
            invisible,
        }),
        Span::new(line.start, state.cursor.line_idx()),
        children,
    )))
}

/// `.. |needle| directive:: args`. The `image` directive keeps its argument apart as init
/// content.
pub(crate) fn parse_substitution_def(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    let Some(line) = peek_markup(state, indent, &SUBSTITUTION_DEF_RE) else {
        return Ok(None);
    };
    let directive = line.get("directive").to_string();
    if ends_with_escape(&directive) {
        return Ok(None);
    }
    let keep_init = directive == "image";

    let (init_content, config, children, _) =
        parse_directive_parts(state, indent, &line, NodeType::SubstitutionDef, keep_init, false)?;

    Ok(Some(state.register(
        NodeKind::SubstitutionDef(SubstitutionDef {
            needle: line.get("needle").to_string(),
            directive,
            init_content,
            config,
        }),
        Span::new(line.start, state.cursor.line_idx()),
        children,
    )))
}

/// Consecutive definitions, blank lines allowed between them
fn parse_def_group<F>(
    state: &mut ParserState<'_>,
    group: NodeKind,
    mut parse_def: F,
) -> ParserResult<Option<NodeId>>
where
    F: FnMut(&mut ParserState<'_>) -> ParserResult<Option<NodeId>>,
{
    let start = state.cursor.line_idx();
    let mut defs = Vec::new();
    loop {
        state.cursor.consume_all_blank_lines();
        match parse_def(state)? {
            Some(def) => defs.push(def),
            None => break,
        }
    }

    if defs.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(group, Span::new(start, state.cursor.line_idx()), defs)))
}

/// Label plus a body at the nested indent; the first line opens the body
fn parse_labelled_def(
    state: &mut ParserState<'_>,
    indent: usize,
    re: &Regex,
    parent: NodeType,
) -> ParserResult<Option<(String, Vec<NodeId>, Span)>> {
    let Some(line) = peek_markup(state, indent, re) else {
        return Ok(None);
    };
    state.cursor.consume()?;

    let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
    let init = state.parse_init_content(body_indent, line.get("first"), line.start)?;
    let children = state.parse_body_nodes(body_indent, parent, init)?;
    Ok(Some((
        line.get("label").to_string(),
        children,
        Span::new(line.start, state.cursor.line_idx()),
    )))
}

pub(crate) fn parse_footnote_def_group(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    parse_def_group(state, NodeKind::FootnoteDefGroup, |state| {
        let Some((raw_label, children, span)) =
            parse_labelled_def(state, indent, &FOOTNOTE_DEF_RE, NodeType::FootnoteDef)?
        else {
            return Ok(None);
        };
        Ok(Some(state.register(
            NodeKind::FootnoteDef(FootnoteDef { raw_label }),
            span,
            children,
        )))
    })
}

pub(crate) fn parse_citation_def_group(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    parse_def_group(state, NodeKind::CitationDefGroup, |state| {
        let Some((raw_label, children, span)) =
            parse_labelled_def(state, indent, &CITATION_DEF_RE, NodeType::CitationDef)?
        else {
            return Ok(None);
        };
        Ok(Some(state.register(
            NodeKind::CitationDef(CitationDef { raw_label }),
            span,
            children,
        )))
    })
}

/// `.. _name: target`, `` .. _`phrase name`: target ``, `.. __: target` or `__ target`.
///
/// The target text may continue on indented lines; line breaks are dropped so long URLs
/// can be wrapped.
pub(crate) fn parse_hyperlink_target(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    if let Some(line) = peek_markup(state, indent, &EXPLICIT_TARGET_RE) {
        let raw_label = ["anon", "phrase", "name"]
            .iter()
            .map(|group| line.get(group))
            .find(|label| !label.is_empty())
            .unwrap_or_default()
            .to_string();
        if raw_label.is_empty() || ends_with_escape(&raw_label) {
            return Ok(None);
        }

        state.cursor.consume()?;
        let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
        let raw_target = state.parse_init_content_text(body_indent, line.get("first"), false)?;
        return Ok(Some(state.register(
            NodeKind::HyperlinkTarget(HyperlinkTarget {
                raw_label,
                raw_target,
            }),
            Span::new(line.start, state.cursor.line_idx()),
            Vec::new(),
        )));
    }

    let Some(line) = peek_markup(state, indent, &ANONYMOUS_TARGET_RE) else {
        return Ok(None);
    };
    state.cursor.consume()?;
    Ok(Some(state.register(
        NodeKind::HyperlinkTarget(HyperlinkTarget {
            raw_label: "_".to_string(),
            raw_target: line.get("target").to_string(),
        }),
        Span::new(line.start, state.cursor.line_idx()),
        Vec::new(),
    )))
}

/// `..` with optional text on the first line and an indented continuation.
///
/// Continuation lines are aligned with the first line's text when there is one, otherwise
/// with the least indented continuation line.
pub(crate) fn parse_comment(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let Some(line) = peek_markup(state, indent, &COMMENT_RE) else {
        return Ok(None);
    };
    state.cursor.consume()?;

    let body_indent = indent + 2;
    let mut rest = Vec::new();
    while (state.cursor.peek_is_content(0) && state.cursor.peek_is_at_least_indented(body_indent, 0))
        || state.cursor.peek_is_blank(0)
    {
        rest.push(state.cursor.consume()?);
    }

    let first = line.get("text");
    let common_indent = if first.is_empty() {
        rest.iter()
            .filter(|l| !is_blank(l))
            .map(|l| indent_of(l))
            .min()
            .unwrap_or(0)
    } else {
        indent + 3
    };
    let rest_text = rest
        .iter()
        .map(|l| strip_columns(l, common_indent))
        .collect::<Vec<_>>()
        .join("\n");

    let text = [first, rest_text.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Some(state.register(
        NodeKind::Comment(Comment {
            text: text.trim_end_matches('\n').to_string(),
        }),
        Span::new(line.start, state.cursor.line_idx()),
        Vec::new(),
    )))
}
