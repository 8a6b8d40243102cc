//! List constructs: bullet, enumerated, field, option and definition lists
//!
//! Every list unit loops the same way: skip blank lines, try one item, stop at the first
//! refusal. A unit that parsed no item refuses the line as a whole.

use super::state::ParserState;
use crate::rst::ast::{
    is_sequential_bullet, CommandOption, DefinitionListItem, EnumeratedList, EnumeratedListType,
    FieldListItem, ListItem, NodeId, NodeKind, NodeType, OptionListItem, Span,
};
use crate::rst::error::ParserResult;
use crate::rst::lexing::strip_columns;
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ ]*(?P<marker>(?P<bullet>[*+-])[ ]+)(?P<text>.+)$").unwrap());

static ENUMERATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[ ]*(?P<marker>\(?",
        r"(?P<bullet>[0-9]+|[A-Za-z]|#|I+|[MDCLXVI]{2,}|i+|[mdclxvi]{2,})",
        r"[).][ ]+)(?P<text>.+)$",
    ))
    .unwrap()
});

const OPTION_ARG: &str = r"[a-zA-Z][a-zA-Z0-9_-]*|<[^>]+>";

static OPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        concat!(
            r"^(?:(?P<short>-[a-zA-Z0-9])(?:(?P<short_delim> )(?P<short_arg>{arg}))?",
            r"|(?P<long>--[a-zA-Z][a-zA-Z-]*)(?:(?P<long_delim>[ =])(?P<long_arg>{arg}))?",
            r"|(?P<dos>/[A-Z]))",
        ),
        arg = OPTION_ARG
    ))
    .unwrap()
});

fn parse_list<F>(state: &mut ParserState<'_>, mut parse_item: F) -> ParserResult<Vec<NodeId>>
where
    F: FnMut(&mut ParserState<'_>, Option<NodeId>) -> ParserResult<Option<NodeId>>,
{
    let mut items = Vec::new();
    loop {
        state.cursor.consume_all_blank_lines();
        let prev = items.last().copied();
        match parse_item(state, prev)? {
            Some(item) => items.push(item),
            None => break,
        }
    }
    Ok(items)
}

struct ListMarker {
    bullet: String,
    body_indent: usize,
    first_line: String,
}

/// Match a bullet or enumerator at `indent` and apply the second-line check: a following
/// content line must be another item or be indented to the item body.
fn peek_list_marker(state: &ParserState<'_>, indent: usize, re: &Regex) -> Option<ListMarker> {
    let cursor = &state.cursor;
    if !cursor.peek_is_indented(indent, 0) {
        return None;
    }
    let caps = cursor.peek_test(re, 0)?;
    let body_indent = indent + caps["marker"].chars().count();

    if cursor.peek_is_content(1)
        && !cursor.peek_matches(re, 1)
        && !cursor.peek_is_at_least_indented(body_indent, 1)
    {
        return None;
    }

    Some(ListMarker {
        bullet: caps["bullet"].to_string(),
        body_indent,
        first_line: caps["text"].to_string(),
    })
}

fn parse_list_item_body(
    state: &mut ParserState<'_>,
    marker: &ListMarker,
    parent: NodeType,
) -> ParserResult<(Vec<NodeId>, Span)> {
    let start = state.cursor.line_idx();
    state.cursor.consume()?;
    let init = state.parse_init_content(marker.body_indent, &marker.first_line, start)?;
    let children = state.parse_body_nodes(marker.body_indent, parent, init)?;
    Ok((children, Span::new(start, state.cursor.line_idx())))
}

pub(crate) fn parse_bullet_list(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let items = parse_list(state, |state, _prev| {
        let Some(marker) = peek_list_marker(state, indent, &BULLET_RE) else {
            return Ok(None);
        };
        let (children, span) = parse_list_item_body(state, &marker, NodeType::BulletListItem)?;
        let item = ListItem {
            bullet: marker.bullet,
        };
        Ok(Some(state.register(NodeKind::BulletListItem(item), span, children)))
    })?;

    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(
        NodeKind::BulletList,
        Span::new(start, state.cursor.line_idx()),
        items,
    )))
}

fn bullet_of(state: &ParserState<'_>, item: NodeId) -> Option<String> {
    match state.registrar().get(item)?.kind() {
        NodeKind::EnumeratedListItem(item) | NodeKind::BulletListItem(item) => Some(item.bullet.clone()),
        _ => None,
    }
}

/// Items must follow each other (`1`, `2`, `#`); an out-of-sequence enumerator ends the
/// list and starts a new one.
pub(crate) fn parse_enumerated_list(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let items = parse_list(state, |state, prev| {
        let Some(marker) = peek_list_marker(state, indent, &ENUMERATED_RE) else {
            return Ok(None);
        };
        let prev_bullet = prev.and_then(|p| bullet_of(state, p));
        if !is_sequential_bullet(&marker.bullet, prev_bullet.as_deref()) {
            return Ok(None);
        }
        let (children, span) = parse_list_item_body(state, &marker, NodeType::EnumeratedListItem)?;
        let item = ListItem {
            bullet: marker.bullet,
        };
        Ok(Some(state.register(NodeKind::EnumeratedListItem(item), span, children)))
    })?;

    let Some(first) = items.first() else {
        return Ok(None);
    };
    let list_type = bullet_of(state, *first)
        .as_deref()
        .and_then(EnumeratedListType::detect)
        .ok_or_else(|| state.internal_error("enumerated list has no detectable type"))?;

    Ok(Some(state.register(
        NodeKind::EnumeratedList(EnumeratedList { list_type }),
        Span::new(start, state.cursor.line_idx()),
        items,
    )))
}

/// Split a `:name: body` line into the raw name and the first line of the body.
///
/// The name may contain escaped characters and colons, but a colon inside it must not be
/// followed by a space, a backtick or the end of the line.
pub(crate) fn match_field_marker(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start_matches(' ').strip_prefix(':')?;
    if matches!(rest.chars().next(), None | Some(':') | Some(' ')) {
        return None;
    }

    let mut chars = rest.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            ':' => {
                let after = &rest[idx + 1..];
                match after.chars().next() {
                    Some('`') => return None,
                    Some(' ') | None => {}
                    Some(_) => continue,
                }
                let name = &rest[..idx];
                if name.ends_with(' ') {
                    return None;
                }
                return match after.strip_prefix(' ') {
                    None => Some((name, "")),
                    Some("") => None,
                    Some(text) => Some((name, text)),
                };
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn is_field_marker(line: &str) -> bool {
    match_field_marker(line).is_some()
}

pub(crate) fn parse_field_list(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let items = parse_list(state, |state, _prev| parse_field_list_item(state, indent))?;
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(
        NodeKind::FieldList,
        Span::new(start, state.cursor.line_idx()),
        items,
    )))
}

fn parse_field_list_item(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) {
        return Ok(None);
    }
    let Some((name, first_line)) = state
        .cursor
        .peek(0)
        .and_then(match_field_marker)
        .map(|(name, text)| (name.to_string(), text.to_string()))
    else {
        return Ok(None);
    };

    let name = state.parse_inline(&name, Span::line(start));
    state.cursor.consume()?;

    let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
    let init = state.parse_init_content(body_indent, &first_line, start)?;
    let body = state.parse_body_nodes(body_indent, NodeType::FieldListItem, init)?;

    let mut children = name.clone();
    children.extend(body);
    Ok(Some(state.register(
        NodeKind::FieldListItem(FieldListItem { name }),
        Span::new(start, state.cursor.line_idx()),
        children,
    )))
}

/// Options at the start of `text`, joined by `", "`, and the byte offset of the
/// description that follows.
///
/// An option must end at a space, a comma or the end of the line.
pub(crate) fn parse_options(text: &str) -> Option<(Vec<CommandOption>, usize)> {
    let mut options = Vec::new();
    let mut pos = 0;

    loop {
        let Some(option) = match_option(&text[pos..]) else {
            break;
        };
        options.push(option.0);
        pos += option.1;

        match text[pos..].strip_prefix(", ") {
            Some(rest) if match_option(rest).is_some() => pos += 2,
            _ => break,
        }
    }

    if options.is_empty() {
        return None;
    }
    let description = pos + (text.len() - pos - text[pos..].trim_start().len());
    Some((options, description))
}

fn match_option(text: &str) -> Option<(CommandOption, usize)> {
    let caps = OPTION_RE.captures(text)?;
    let len = caps.get(0)?.end();
    if !matches!(text[len..].chars().next(), None | Some(' ') | Some(',')) {
        return None;
    }

    let get = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
    let option = CommandOption {
        name: get("short").or_else(|| get("long")).or_else(|| get("dos"))?,
        delimiter: get("short_delim").or_else(|| get("long_delim")),
        arg: get("short_arg").or_else(|| get("long_arg")),
    };
    Some((option, len))
}

pub(crate) fn parse_option_list(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let items = parse_list(state, |state, _prev| parse_option_list_item(state, indent))?;
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(
        NodeKind::OptionList,
        Span::new(start, state.cursor.line_idx()),
        items,
    )))
}

fn parse_option_list_item(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) {
        return Ok(None);
    }
    let Some((options, first_line)) = state.cursor.peek(0).and_then(|line| {
        let text = strip_columns(line, indent);
        parse_options(text).map(|(options, desc)| (options, text[desc..].to_string()))
    }) else {
        return Ok(None);
    };

    state.cursor.consume()?;
    let body_indent = state.cursor.peek_nested_indent_size(indent, 1);
    let init = state.parse_init_content(body_indent, &first_line, start)?;
    let children = state.parse_body_nodes(body_indent, NodeType::OptionListItem, init)?;

    Ok(Some(state.register(
        NodeKind::OptionListItem(OptionListItem { options }),
        Span::new(start, state.cursor.line_idx()),
        children,
    )))
}

pub(crate) fn parse_definition_list(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let items = parse_list(state, |state, _prev| parse_definition_list_item(state, indent))?;
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(state.register(
        NodeKind::DefinitionList,
        Span::new(start, state.cursor.line_idx()),
        items,
    )))
}

/// A term line followed immediately by its definition one indent step deeper
fn parse_definition_list_item(
    state: &mut ParserState<'_>,
    indent: usize,
) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    let body_indent = indent + state.opts().input_indent_size;
    let cursor = &state.cursor;
    if !cursor.peek_is_indented(indent, 0)
        || !cursor.peek_is_content(1)
        || !cursor.peek_is_indented(body_indent, 1)
    {
        return Ok(None);
    }
    let Some(term_text) = cursor
        .peek(0)
        .map(|line| line.trim_start_matches(' '))
        .filter(|text| !text.is_empty() && !text.starts_with(".."))
        .map(str::to_string)
    else {
        return Ok(None);
    };

    state.cursor.consume()?;
    let mut groups = state
        .parse_inline_groups(&term_text, Span::line(start), " : ")
        .into_iter();
    let term = groups.next().unwrap_or_default();
    let classifiers: Vec<Vec<NodeId>> = groups.collect();
    let body = state.parse_body_nodes(body_indent, NodeType::DefinitionListItem, Vec::new())?;

    let mut children = term.clone();
    children.extend(classifiers.iter().flatten().copied());
    children.extend(body);
    Ok(Some(state.register(
        NodeKind::DefinitionListItem(DefinitionListItem { term, classifiers }),
        Span::new(start, state.cursor.line_idx()),
        children,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::ast::Document;
    use crate::rst::config::ParserOptions;
    use crate::rst::parsing::parse;
    use rstest::rstest;

    fn doc(text: &str) -> Document {
        let opts = ParserOptions {
            parse_first_field_list_as_document_meta: false,
            ..ParserOptions::default()
        };
        parse(text, &opts).unwrap()
    }

    fn body_types(doc: &Document) -> Vec<NodeType> {
        doc.body().iter().map(|id| doc.node_type(*id)).collect()
    }

    #[test]
    fn test_bullet_list_items() {
        let doc = doc("- one\n- two\n\n  still two\n\n- three\n");
        let list = doc.body()[0];
        assert_eq!(doc.node_type(list), NodeType::BulletList);
        assert_eq!(doc.children(list).len(), 3);
        let second = doc.children(list)[1];
        assert_eq!(doc.children(second).len(), 2);
    }

    #[test]
    fn test_bullet_like_paragraph() {
        // second line is neither an item nor indented to the item body
        let doc = doc("- not a list\nbecause of this line\n");
        assert_eq!(body_types(&doc), vec![NodeType::Paragraph]);
    }

    #[test]
    fn test_nested_bullet_list() {
        let doc = doc("- outer\n\n  - inner\n");
        let outer_item = doc.children(doc.body()[0])[0];
        let kinds: Vec<_> = doc
            .children(outer_item)
            .iter()
            .map(|id| doc.node_type(*id))
            .collect();
        assert_eq!(kinds, vec![NodeType::Paragraph, NodeType::BulletList]);
    }

    #[test]
    fn test_enumerated_list_types() {
        let doc = doc("i. first\nii. second\n\na) x\nb) y\n");
        let types: Vec<_> = doc
            .find_all(NodeType::EnumeratedList)
            .into_iter()
            .map(|id| match doc.kind(id) {
                NodeKind::EnumeratedList(list) => list.list_type,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            types,
            vec![EnumeratedListType::RomanLower, EnumeratedListType::AlphabetLower]
        );
    }

    #[test]
    fn test_out_of_sequence_enumerator_starts_new_list() {
        let doc = doc("1. list 1\n\n3. list 2\n");
        assert_eq!(
            body_types(&doc),
            vec![NodeType::EnumeratedList, NodeType::EnumeratedList]
        );
    }

    #[test]
    fn test_auto_enumerator_continues_list() {
        let doc = doc("1. a\n#. b\n#. c\n");
        assert_eq!(doc.children(doc.body()[0]).len(), 3);
    }

    #[rstest]
    #[case(":name: body", Some(("name", "body")))]
    #[case(":name:", Some(("name", "")))]
    #[case("   :a:b: c", Some(("a:b", "c")))]
    #[case(r":a\: b: c", Some((r"a\: b", "c")))]
    #[case(":name :", None)]
    #[case("::", None)]
    #[case(": x: y", None)]
    #[case(":role:`text`", None)]
    #[case(":name: ", None)]
    fn test_field_marker(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(match_field_marker(line), expected);
    }

    #[test]
    fn test_field_list_body() {
        let doc = doc(":first: one\n:second:\n    two\n    lines\n");
        let list = doc.body()[0];
        assert_eq!(doc.node_type(list), NodeType::FieldList);
        let second = doc.children(list)[1];
        match doc.kind(second) {
            NodeKind::FieldListItem(item) => {
                assert_eq!(doc.text_content(item.name[0]), "second");
            }
            other => panic!("expected field list item, got {:?}", other),
        }
        let body = *doc.children(second).last().unwrap();
        assert_eq!(doc.text_content(body), "two\nlines");
    }

    #[rstest]
    #[case("-a  all", &["-a"], "all")]
    #[case("-f FILE  read", &["-f FILE"], "read")]
    #[case("--output=FILE, -o FILE  write", &["--output=FILE", "-o FILE"], "write")]
    #[case("/V  verbose", &["/V"], "verbose")]
    #[case("--long <a b>  angle", &["--long <a b>"], "angle")]
    fn test_parse_options(#[case] text: &str, #[case] options: &[&str], #[case] desc: &str) {
        let (parsed, at) = parse_options(text).unwrap();
        let rendered: Vec<String> = parsed.iter().map(|o| o.to_string()).collect();
        assert_eq!(rendered, options);
        assert_eq!(&text[at..], desc);
    }

    #[rstest]
    #[case("-1st place")]
    #[case("plain text")]
    #[case("--")]
    fn test_not_options(#[case] text: &str) {
        assert!(parse_options(text).is_none());
    }

    #[test]
    fn test_option_list() {
        let doc = doc("-a         Output all.\n--long     Long option\n           continued.\n");
        let list = doc.body()[0];
        assert_eq!(doc.node_type(list), NodeType::OptionList);
        assert_eq!(doc.children(list).len(), 2);
        let second = doc.children(list)[1];
        assert_eq!(
            doc.text_content(doc.children(second)[0]),
            "Long option\ncontinued."
        );
    }

    #[test]
    fn test_definition_list_with_classifiers() {
        let doc = doc("term : classifier\n    Definition.\n\nother\n    More.\n");
        let list = doc.body()[0];
        assert_eq!(doc.node_type(list), NodeType::DefinitionList);
        assert_eq!(doc.children(list).len(), 2);
        match doc.kind(doc.children(list)[0]) {
            NodeKind::DefinitionListItem(item) => {
                assert_eq!(doc.text_content(item.term[0]), "term");
                assert_eq!(item.classifiers.len(), 1);
                assert_eq!(doc.text_content(item.classifiers[0][0]), "classifier");
            }
            other => panic!("expected definition list item, got {:?}", other),
        }
    }

    #[test]
    fn test_definition_requires_exact_indent_step() {
        let doc = doc("term\n  too shallow\n");
        assert_eq!(body_types(&doc), vec![NodeType::Paragraph]);
    }
}
