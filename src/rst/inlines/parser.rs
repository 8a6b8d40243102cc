//! Inline markup scanner

use super::escape::is_escaped_at;
use super::links::{find_standalone_link, is_simple_name};
use super::{is_end_boundary, is_matching_quote, is_start_boundary};
use crate::rst::ast::{HyperlinkRef, InlineText, InterpretedText, NodeKind};
use crate::rst::config::ParserOptions;
use once_cell::sync::Lazy;
use regex::Regex;

const ROLE: &str = r"[a-zA-Z0-9](?:[a-zA-Z0-9]|[-_+:.]?[a-zA-Z0-9])*";

static START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?::(?P<role>{ROLE}):)?(?P<start>\*\*|\*|``|`|\||_`|\[)\S"
    ))
    .expect("valid start-string regex")
});

static ROLE_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^:(?P<role>{ROLE}):")).expect("valid role regex"));

static FOOTNOTE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]*$").expect("valid footnote regex"));

/// Plugin check for `` :role:`text` ``. `None` defers to the next validator.
pub type RoleValidator = fn(text: &str, role: &str) -> Option<bool>;

/// An inline node ready for registration, with byte offsets into the parsed text
#[derive(Debug, Clone, PartialEq)]
pub struct InlineNode {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
}

impl InlineNode {
    fn text(raw: &str, start: usize, end: usize) -> Self {
        Self {
            kind: NodeKind::Text(InlineText::new(raw)),
            start,
            end,
        }
    }
}

#[derive(Debug)]
struct StartMatch<'t> {
    /// Start of the match, role prefix included
    idx: usize,
    /// End of the start string
    end: usize,
    start_string: &'t str,
    role: Option<&'t str>,
}

#[derive(Debug)]
struct EndMatch<'t> {
    /// Start of the end string, relative to the search space
    idx: usize,
    /// End of the end string and any role suffix
    end: usize,
    end_string: &'static str,
    role: Option<&'t str>,
}

pub struct InlineParser<'a> {
    default_role: &'a str,
    char_level: bool,
    role_validators: &'a [RoleValidator],
}

impl<'a> InlineParser<'a> {
    pub fn new(opts: &'a ParserOptions) -> Self {
        Self {
            default_role: &opts.default_interpreted_text_role,
            char_level: opts.enable_character_level_inline_markup,
            role_validators: &[],
        }
    }

    pub fn with_role_validators(mut self, validators: &'a [RoleValidator]) -> Self {
        self.role_validators = validators;
        self
    }

    pub fn parse(&self, input: &str) -> Vec<InlineNode> {
        self.parse_groups(input, None)
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Parse and split the result wherever `delimiter` appears outside markup.
    /// Used for definition-list classifiers (`term : classifier`).
    pub fn parse_with_delimiter(&self, input: &str, delimiter: &str) -> Vec<Vec<InlineNode>> {
        self.parse_groups(input, Some(delimiter))
    }

    fn parse_groups(&self, input: &str, delimiter: Option<&str>) -> Vec<Vec<InlineNode>> {
        let mut groups: Vec<Vec<InlineNode>> = vec![Vec::new()];
        let delimiter = delimiter.filter(|d| d.len() > 1);
        let mut consumed = 0;

        while consumed < input.len() {
            let start = self.find_start(input, consumed);
            let delim_idx = delimiter
                .and_then(|d| input[consumed..].find(d))
                .map(|i| i + consumed);

            let start = match (start, delim_idx) {
                (Some(s), Some(d)) if d < s.idx => None,
                (Some(s), _) => Some(s),
                (None, Some(_)) => None,
                (None, None) => break,
            };

            let Some(start) = start else {
                // Delimiter comes first: close the group
                let (Some(d), Some(delim)) = (delim_idx, delimiter) else {
                    break;
                };
                self.push_plaintext(current(&mut groups), input, consumed, d);
                groups.push(Vec::new());
                consumed = d + delim.len();
                continue;
            };

            self.push_plaintext(current(&mut groups), input, consumed, start.idx);

            let before = input[..start.idx].chars().last();
            let after = input[start.end..].chars().next();
            if is_matching_quote(before, after) {
                push_text(current(&mut groups), &input[start.idx..start.end], start.idx, start.end);
                consumed = start.end;
                continue;
            }

            let space = &input[start.end..];
            let node = self
                .find_end(space, start.start_string)
                .and_then(|end| self.build_node(&start, &end, space).map(|kind| (kind, end)));

            match node {
                Some((kind, end)) => {
                    let node_end = start.end + end.end;
                    current(&mut groups).push(InlineNode {
                        kind,
                        start: start.idx,
                        end: node_end,
                    });
                    consumed = node_end;
                }
                None => {
                    // No usable end string: the start string is plain text
                    push_text(current(&mut groups), &input[start.idx..start.end], start.idx, start.end);
                    consumed = start.end;
                }
            }
        }

        if consumed < input.len() {
            self.push_plaintext(current(&mut groups), input, consumed, input.len());
        }

        groups
    }

    fn find_start<'t>(&self, input: &'t str, from: usize) -> Option<StartMatch<'t>> {
        let mut pos = from;
        while pos < input.len() {
            let caps = START_RE.captures_at(input, pos)?;
            let whole = caps.get(0)?;
            let idx = whole.start();

            let before = input[..idx].chars().last();
            if !is_escaped_at(input, idx) && (self.char_level || is_start_boundary(before)) {
                let start = caps.name("start")?;
                return Some(StartMatch {
                    idx,
                    end: start.end(),
                    start_string: start.as_str(),
                    role: caps.name("role").map(|m| m.as_str()),
                });
            }

            pos = idx + input[idx..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    fn find_end<'t>(&self, space: &'t str, start_string: &str) -> Option<EndMatch<'t>> {
        let (alternatives, is_literal): (&[&'static str], bool) = match start_string {
            "*" => (&["*"], false),
            "**" => (&["**"], false),
            "`" => (&["`__", "`_", "`"], false),
            "``" => (&["``"], true),
            "|" => (&["|"], false),
            "_`" => (&["`"], false),
            "[" => (&["]_"], false),
            _ => return None,
        };

        for (idx, _) in space.char_indices().skip(1) {
            let mut before = space[..idx].chars().rev();
            let Some(prev) = before.next() else {
                continue;
            };
            let escaped_space = prev.is_whitespace() && before.next() == Some('\\');
            if prev.is_whitespace() && !escaped_space {
                continue;
            }
            if !is_literal && prev == '\\' {
                continue;
            }

            for alt in alternatives {
                if !space[idx..].starts_with(alt) {
                    continue;
                }
                let after = idx + alt.len();

                if let Some(caps) = ROLE_SUFFIX_RE.captures(&space[after..]) {
                    let role_end = after + caps.get(0).map_or(0, |m| m.len());
                    if self.is_end_ok(space, role_end) {
                        return Some(EndMatch {
                            idx,
                            end: role_end,
                            end_string: alt,
                            role: caps.name("role").map(|m| m.as_str()),
                        });
                    }
                }

                if self.is_end_ok(space, after) {
                    return Some(EndMatch {
                        idx,
                        end: after,
                        end_string: alt,
                        role: None,
                    });
                }
            }
        }

        None
    }

    fn is_end_ok(&self, text: &str, pos: usize) -> bool {
        self.char_level || is_end_boundary(text[pos..].chars().next())
    }

    fn build_node(&self, start: &StartMatch<'_>, end: &EndMatch<'_>, space: &str) -> Option<NodeKind> {
        let raw = &space[..end.idx];
        let kind = match (start.start_string, end.end_string) {
            ("**", "**") => NodeKind::StrongEmphasis(InlineText::new(raw)),
            ("*", "*") => NodeKind::Emphasis(InlineText::new(raw)),
            ("``", "``") => NodeKind::InlineLiteral(InlineText::new(raw)),
            ("`", "`") => {
                let role = start.role.or(end.role);
                if !self.is_valid_interpreted_text(raw, role) {
                    return None;
                }
                NodeKind::InterpretedText(InterpretedText {
                    raw: raw.to_string(),
                    role: role.unwrap_or(self.default_role).to_string(),
                })
            }
            ("|", "|") => NodeKind::SubstitutionRef(InlineText::new(raw)),
            ("_`", "`") => NodeKind::InlineInternalTarget(InlineText::new(raw)),
            ("[", "]_") if is_footnote_ref_text(raw) => NodeKind::FootnoteRef(InlineText::new(raw)),
            ("[", "]_") if is_simple_name(raw) => NodeKind::CitationRef(InlineText::new(raw)),
            // Keep escapes: the embedded `<target>` is split later
            ("`", "`_") => NodeKind::HyperlinkRef(HyperlinkRef::new(raw, false)),
            ("`", "`__") => NodeKind::HyperlinkRef(HyperlinkRef::new(raw, true)),
            _ => return None,
        };
        Some(kind)
    }

    fn is_valid_interpreted_text(&self, raw: &str, role: Option<&str>) -> bool {
        let Some(role) = role else {
            return true;
        };
        self.role_validators
            .iter()
            .find_map(|validate| validate(raw, role))
            .unwrap_or(true)
    }

    /// Push text between `from` and `to`, splitting out standalone references
    fn push_plaintext(&self, group: &mut Vec<InlineNode>, input: &str, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let segment = &input[from..to];
        let mut consumed = 0;

        while consumed < segment.len() {
            let Some(link) = find_standalone_link(segment, consumed, self.char_level) else {
                break;
            };
            if link.start > consumed {
                push_text(group, &segment[consumed..link.start], from + consumed, from + link.start);
            }
            group.push(InlineNode {
                kind: NodeKind::HyperlinkRef(HyperlinkRef::new(link.raw, link.is_anonymous)),
                start: from + link.start,
                end: from + link.end,
            });
            consumed = link.end;
        }

        if consumed < segment.len() {
            push_text(group, &segment[consumed..], from + consumed, to);
        }
    }
}

fn current(groups: &mut Vec<Vec<InlineNode>>) -> &mut Vec<InlineNode> {
    if groups.is_empty() {
        groups.push(Vec::new());
    }
    let last = groups.len() - 1;
    &mut groups[last]
}

/// Append text, merging with a preceding text node
fn push_text(group: &mut Vec<InlineNode>, raw: &str, start: usize, end: usize) {
    if let Some(InlineNode {
        kind: NodeKind::Text(prev),
        end: prev_end,
        ..
    }) = group.last_mut()
    {
        prev.raw.push_str(raw);
        *prev_end = end;
        return;
    }
    group.push(InlineNode::text(raw, start, end));
}

fn is_footnote_ref_text(text: &str) -> bool {
    if FOOTNOTE_NUMBER_RE.is_match(text) || text == "#" || text == "*" {
        return true;
    }
    text.strip_prefix('#').is_some_and(is_simple_name)
}
