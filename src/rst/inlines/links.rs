//! URLs, e-mail addresses, simple names and embedded references
//!
//! The recognizers here are hand-written scanners rather than regexes where the grammar
//! needs to look at the character after a match (URL termination, the end-string
//! boundary of standalone references).

use super::escape::remove_escapes;
use super::{is_end_boundary, is_start_boundary};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][0-9A-Za-z_.\-+]*:(?://)?[A-Za-z0-9\-._~:/?#\[\]\\@!$&'()*+,;=]{3,}$")
        .expect("valid url regex")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+$").expect("valid email regex")
});
static FILE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/?(?:[0-9A-Za-z_.\-+]+/)+[0-9A-Za-z_]+(?:\.[0-9A-Za-z_]+)?$")
        .expect("valid file path regex")
});
static SIMPLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_.:+<>]*$").expect("valid simple name regex"));

pub fn is_url(text: &str) -> bool {
    URL_RE.is_match(text)
}

pub fn is_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

pub fn is_file_path(text: &str) -> bool {
    FILE_PATH_RE.is_match(text)
}

/// Reference names usable without backquotes (`name_`, `[label]_`)
pub fn is_simple_name(text: &str) -> bool {
    SIMPLE_NAME_RE.is_match(text)
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]\\@!$&'()*+,;=".contains(c)
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+')
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn is_tld_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '<' | '>')
}

/// Byte length of the run of chars matching `pred` starting at `from`
fn run_len(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .chars()
        .take_while(|c| pred(*c))
        .map(char::len_utf8)
        .sum()
}

/// Parsed form of a hyperlink reference body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRef {
    pub label: String,
    pub target: String,
    pub is_alias: bool,
    pub is_embedded: bool,
}

/// Split `label <target>` into its parts.
///
/// Without an embedded target the text is both label and target. An embedded target is an
/// alias only when it ends in an unescaped `_`; any other target is an alias unless it is
/// a URL, an e-mail address or a file path.
pub fn parse_embedded_ref(raw: &str, target_might_be_email: bool) -> EmbeddedRef {
    let split = split_embedded(raw);
    let is_embedded = split.is_some();
    let (raw_label, raw_target) = match split {
        Some((label, target)) => (label.unwrap_or(target), target),
        None => (raw, raw),
    };

    let label = remove_escapes(raw_label, false);
    let target = remove_escapes(raw_target, false);

    let url = is_url(&target);
    let email = target_might_be_email && is_email(&target);
    let file_path = is_file_path(&target);

    let is_alias = if is_embedded {
        raw_target.ends_with('_') && !raw_target.ends_with("\\_")
    } else {
        !(url || email || file_path)
    };

    EmbeddedRef {
        label: label
            .strip_prefix("mailto:")
            .map(str::to_string)
            .unwrap_or(label),
        target: if email {
            format!("mailto:{}", target)
        } else {
            target
        },
        is_alias,
        is_embedded,
    }
}

/// `label <target>` -> (Some(label), target); `<target>` -> (None, target)
fn split_embedded(raw: &str) -> Option<(Option<&str>, &str)> {
    let body = raw.strip_suffix('>')?;
    if body.ends_with('\\') {
        return None;
    }

    let valid_target = |t: &str| !t.is_empty() && !t.contains('\n');

    // Shortest label first, so the first unescaped `<` that leaves a valid target wins
    for (idx, _) in body.match_indices('<') {
        if idx == 0 || body[..idx].ends_with('\\') {
            continue;
        }
        let target = &body[idx + 1..];
        if !valid_target(target) {
            continue;
        }
        let label = &body[..idx];
        let label = match label.chars().last() {
            Some(c) if c.is_whitespace() && label.len() > c.len_utf8() => {
                &label[..label.len() - c.len_utf8()]
            }
            _ => label,
        };
        return Some((Some(label), target));
    }

    let target = body.strip_prefix('<')?;
    valid_target(target).then_some((None, target))
}

/// A reference found in plain text: `name_`, `name__`, `<url>`, url, `<email>`, email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneLink {
    pub start: usize,
    pub end: usize,
    pub raw: String,
    pub is_anonymous: bool,
}

/// Find the first standalone reference in `text` at or after byte `from`.
///
/// Unless `char_level` is set, a reference must start after start-of-text, whitespace or
/// an opening punctuation and end before end-of-text, whitespace or closing punctuation.
pub fn find_standalone_link(text: &str, from: usize, char_level: bool) -> Option<StandaloneLink> {
    for (offset, _) in text[from..].char_indices() {
        let start = from + offset;
        if !char_level && !is_start_boundary(text[..start].chars().last()) {
            continue;
        }
        if let Some(link) = match_link_at(text, start, char_level) {
            return Some(link);
        }
    }
    None
}

fn match_link_at(text: &str, start: usize, char_level: bool) -> Option<StandaloneLink> {
    let end_ok = |end: usize| char_level || is_end_boundary(text[end..].chars().next());
    let link = |raw_start: usize, raw_end: usize, end: usize, is_anonymous: bool| StandaloneLink {
        start,
        end,
        raw: text[raw_start..raw_end].to_string(),
        is_anonymous,
    };

    // name_ / name__
    if text[start..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        let name_run = run_len(text, start, is_name_char);
        let mut name_end = start;
        for c in text[start..start + name_run].chars() {
            name_end += c.len_utf8();
            let rest = &text[name_end..];
            if rest.starts_with("__") && end_ok(name_end + 2) {
                return Some(link(start, name_end, name_end + 2, true));
            }
            if rest.starts_with('_') && end_ok(name_end + 1) {
                return Some(link(start, name_end, name_end + 1, false));
            }
        }
    }

    let bracketed = text[start..].starts_with('<');

    // <url>
    if bracketed {
        if let Some(url_end) = match_url(text, start + 1) {
            if text[url_end..].starts_with('>') && end_ok(url_end + 1) {
                return Some(link(start + 1, url_end, url_end + 1, false));
            }
        }
    }

    // url
    if let Some(url_end) = match_url(text, start) {
        if end_ok(url_end) {
            return Some(link(start, url_end, url_end, false));
        }
    }

    // <email>
    if bracketed {
        let accept = |end: usize| text[end..].starts_with('>') && end_ok(end + 1);
        if let Some(email_end) = match_email(text, start + 1, accept) {
            return Some(link(start + 1, email_end, email_end + 1, false));
        }
    }

    // email
    match_email(text, start, end_ok).map(|end| link(start, end, end, false))
}

/// End of a URL starting at `start`. A URL runs to whitespace, `>` or end of text.
fn match_url(text: &str, start: usize) -> Option<usize> {
    if !text[start..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let colon = start + run_len(text, start, is_scheme_char);
    if !text[colon..].starts_with(':') {
        return None;
    }
    let body_start = colon + 1;
    let body_len = run_len(text, body_start, is_url_char);
    if body_len < 3 {
        return None;
    }
    let end = body_start + body_len;
    match text[end..].chars().next() {
        None => Some(end),
        Some(c) if c.is_whitespace() || c == '>' => Some(end),
        _ => None,
    }
}

/// End of an e-mail address starting at `start`, trying longer matches first and
/// keeping the first end that `accept` allows
fn match_email(text: &str, start: usize, accept: impl Fn(usize) -> bool) -> Option<usize> {
    let local = run_len(text, start, is_email_char);
    if local == 0 || !text[start + local..].starts_with('@') {
        return None;
    }
    let domain_start = start + local + 1;
    let domain_end = domain_start + run_len(text, domain_start, is_email_char);

    let dots: Vec<usize> = text[domain_start..domain_end]
        .match_indices('.')
        .map(|(i, _)| domain_start + i)
        .filter(|dot| *dot > domain_start)
        .collect();

    for dot in dots.into_iter().rev() {
        let tld_end = dot + 1 + run_len(text, dot + 1, is_tld_char);
        for end in (dot + 2..=tld_end).rev() {
            if accept(end) {
                return Some(end);
            }
        }
    }
    None
}
