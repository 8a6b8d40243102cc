//! Inline markup
//!
//!     Inline parsing runs on the text a block collected (paragraph lines, section titles,
//!     definition terms, field names, line-block lines). It is a left-to-right scan for
//!     start strings; each start string picks the end string to look for, and whatever
//!     lies between becomes one inline node. Text outside any markup is scanned again for
//!     standalone references (`name_`, URLs, e-mail addresses).
//!
//! Recognition Rules
//!
//!     Start strings, in priority order: `**`, `*`, ` `` `, `` ` ``, `|`, `` _` ``, `[`.
//!     An interpreted-text role may precede the start string (`:role:`) or follow the end
//!     string.
//!
//!     - A start string must not be escaped and must be followed by a non-space.
//!     - It must follow start-of-text, whitespace or one of `- : / ' " < ( [ {`.
//!     - An end string must follow a non-space and, except for inline literals, must not
//!       be escaped.
//!     - It must be followed by end-of-text, whitespace or one of
//!       ``- . , : ; ! ? / \ ' " > ) ] }``.
//!     - A start string wrapped in a matching quote pair (`'*'`, `(*)`, ...) is text.
//!
//!     Character-level mode drops the surrounding-character rules. A start string with no
//!     matching end is kept as text. Adjacent text pieces are merged into one node.
//!
//! Output
//!
//!     The parser returns [InlineNode]s: a node kind plus byte offsets into the parsed text.
//!     Registration into the arena is left to the block parser that owns the text, since
//!     only it knows the line span.

pub mod escape;
pub mod links;
pub mod parser;

pub use escape::remove_escapes;
pub use links::{is_email, is_file_path, is_simple_name, is_url, parse_embedded_ref, EmbeddedRef};
pub use parser::{InlineNode, InlineParser, RoleValidator};

/// Characters allowed right before a start string (besides whitespace and start-of-text)
const START_PUNCTUATION: &str = "-:/'\"<([{";

/// Characters allowed right after an end string (besides whitespace and end-of-text)
const END_PUNCTUATION: &str = "-.,:;!?/\\'\">)]}";

pub(crate) fn is_start_boundary(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || START_PUNCTUATION.contains(c),
    }
}

pub(crate) fn is_end_boundary(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(c) => c.is_whitespace() || END_PUNCTUATION.contains(c),
    }
}

/// Opening/closing pairs that neutralize a start string between them
pub(crate) fn is_matching_quote(open: Option<char>, close: Option<char>) -> bool {
    matches!(
        (open, close),
        (Some('\''), Some('\''))
            | (Some('"'), Some('"'))
            | (Some('<'), Some('>'))
            | (Some('('), Some(')'))
            | (Some('['), Some(']'))
            | (Some('{'), Some('}'))
    )
}
