//! Reference names
//!
//! Every cross-referenceable node is known by a normalized name: footnote and citation
//! labels, hyperlink target labels, section titles. Two source spellings that normalize to
//! the same string are the same name. Anchors (html ids) go one step further and keep only
//! ASCII letters and digits.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static INVALID_NAME_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-_.:+<>]").unwrap());
static INVALID_ANCHOR_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());
static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());
static ANCHOR_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-\d]*").unwrap());

const SYMBOLS: [char; 10] = ['*', '†', '‡', '§', '¶', '#', '♠', '♥', '♦', '♣'];

/// Decompose, drop combining marks, lowercase
fn fold(name: &str) -> String {
    name.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Normalized form of a reference name
///
/// `"Café au lait"` becomes `"cafe-au-lait"`; `"a: b"` becomes `"a:-b"`.
pub fn normalize_simple_name(name: &str) -> String {
    let folded = fold(name);
    let replaced = INVALID_NAME_CHARS_RE.replace_all(&folded, "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

/// A name reduced to something safe as an html id: ASCII letters, digits and single
/// hyphens, never starting with a digit or hyphen. Can be empty.
pub fn sanitize_simple_name(name: &str) -> String {
    let folded = fold(name);
    let replaced = INVALID_ANCHOR_CHARS_RE.replace_all(&folded, "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&replaced, "-");
    let stripped = ANCHOR_PREFIX_RE.replace(&collapsed, "");
    stripped.trim_end_matches('-').to_string()
}

/// The name an alias target (`name_` or `` `some name`_ ``) points at
pub fn alias_name(target: &str) -> String {
    let bare = target.strip_suffix('_').unwrap_or(target);
    normalize_simple_name(bare.trim_matches('`'))
}

/// Rendered symbol for the `n`th auto-symbol footnote (1-based).
///
/// The ten symbols are used once each, then doubled, then tripled and so on.
pub fn footnote_symbol(n: usize) -> String {
    let n = n.max(1);
    let symbol = SYMBOLS[(n - 1) % SYMBOLS.len()];
    let repeat = (n - 1) / SYMBOLS.len() + 1;
    std::iter::repeat(symbol).take(repeat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Introduction", "introduction")]
    #[case("Café au lait", "cafe-au-lait")]
    #[case("  --Hello,   World!--  ", "hello-world")]
    #[case("a:b_c.d+e<f>", "a:b_c.d+e<f>")]
    #[case("footnoteref-3", "footnoteref-3")]
    #[case("Ünïcödé", "unicode")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_simple_name(input), expected);
    }

    #[rstest]
    #[case("introduction-1", "introduction-1")]
    #[case("a:b_c", "a-b-c")]
    #[case("2nd try", "nd-try")]
    #[case("--123abc--", "abc")]
    #[case("42", "")]
    fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_simple_name(input), expected);
    }

    #[rstest]
    #[case("python_", "python")]
    #[case("`Some Name`_", "some-name")]
    #[case("plain", "plain")]
    fn test_alias_name(#[case] target: &str, #[case] expected: &str) {
        assert_eq!(alias_name(target), expected);
    }

    #[test]
    fn test_footnote_symbols_cycle() {
        assert_eq!(footnote_symbol(1), "*");
        assert_eq!(footnote_symbol(2), "†");
        assert_eq!(footnote_symbol(10), "♣");
        assert_eq!(footnote_symbol(11), "**");
        assert_eq!(footnote_symbol(22), "†††");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(name in "\\PC{0,40}") {
            let once = normalize_simple_name(&name);
            prop_assert_eq!(normalize_simple_name(&once), once);
        }

        #[test]
        fn sanitized_names_are_valid_ids(name in "\\PC{0,40}") {
            let id = sanitize_simple_name(&name);
            prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!id.starts_with('-') && !id.ends_with('-'));
            prop_assert!(!id.starts_with(|c: char| c.is_ascii_digit()));
        }
    }
}
