//! Backslash escapes

/// Remove backslash escapes.
///
/// A backslash keeps the next character literally unless that character is whitespace, in
/// which case both are dropped (`in_url` turns them into a single space instead). A
/// trailing backslash is kept as is.
pub fn remove_escapes(text: &str, in_url: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push('\\'),
            Some(next) if !next.is_whitespace() => out.push(next),
            Some(_) if in_url => out.push(' '),
            Some(_) => {}
        }
    }

    out
}

/// Whether the character at byte `idx` follows a backslash that is not itself escaped
pub(crate) fn is_escaped_at(text: &str, idx: usize) -> bool {
    let mut before = text[..idx].chars().rev();
    match (before.next(), before.next()) {
        (Some('\\'), Some('\\')) => false,
        (Some('\\'), _) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r"plain", "plain")]
    #[case(r"\*not emphasis\*", "*not emphasis*")]
    #[case(r"a\ b", "ab")]
    #[case(r"ends with \", r"ends with \")]
    #[case(r"\\", r"\")]
    fn test_remove_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(remove_escapes(input, false), expected);
    }

    #[test]
    fn test_escaped_whitespace_in_url() {
        assert_eq!(remove_escapes(r"http://a.b/x\ y", true), "http://a.b/x y");
    }

    #[test]
    fn test_is_escaped_at() {
        assert!(is_escaped_at(r"\*", 1));
        assert!(!is_escaped_at(r"\\*", 2));
        assert!(!is_escaped_at("*", 0));
    }
}
