//! Inline leaf payloads
//!
//! Inline nodes keep the raw source text (escapes included) and derive their visible text
//! on demand, so the tree can always be shown as written.

use crate::rst::inlines::escape::remove_escapes;
use crate::rst::inlines::links::parse_embedded_ref;

/// Payload shared by Text, Emphasis, StrongEmphasis, InlineLiteral, SubstitutionRef,
/// FootnoteRef, CitationRef and InlineInternalTarget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineText {
    pub raw: String,
}

impl InlineText {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn text(&self) -> String {
        remove_escapes(&self.raw, false)
    }
}

/// `` :role:`text` `` or `` `text`:role: ``
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedText {
    pub raw: String,
    pub role: String,
}

impl InterpretedText {
    pub fn text(&self) -> String {
        remove_escapes(&self.raw, false)
    }
}

/// `` `label <target>`_ ``, `` `text`__ ``, `name_` or a standalone URL / e-mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRef {
    pub raw: String,
    pub label: String,
    pub target: String,
    pub is_anonymous: bool,
    pub is_alias: bool,
    pub is_embedded: bool,
}

impl HyperlinkRef {
    pub fn new(raw: impl Into<String>, is_anonymous: bool) -> Self {
        let raw = raw.into();
        let embedded = parse_embedded_ref(&raw, true);
        Self {
            raw,
            label: embedded.label,
            target: embedded.target,
            is_anonymous,
            is_alias: embedded.is_alias,
            is_embedded: embedded.is_embedded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_ref() {
        let r = HyperlinkRef::new("Python <https://www.python.org/>", false);
        assert_eq!(r.label, "Python");
        assert_eq!(r.target, "https://www.python.org/");
        assert!(r.is_embedded);
        assert!(!r.is_alias);
    }

    #[test]
    fn test_plain_name_is_alias() {
        let r = HyperlinkRef::new("some name", false);
        assert_eq!(r.label, "some name");
        assert_eq!(r.target, "some name");
        assert!(r.is_alias);
        assert!(!r.is_embedded);
    }

    #[test]
    fn test_email_gets_mailto() {
        let r = HyperlinkRef::new("me@example.com", false);
        assert_eq!(r.target, "mailto:me@example.com");
        assert_eq!(r.label, "me@example.com");
        assert!(!r.is_alias);
    }
}
