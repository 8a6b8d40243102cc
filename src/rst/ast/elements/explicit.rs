//! Explicit markup payloads: everything introduced by `..` (plus `__` anonymous targets)

use super::super::NodeId;
use crate::rst::inlines::escape::remove_escapes;
use crate::rst::inlines::links::{is_email, is_url};

/// `.. name:: args`
///
/// `init_content` holds the nodes parsed from the argument text when the directive is
/// configured to keep it apart from the body; `config` is the option field list. Both lead
/// the child list, ahead of the body. `raw_body` is set instead of body children for
/// raw-text directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub init_content: Vec<NodeId>,
    pub config: Option<NodeId>,
    pub raw_body: Option<String>,
    pub invisible: bool,
}

/// `.. |needle| directive:: args`. Init content and config lead the child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionDef {
    pub needle: String,
    pub directive: String,
    pub init_content: Vec<NodeId>,
    pub config: Option<NodeId>,
}

/// How a footnote label asks to be numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootnoteLabel<'a> {
    /// `[3]`
    Manual(u64),
    /// `[#]`
    Auto,
    /// `[#name]`
    AutoNamed(&'a str),
    /// `[*]`
    Symbol,
}

impl<'a> FootnoteLabel<'a> {
    pub fn classify(label: &'a str) -> Self {
        if label == "*" {
            return Self::Symbol;
        }
        if label == "#" {
            return Self::Auto;
        }
        if let Some(name) = label.strip_prefix('#') {
            return Self::AutoNamed(name);
        }
        match label.parse::<u64>() {
            Ok(n) if n > 0 && !label.starts_with('0') => Self::Manual(n),
            _ => Self::AutoNamed(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteDef {
    pub raw_label: String,
}

impl FootnoteDef {
    pub fn label(&self) -> String {
        remove_escapes(&self.raw_label, false)
    }

    pub fn label_kind(&self) -> FootnoteLabel<'_> {
        FootnoteLabel::classify(&self.raw_label)
    }

    /// Whether a footnote reference with text `ref_text` can link to this definition.
    /// A bare `#` def accepts every auto-numbered reference.
    pub fn is_targeted_by(&self, ref_text: &str) -> bool {
        let label = self.label();
        ref_text == label || (ref_text.starts_with('#') && label == "#")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationDef {
    pub raw_label: String,
}

impl CitationDef {
    pub fn label(&self) -> String {
        remove_escapes(&self.raw_label, false)
    }
}

/// `.. _label: target`, `.. __: target` or `__ target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkTarget {
    pub raw_label: String,
    pub raw_target: String,
}

impl HyperlinkTarget {
    pub fn label(&self) -> String {
        remove_escapes(&self.raw_label, false)
    }

    pub fn target(&self) -> String {
        remove_escapes(&self.raw_target, true)
    }

    pub fn is_anonymous(&self) -> bool {
        self.raw_label == "_"
    }

    /// A target naming another reference (`name_`) rather than a URL
    pub fn is_alias(&self) -> bool {
        let target = self.target();
        if is_url(&target) || is_email(&target) {
            return false;
        }
        self.raw_target.ends_with('_') && !self.raw_target.ends_with("\\_")
    }

    /// An empty target points at whatever visible node comes next
    pub fn targets_next_node(&self) -> bool {
        self.raw_target.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}
