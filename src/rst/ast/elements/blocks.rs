//! Block payloads: document root, sections and verbatim blocks

use super::super::NodeId;

/// Root payload. `meta` is the leading field list when it was lifted out of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    pub meta: Option<NodeId>,
}

/// A section title. The children are the title's inline nodes; the section content
/// follows as siblings in the parent's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// 1-based, assigned to each distinct underline character in order of first use
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctestBlock {
    pub text: String,
}
