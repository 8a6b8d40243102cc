//! Resolver extension points
//!
//! Hooks are plain function pointers kept in registration order. There is no plugin trait
//! object: a plugin contributes whichever functions it has and the resolver calls them in
//! order.

use super::resolver::{NameTable, ResolveError};
use crate::rst::ast::{Document, NodeId};
use std::fmt;

/// Custom binding name for a node. The first hook returning `Some` wins over the built-in
/// naming rules.
pub type SimpleNameHook = fn(doc: &Document, node: NodeId) -> Option<String>;

/// Runs after the built-in phases and may add bindings of its own.
pub type OnParseHook = fn(doc: &Document, names: &mut NameTable) -> Result<(), ResolveError>;

#[derive(Clone, Default)]
pub struct ResolverHooks {
    pub simple_name: Vec<SimpleNameHook>,
    pub on_parse: Vec<OnParseHook>,
}

impl ResolverHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.simple_name.is_empty() && self.on_parse.is_empty()
    }

    pub(crate) fn simple_name(&self, doc: &Document, node: NodeId) -> Option<String> {
        self.simple_name.iter().find_map(|hook| hook(doc, node))
    }
}

impl fmt::Debug for ResolverHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverHooks")
            .field("simple_name", &self.simple_name.len())
            .field("on_parse", &self.on_parse.len())
            .finish()
    }
}
