//! The name resolver
//!
//! [Resolver] walks a finished [Document] once and produces a [Resolution]: every lookup
//! table a generator needs to render links, footnote numbers and backlinks. The tree itself
//! is never touched.
//!
//! Phases
//!
//!     Phases run in a fixed order, each reading only what earlier phases produced:
//!
//!     1. sections     titles become implicit names, suffixed `-1`, `-2`, ... on collision
//!     2. footnotes    numbers (manual first, then auto), symbols, ref -> def backlinks
//!     3. citations    ref -> def backlinks by label
//!     4. hyperlinks   targets, inline internal targets, references, embedded labels
//!
//!     Substitution definitions are indexed afterwards, then the `on_parse` hooks run with
//!     the name table.
//!
//! Names and Anchors
//!
//!     A name maps to a [ForwardTarget]: either a URL (a local one is `#anchor`) or an alias
//!     naming another entry. Explicit names (labels the author wrote) must be unique; binding
//!     one to a second, different target is fatal. Implicit names (section titles) give way:
//!     they are suffixed on collision and an explicit name replaces an implicit one.
//!
//!     Nodes that can be linked to get an anchor, a sanitized and deduplicated id. Local
//!     forward targets always point at the anchor, so a link and the id it lands on agree.

use super::hooks::ResolverHooks;
use super::names::{alias_name, footnote_symbol, normalize_simple_name, sanitize_simple_name};
use super::warnings::{report, WarningSink};
use crate::rst::ast::{Document, FootnoteDef, FootnoteLabel, NodeId, NodeKind, NodeType};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("duplicate name {name:?}: bound to {existing:?}, cannot rebind to {incoming:?}")]
    DuplicateName {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("node {0} is not part of the document")]
    UnknownNode(NodeId),
}

/// Where a name leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardTarget {
    /// A URL, `#anchor`, or with `is_alias` another name
    pub target: String,
    pub is_alias: bool,
}

impl ForwardTarget {
    pub fn url(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            is_alias: false,
        }
    }

    pub fn alias(name: impl Into<String>) -> Self {
        Self {
            target: name.into(),
            is_alias: true,
        }
    }

    pub fn anchor(anchor: &str) -> Self {
        Self::url(format!("#{}", anchor))
    }
}

/// Name bindings and node anchors for one document
///
/// This is also the registration API handed to `on_parse` hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    targets: BTreeMap<String, ForwardTarget>,
    implicit: BTreeSet<String>,
    origins: BTreeMap<String, NodeId>,
    external: BTreeMap<String, NodeId>,
    anchors: BTreeMap<NodeId, String>,
    anchor_ids: BTreeSet<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an author-written name. Rebinding to the same target is a no-op; rebinding to
    /// a different one is [ResolveError::DuplicateName]. An implicit binding of the same
    /// name is replaced.
    pub fn register_explicit(
        &mut self,
        name: &str,
        target: ForwardTarget,
        origin: Option<NodeId>,
    ) -> Result<(), ResolveError> {
        let replaces_implicit = self.implicit.remove(name);
        if let Some(existing) = self.targets.get(name) {
            if !replaces_implicit && *existing != target {
                return Err(ResolveError::DuplicateName {
                    name: name.to_string(),
                    existing: existing.target.clone(),
                    incoming: target.target,
                });
            }
        }

        if replaces_implicit {
            debug!(name, "explicit name replaces implicit binding");
            self.origins.remove(name);
        }
        self.targets.insert(name.to_string(), target);
        if let Some(origin) = origin {
            self.origins.entry(name.to_string()).or_insert(origin);
        }
        Ok(())
    }

    /// Bind a derived name, suffixing it until it is free. Returns the name used.
    pub fn register_implicit(&mut self, name: &str, target: ForwardTarget, origin: Option<NodeId>) -> String {
        let name = self.unique_name(name);
        self.targets.insert(name.clone(), target);
        self.implicit.insert(name.clone());
        if let Some(origin) = origin {
            self.origins.insert(name.clone(), origin);
        }
        name
    }

    /// `candidate` if unbound, else the first free `candidate-N`
    pub fn unique_name(&self, candidate: &str) -> String {
        first_free(candidate, |name| self.targets.contains_key(name))
    }

    /// Give `node` an anchor derived from `name`. A node keeps the first anchor it gets.
    pub fn register_linkable(&mut self, node: NodeId, name: &str) -> String {
        if let Some(existing) = self.anchors.get(&node) {
            return existing.clone();
        }

        let mut base = sanitize_simple_name(name);
        if base.is_empty() {
            base = "id".to_string();
        }
        let anchor = first_free(&base, |id| self.anchor_ids.contains(id));
        self.anchor_ids.insert(anchor.clone());
        self.anchors.insert(node, anchor.clone());
        anchor
    }

    /// Make `node` reachable by `name` from other documents
    pub fn register_external(&mut self, name: &str, node: NodeId) {
        self.external.insert(name.to_string(), node);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn is_implicit(&self, name: &str) -> bool {
        self.implicit.contains(name)
    }

    pub fn target(&self, name: &str) -> Option<&ForwardTarget> {
        self.targets.get(name)
    }

    /// The node whose markup created the binding
    pub fn origin(&self, name: &str) -> Option<NodeId> {
        self.origins.get(name).copied()
    }

    pub fn anchor(&self, node: NodeId) -> Option<&str> {
        self.anchors.get(&node).map(String::as_str)
    }

    pub fn external_targets(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.external.iter().map(|(name, node)| (name.as_str(), *node))
    }

    /// Every binding, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ForwardTarget)> {
        self.targets.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Follow aliases from `name` until a URL. `None` for an unbound name or a cycle.
    pub fn resolve_url(&self, name: &str) -> Option<&str> {
        let mut seen = HashSet::new();
        let mut curr = name.to_string();
        loop {
            if !seen.insert(curr.clone()) {
                debug!(name, "alias cycle");
                return None;
            }
            let target = self.targets.get(&curr)?;
            if !target.is_alias {
                return Some(&target.target);
            }
            curr = alias_name(&target.target);
        }
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.origins
            .values()
            .chain(self.external.values())
            .copied()
            .chain(self.anchors.keys().copied())
    }
}

fn first_free(candidate: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(candidate) {
        return candidate.to_string();
    }
    let mut n = 1;
    loop {
        let name = format!("{}-{}", candidate, n);
        if !is_taken(&name) {
            return name;
        }
        n += 1;
    }
}

/// Everything the resolver learned about one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    names: NameTable,
    simple_names: BTreeMap<NodeId, String>,
    section_names: BTreeMap<NodeId, String>,
    footnote_numbers: BTreeMap<NodeId, u64>,
    footnote_symbols: BTreeMap<NodeId, usize>,
    footnote_backlinks: BTreeMap<NodeId, Vec<NodeId>>,
    footnote_defs: BTreeMap<NodeId, NodeId>,
    citation_backlinks: BTreeMap<NodeId, Vec<NodeId>>,
    citation_defs: BTreeMap<NodeId, NodeId>,
    anonymous_targets: BTreeMap<NodeId, NodeId>,
    substitutions: BTreeMap<String, NodeId>,
    substitutions_folded: BTreeMap<String, NodeId>,
    warnings: Vec<String>,
}

impl Resolution {
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Name the resolver gave `node`, for nodes it bound
    pub fn simple_name(&self, node: NodeId) -> Option<&str> {
        self.simple_names.get(&node).map(String::as_str)
    }

    pub fn node_for_name(&self, name: &str) -> Option<NodeId> {
        self.names.origin(name)
    }

    pub fn target(&self, name: &str) -> Option<&ForwardTarget> {
        self.names.target(name)
    }

    pub fn resolve_url(&self, name: &str) -> Option<&str> {
        self.names.resolve_url(name)
    }

    /// Where a hyperlink, footnote or citation reference leads
    pub fn ref_url(&self, reference: NodeId) -> Option<&str> {
        self.resolve_url(self.simple_name(reference)?)
    }

    pub fn section_name(&self, section: NodeId) -> Option<&str> {
        self.section_names.get(&section).map(String::as_str)
    }

    pub fn footnote_number(&self, def: NodeId) -> Option<u64> {
        self.footnote_numbers.get(&def).copied()
    }

    pub fn footnote_symbol(&self, def: NodeId) -> Option<String> {
        self.footnote_symbols.get(&def).map(|n| footnote_symbol(*n))
    }

    pub fn footnote_backlinks(&self, def: NodeId) -> &[NodeId] {
        self.footnote_backlinks.get(&def).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn footnote_def(&self, reference: NodeId) -> Option<NodeId> {
        self.footnote_defs.get(&reference).copied()
    }

    pub fn citation_backlinks(&self, def: NodeId) -> &[NodeId] {
        self.citation_backlinks.get(&def).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn citation_def(&self, reference: NodeId) -> Option<NodeId> {
        self.citation_defs.get(&reference).copied()
    }

    /// The anonymous target paired with an anonymous reference
    pub fn anonymous_target(&self, reference: NodeId) -> Option<NodeId> {
        self.anonymous_targets.get(&reference).copied()
    }

    pub fn anchor(&self, node: NodeId) -> Option<&str> {
        self.names.anchor(node)
    }

    pub fn external_targets(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.names.external_targets()
    }

    /// Substitution definition for `needle`: exact match first, then case-insensitive
    pub fn substitution(&self, needle: &str) -> Option<NodeId> {
        self.substitutions
            .get(needle)
            .or_else(|| self.substitutions_folded.get(&needle.to_lowercase()))
            .copied()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Resolve `doc` in one go
pub fn resolve(
    doc: &Document,
    hooks: &ResolverHooks,
    sink: &mut dyn WarningSink,
) -> Result<Resolution, ResolveError> {
    Resolver::new(doc, hooks, sink).resolve()
}

pub struct Resolver<'a> {
    doc: &'a Document,
    hooks: &'a ResolverHooks,
    sink: &'a mut dyn WarningSink,
    out: Resolution,
}

impl<'a> Resolver<'a> {
    pub fn new(doc: &'a Document, hooks: &'a ResolverHooks, sink: &'a mut dyn WarningSink) -> Self {
        Self {
            doc,
            hooks,
            sink,
            out: Resolution::default(),
        }
    }

    pub fn resolve(mut self) -> Result<Resolution, ResolveError> {
        self.register_sections();
        self.register_footnotes()?;
        self.register_citations()?;
        self.register_hyperlinks()?;
        self.register_substitutions();

        for hook in &self.hooks.on_parse {
            hook(self.doc, &mut self.out.names)?;
        }
        if let Some(unknown) = self.out.names.node_ids().find(|id| self.doc.get(*id).is_none()) {
            return Err(ResolveError::UnknownNode(unknown));
        }

        debug!(
            names = self.out.names.len(),
            warnings = self.out.warnings.len(),
            "resolution complete"
        );
        Ok(self.out)
    }

    fn warn(&mut self, message: String) {
        report(self.sink, &message);
        self.out.warnings.push(message);
    }

    /// The binding name of a node: a hook's choice, else the built-in rule for its kind
    fn simple_name(&self, id: NodeId) -> String {
        if let Some(name) = self.hooks.simple_name(self.doc, id) {
            return name;
        }

        let node = self.doc.node(id);
        let by_position = || normalize_simple_name(&format!("{}-{}", node.node_type(), node.nth_of_type()));
        match node.kind() {
            NodeKind::Section(_) => match self.out.section_names.get(&id) {
                Some(name) => name.clone(),
                None => normalize_simple_name(&self.doc.text_content(id)),
            },
            NodeKind::FootnoteDef(def) => match def.label_kind() {
                FootnoteLabel::AutoNamed(label) => normalize_simple_name(label),
                FootnoteLabel::Symbol => match self.out.footnote_symbols.get(&id) {
                    Some(n) => format!("footnotedef-symbol-{}", n),
                    None => by_position(),
                },
                FootnoteLabel::Manual(_) | FootnoteLabel::Auto => match self.out.footnote_numbers.get(&id) {
                    Some(n) => format!("footnotedef-{}", n),
                    None => by_position(),
                },
            },
            NodeKind::CitationDef(def) => normalize_simple_name(&def.label()),
            NodeKind::HyperlinkTarget(target) if target.is_anonymous() => normalize_simple_name(&format!(
                "{}-anonymous-{}",
                node.node_type(),
                node.nth_of_type()
            )),
            NodeKind::HyperlinkTarget(target) => normalize_simple_name(&target.label()),
            NodeKind::InlineInternalTarget(_) => normalize_simple_name(&self.doc.text_content(id)),
            _ => by_position(),
        }
    }

    /// Bind a node's own name to its anchor
    fn register_targetable(&mut self, node: NodeId) -> Result<(), ResolveError> {
        let name = self.simple_name(node);
        let anchor = self.out.names.register_linkable(node, &name);
        self.out
            .names
            .register_explicit(&name, ForwardTarget::anchor(&anchor), Some(node))?;
        self.out.simple_names.insert(node, name);
        Ok(())
    }

    fn register_sections(&mut self) {
        let doc = self.doc;
        let sections = doc.find_all(NodeType::Section);

        for section in &sections {
            let mut candidate = match self.hooks.simple_name(doc, *section) {
                Some(name) => name,
                None => normalize_simple_name(&doc.text_content(*section)),
            };
            if candidate.is_empty() {
                candidate = format!("section-{}", doc.node(*section).nth_of_type());
            }

            let name = self.out.names.unique_name(&candidate);
            let anchor = self.out.names.register_linkable(*section, &name);
            let name = self
                .out
                .names
                .register_implicit(&name, ForwardTarget::anchor(&anchor), Some(*section));
            self.out.section_names.insert(*section, name.clone());
            self.out.simple_names.insert(*section, name);
        }

        debug!(sections = sections.len(), "resolved section names");
    }

    fn register_footnotes(&mut self) -> Result<(), ResolveError> {
        let doc = self.doc;
        let defs: Vec<(NodeId, &FootnoteDef)> = doc
            .find_all(NodeType::FootnoteDef)
            .into_iter()
            .filter_map(|id| match doc.kind(id) {
                NodeKind::FootnoteDef(def) => Some((id, def)),
                _ => None,
            })
            .collect();
        let refs = doc.find_all(NodeType::FootnoteRef);

        // Manual numbers are reserved before any auto number is handed out
        let mut used = BTreeSet::new();
        for (id, def) in &defs {
            if let FootnoteLabel::Manual(n) = def.label_kind() {
                self.out.footnote_numbers.insert(*id, n);
                used.insert(n);
            }
        }
        let mut next = 1;
        for (id, def) in &defs {
            if matches!(def.label_kind(), FootnoteLabel::Auto | FootnoteLabel::AutoNamed(_)) {
                while used.contains(&next) {
                    next += 1;
                }
                self.out.footnote_numbers.insert(*id, next);
                used.insert(next);
            }
        }

        let mut symbols = 0;
        for (id, def) in &defs {
            if def.label_kind() == FootnoteLabel::Symbol {
                symbols += 1;
                self.out.footnote_symbols.insert(*id, symbols);
            }
        }

        for (id, _) in &defs {
            self.out.footnote_backlinks.insert(*id, Vec::new());
        }
        let mut consumed = HashSet::new();
        for reference in &refs {
            let text = doc.text_content(*reference);
            let Some((def, payload)) = find_footnote_def(&defs, &text, &consumed) else {
                let line = doc.node(*reference).span().start_line + 1;
                self.warn(format!(
                    "line {}: no footnote definition for [{}]",
                    line, text
                ));
                break;
            };

            if matches!(payload.label_kind(), FootnoteLabel::Auto | FootnoteLabel::Symbol) {
                consumed.insert(def);
            }
            self.out.footnote_defs.insert(*reference, def);
            self.out.footnote_backlinks.entry(def).or_default().push(*reference);
        }

        // Names depend on the numbers and symbols above
        for (id, _) in &defs {
            self.register_targetable(*id)?;
        }
        for reference in &refs {
            self.register_targetable(*reference)?;
        }

        debug!(
            defs = defs.len(),
            refs = refs.len(),
            linked = self.out.footnote_defs.len(),
            "resolved footnotes"
        );
        Ok(())
    }

    fn register_citations(&mut self) -> Result<(), ResolveError> {
        let doc = self.doc;
        let defs: Vec<(NodeId, String)> = doc
            .find_all(NodeType::CitationDef)
            .into_iter()
            .filter_map(|id| match doc.kind(id) {
                NodeKind::CitationDef(def) => Some((id, normalize_simple_name(&def.label()))),
                _ => None,
            })
            .collect();
        let refs = doc.find_all(NodeType::CitationRef);

        for (id, _) in &defs {
            self.out.citation_backlinks.insert(*id, Vec::new());
        }
        for reference in &refs {
            let text = doc.text_content(*reference);
            let wanted = normalize_simple_name(&text);
            let Some((def, _)) = defs.iter().find(|(_, label)| *label == wanted) else {
                let line = doc.node(*reference).span().start_line + 1;
                self.warn(format!("line {}: no citation definition for [{}]", line, text));
                break;
            };

            self.out.citation_defs.insert(*reference, *def);
            self.out.citation_backlinks.entry(*def).or_default().push(*reference);
        }

        for (id, _) in &defs {
            self.register_targetable(*id)?;
        }
        for reference in &refs {
            self.register_targetable(*reference)?;
        }

        debug!(
            defs = defs.len(),
            refs = refs.len(),
            linked = self.out.citation_defs.len(),
            "resolved citations"
        );
        Ok(())
    }

    /// Where a hyperlink target leads. An empty target walks forward in document order:
    /// a later target with a destination lends it, otherwise the first visible node is the
    /// destination and gets an anchor named after `name`.
    fn resolve_hyperlink_target(&mut self, id: NodeId, name: &str) -> Option<(ForwardTarget, Option<NodeId>)> {
        let doc = self.doc;
        let NodeKind::HyperlinkTarget(target) = doc.kind(id) else {
            return None;
        };
        if !target.targets_next_node() {
            return Some((direct_target(target.target(), target.is_alias()), None));
        }

        let mut curr = doc.next_after_subtree(id);
        while let Some(node) = curr {
            match doc.kind(node) {
                NodeKind::HyperlinkTarget(next) if !next.targets_next_node() => {
                    return Some((direct_target(next.target(), next.is_alias()), None));
                }
                _ if doc.renders_visible_content(node) => {
                    let anchor = self.out.names.register_linkable(node, name);
                    return Some((ForwardTarget::anchor(&anchor), Some(node)));
                }
                _ => curr = doc.next_after_subtree(node),
            }
        }
        None
    }

    fn register_hyperlinks(&mut self) -> Result<(), ResolveError> {
        let doc = self.doc;
        let targets = doc.find_all(NodeType::HyperlinkTarget);
        let internal_targets = doc.find_all(NodeType::InlineInternalTarget);
        let refs = doc.find_all(NodeType::HyperlinkRef);

        let mut resolved: BTreeMap<NodeId, ForwardTarget> = BTreeMap::new();
        for target in &targets {
            let name = self.simple_name(*target);
            let Some((forward, destination)) = self.resolve_hyperlink_target(*target, &name) else {
                let line = doc.node(*target).span().start_line + 1;
                self.warn(format!(
                    "line {}: hyperlink target {:?} is not followed by any visible content",
                    line, name
                ));
                continue;
            };

            self.out
                .names
                .register_explicit(&name, forward.clone(), Some(*target))?;
            if let Some(node) = destination {
                self.out.names.register_external(&name, node);
            }
            self.out.simple_names.insert(*target, name);
            resolved.insert(*target, forward);
        }

        for target in &internal_targets {
            let name = self.simple_name(*target);
            let anchor = self.out.names.register_linkable(*target, &name);
            self.out
                .names
                .register_explicit(&name, ForwardTarget::anchor(&anchor), Some(*target))?;
            self.out.names.register_external(&name, *target);
            self.out.simple_names.insert(*target, name);
        }

        // Anonymous references pair with anonymous targets strictly by position
        let anonymous_targets: Vec<NodeId> = targets
            .iter()
            .copied()
            .filter(|id| matches!(doc.kind(*id), NodeKind::HyperlinkTarget(t) if t.is_anonymous()))
            .collect();
        let mut next_anonymous = 0;
        for reference in &refs {
            let NodeKind::HyperlinkRef(link) = doc.kind(*reference) else {
                continue;
            };

            let forward = if !link.is_anonymous || link.is_embedded {
                Some(direct_target(link.target.clone(), link.is_alias))
            } else if let Some(target) = anonymous_targets.get(next_anonymous) {
                next_anonymous += 1;
                self.out.anonymous_targets.insert(*reference, *target);
                resolved.get(target).cloned()
            } else {
                debug!(reference = %reference, "anonymous reference without a target");
                None
            };

            if let Some(forward) = forward {
                let name = self.simple_name(*reference);
                self.out.names.register_explicit(&name, forward, Some(*reference))?;
                self.out.simple_names.insert(*reference, name);
            }
        }

        // `label <url>`_ also makes `label` usable by other references
        for reference in &refs {
            let NodeKind::HyperlinkRef(link) = doc.kind(*reference) else {
                continue;
            };
            if !link.is_embedded || link.is_anonymous || link.label == link.target {
                continue;
            }
            let name = normalize_simple_name(&link.label);
            if name.is_empty() || self.out.names.contains(&name) {
                continue;
            }
            self.out.names.register_explicit(
                &name,
                direct_target(link.target.clone(), link.is_alias),
                Some(*reference),
            )?;
        }

        debug!(
            targets = targets.len(),
            internal = internal_targets.len(),
            refs = refs.len(),
            anonymous = self.out.anonymous_targets.len(),
            "resolved hyperlinks"
        );
        Ok(())
    }

    fn register_substitutions(&mut self) {
        let doc = self.doc;
        for id in doc.find_all(NodeType::SubstitutionDef) {
            if let NodeKind::SubstitutionDef(def) = doc.kind(id) {
                self.out.substitutions.insert(def.needle.clone(), id);
                self.out.substitutions_folded.insert(def.needle.to_lowercase(), id);
            }
        }
    }
}

fn direct_target(target: String, is_alias: bool) -> ForwardTarget {
    if is_alias {
        ForwardTarget::alias(target)
    } else {
        ForwardTarget::url(target)
    }
}

/// First definition a footnote reference can link to. An exact label match wins over a
/// bare `#` definition; consumed auto definitions are skipped.
fn find_footnote_def<'d>(
    defs: &[(NodeId, &'d FootnoteDef)],
    text: &str,
    consumed: &HashSet<NodeId>,
) -> Option<(NodeId, &'d FootnoteDef)> {
    let is_available = |id: &NodeId| !consumed.contains(id);
    defs.iter()
        .find(|(id, def)| is_available(id) && def.label() == text)
        .or_else(|| {
            defs.iter()
                .find(|(id, def)| is_available(id) && def.is_targeted_by(text))
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::config::ParserOptions;
    use crate::rst::parsing::parse;

    fn resolve_text(text: &str) -> (Document, Resolution) {
        let doc = parse(text, &ParserOptions::default()).unwrap();
        let mut warnings: Vec<String> = Vec::new();
        let resolution = resolve(&doc, &ResolverHooks::default(), &mut warnings).unwrap();
        assert_eq!(resolution.warnings(), warnings.as_slice());
        (doc, resolution)
    }

    #[test]
    fn test_explicit_rebinding_same_target_is_allowed() {
        let mut table = NameTable::new();
        table
            .register_explicit("python", ForwardTarget::url("https://python.org"), None)
            .unwrap();
        table
            .register_explicit("python", ForwardTarget::url("https://python.org"), None)
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_explicit_rebinding_other_target_fails() {
        let mut table = NameTable::new();
        table
            .register_explicit("python", ForwardTarget::url("https://python.org"), None)
            .unwrap();
        let err = table
            .register_explicit("python", ForwardTarget::url("https://pypi.org"), None)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::DuplicateName {
                name: "python".into(),
                existing: "https://python.org".into(),
                incoming: "https://pypi.org".into(),
            }
        );
    }

    #[test]
    fn test_implicit_names_are_suffixed() {
        let mut table = NameTable::new();
        let a = table.register_implicit("intro", ForwardTarget::anchor("intro"), None);
        let b = table.register_implicit("intro", ForwardTarget::anchor("intro-1"), None);
        let c = table.register_implicit("intro", ForwardTarget::anchor("intro-2"), None);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("intro", "intro-1", "intro-2"));
        assert!(table.is_implicit("intro-1"));
    }

    #[test]
    fn test_explicit_replaces_implicit() {
        let mut table = NameTable::new();
        table.register_implicit("intro", ForwardTarget::anchor("intro"), None);
        table
            .register_explicit("intro", ForwardTarget::url("https://example.com"), None)
            .unwrap();
        assert!(!table.is_implicit("intro"));
        assert_eq!(table.resolve_url("intro"), Some("https://example.com"));
    }

    #[test]
    fn test_alias_chain_and_cycle() {
        let mut table = NameTable::new();
        table.register_explicit("a", ForwardTarget::alias("b_"), None).unwrap();
        table.register_explicit("b", ForwardTarget::alias("`C`_"), None).unwrap();
        table.register_explicit("c", ForwardTarget::url("https://c.example"), None).unwrap();
        assert_eq!(table.resolve_url("a"), Some("https://c.example"));

        table.register_explicit("x", ForwardTarget::alias("y_"), None).unwrap();
        table.register_explicit("y", ForwardTarget::alias("x_"), None).unwrap();
        assert_eq!(table.resolve_url("x"), None);
        assert_eq!(table.resolve_url("missing"), None);
    }

    #[test]
    fn test_section_names_deduplicate() {
        let (doc, res) = resolve_text("introduction\n============\n\nIntroduction\n============\n");
        let sections = doc.find_all(NodeType::Section);
        assert_eq!(res.section_name(sections[0]), Some("introduction"));
        assert_eq!(res.section_name(sections[1]), Some("introduction-1"));
        assert_eq!(res.anchor(sections[1]), Some("introduction-1"));
        assert_eq!(res.resolve_url("introduction-1"), Some("#introduction-1"));
    }

    #[test]
    fn test_footnote_numbers_reserve_manual_labels() {
        let (doc, res) = resolve_text(".. [2] two\n.. [#] first auto\n.. [#] second auto\n");
        let numbers: Vec<Option<u64>> = doc
            .find_all(NodeType::FootnoteDef)
            .into_iter()
            .map(|def| res.footnote_number(def))
            .collect();
        assert_eq!(numbers, vec![Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn test_auto_footnote_refs_consume_defs_in_order() {
        let (doc, res) = resolve_text("See [#]_ and [#]_.\n\n.. [#] one\n.. [#] two\n");
        let defs = doc.find_all(NodeType::FootnoteDef);
        let refs = doc.find_all(NodeType::FootnoteRef);
        assert_eq!(res.footnote_def(refs[0]), Some(defs[0]));
        assert_eq!(res.footnote_def(refs[1]), Some(defs[1]));
        assert_eq!(res.footnote_backlinks(defs[1]), &[refs[1]]);
    }

    #[test]
    fn test_symbol_footnotes() {
        let (doc, res) = resolve_text("A [*]_ B [*]_\n\n.. [*] star\n.. [*] dagger\n");
        let defs = doc.find_all(NodeType::FootnoteDef);
        assert_eq!(res.footnote_symbol(defs[0]).as_deref(), Some("*"));
        assert_eq!(res.footnote_symbol(defs[1]).as_deref(), Some("†"));
        assert_eq!(res.footnote_number(defs[0]), None);
    }

    #[test]
    fn test_unmatched_footnote_ref_warns() {
        let (_, res) = resolve_text("Missing [7]_ here.\n");
        assert_eq!(res.warnings().len(), 1);
        assert!(res.warnings()[0].contains("[7]"));
    }

    #[test]
    fn test_citation_backlinks() {
        let (doc, res) = resolve_text("As in [CIT2002]_ and [cit2002]_.\n\n.. [CIT2002] A book.\n");
        let def = doc.find_first(NodeType::CitationDef).unwrap();
        assert_eq!(res.citation_backlinks(def).len(), 2);
        assert_eq!(res.simple_name(def), Some("cit2002"));
        assert_eq!(res.resolve_url("cit2002"), Some("#cit2002"));
    }

    #[test]
    fn test_named_target_and_alias() {
        let (doc, res) = resolve_text(concat!(
            "Use Python_ or docs_.\n",
            "\n",
            ".. _Python: https://www.python.org/\n",
            ".. _docs: Python_\n",
        ));
        assert_eq!(res.resolve_url("python"), Some("https://www.python.org/"));
        assert_eq!(res.resolve_url("docs"), Some("https://www.python.org/"));
        let refs = doc.find_all(NodeType::HyperlinkRef);
        assert_eq!(res.ref_url(refs[1]), Some("https://www.python.org/"));
    }

    #[test]
    fn test_empty_target_points_at_next_visible_node() {
        let (doc, res) = resolve_text(".. _here:\n\n.. comment\n\nLanding paragraph.\n");
        let paragraph = doc.find_first(NodeType::Paragraph).unwrap();
        assert_eq!(res.anchor(paragraph), Some("here"));
        assert_eq!(res.resolve_url("here"), Some("#here"));
        let external: Vec<_> = res.external_targets().collect();
        assert_eq!(external, vec![("here", paragraph)]);
    }

    #[test]
    fn test_trailing_empty_target_warns() {
        let (_, res) = resolve_text("Text.\n\n.. _nowhere:\n");
        assert_eq!(res.warnings().len(), 1);
        assert!(res.target("nowhere").is_none());
    }

    #[test]
    fn test_embedded_label_binds_name() {
        let (_, res) = resolve_text("See `Rust <https://www.rust-lang.org/>`_, then Rust_ again.\n");
        assert_eq!(res.resolve_url("rust"), Some("https://www.rust-lang.org/"));
    }

    #[test]
    fn test_substitution_lookup_falls_back_to_case_insensitive() {
        let (doc, res) = resolve_text(".. |Name| replace:: value\n");
        let def = doc.find_first(NodeType::SubstitutionDef).unwrap();
        assert_eq!(res.substitution("Name"), Some(def));
        assert_eq!(res.substitution("name"), Some(def));
        assert_eq!(res.substitution("other"), None);
    }

    #[test]
    fn test_hooks_override_names_and_add_bindings() {
        fn custom_name(doc: &Document, node: NodeId) -> Option<String> {
            (doc.node_type(node) == NodeType::Section).then(|| "custom".to_string())
        }
        fn add_binding(_: &Document, names: &mut NameTable) -> Result<(), ResolveError> {
            names.register_explicit("extra", ForwardTarget::url("https://extra.example"), None)
        }

        let doc = parse("Title\n=====\n", &ParserOptions::default()).unwrap();
        let hooks = ResolverHooks {
            simple_name: vec![custom_name],
            on_parse: vec![add_binding],
        };
        let res = resolve(&doc, &hooks, &mut Vec::<String>::new()).unwrap();
        let section = doc.find_first(NodeType::Section).unwrap();
        assert_eq!(res.section_name(section), Some("custom"));
        assert_eq!(res.resolve_url("extra"), Some("https://extra.example"));
    }
}
