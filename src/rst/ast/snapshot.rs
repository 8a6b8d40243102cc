//! AST Snapshot - a normalized intermediate representation of the tree
//!
//! A snapshot captures node types, labels, payload attributes and children in one
//! serializable value, so each output format (treeviz, JSON) only decides presentation.
//! All serializers consume [snapshot_from_document] rather than walking the arena.

use super::node::{NodeId, NodeKind};
use super::registrar::Document;
use super::span::Span;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A snapshot of a node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstSnapshot {
    /// The type of node (e.g., "Paragraph", "Section", "BulletList")
    pub node_type: String,

    /// The primary label or text content of the node
    pub label: String,

    /// Payload fields, sorted by key so output is stable
    pub attributes: BTreeMap<String, String>,

    pub span: Span,

    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: String, label: String, span: Span) -> Self {
        Self {
            node_type,
            label,
            attributes: BTreeMap::new(),
            span,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }
}

pub fn snapshot_from_document(doc: &Document) -> AstSnapshot {
    snapshot_node(doc, doc.root())
}

/// Snapshot one node and all its descendants
pub fn snapshot_node(doc: &Document, id: NodeId) -> AstSnapshot {
    let node = doc.node(id);
    let mut snapshot = AstSnapshot::new(
        node.node_type().to_string(),
        node_label(doc, id),
        node.span(),
    );

    snapshot = match node.kind() {
        NodeKind::Section(section) => snapshot.with_attribute("level", section.level),
        NodeKind::BulletListItem(item) | NodeKind::EnumeratedListItem(item) => {
            snapshot.with_attribute("bullet", &item.bullet)
        }
        NodeKind::EnumeratedList(list) => snapshot.with_attribute("type", list.list_type),
        NodeKind::OptionListItem(item) => snapshot.with_attribute(
            "options",
            item.options
                .iter()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        NodeKind::DefinitionListItem(item) => {
            snapshot.with_attribute("classifiers", item.classifiers.len())
        }
        NodeKind::Table(table) => snapshot
            .with_attribute("head-rows", table.head_rows)
            .with_attribute("complex", table.is_complex),
        NodeKind::TableRow(row) => snapshot.with_attribute("head", row.is_head),
        NodeKind::TableCell(cell) => snapshot
            .with_attribute("row-span", cell.row_span)
            .with_attribute("col-span", cell.col_span),
        NodeKind::Directive(directive) => {
            let mut s = snapshot.with_attribute("name", &directive.name);
            if directive.invisible {
                s = s.with_attribute("invisible", true);
            }
            if let Some(raw) = &directive.raw_body {
                s = s.with_attribute("raw", raw);
            }
            s
        }
        NodeKind::SubstitutionDef(def) => snapshot
            .with_attribute("needle", &def.needle)
            .with_attribute("directive", &def.directive),
        NodeKind::HyperlinkTarget(target) => {
            let mut s = snapshot.with_attribute("target", target.target());
            if target.is_anonymous() {
                s = s.with_attribute("anonymous", true);
            }
            if target.is_alias() {
                s = s.with_attribute("alias", true);
            }
            if target.targets_next_node() {
                s = s.with_attribute("targets-next-node", true);
            }
            s
        }
        NodeKind::HyperlinkRef(reference) => {
            let mut s = snapshot.with_attribute("target", &reference.target);
            if reference.is_anonymous {
                s = s.with_attribute("anonymous", true);
            }
            if reference.is_alias {
                s = s.with_attribute("alias", true);
            }
            if reference.is_embedded {
                s = s.with_attribute("embedded", true);
            }
            s
        }
        NodeKind::InterpretedText(text) => snapshot.with_attribute("role", &text.role),
        _ => snapshot,
    };

    let children = doc
        .children(id)
        .iter()
        .map(|child| snapshot_node(doc, *child))
        .collect();
    snapshot.with_children(children)
}

fn node_label(doc: &Document, id: NodeId) -> String {
    match doc.kind(id) {
        NodeKind::Document(_) => format!("Document ({} blocks)", doc.body().len()),
        NodeKind::FootnoteDef(def) => def.label(),
        NodeKind::CitationDef(def) => def.label(),
        NodeKind::HyperlinkTarget(target) => target.label(),
        NodeKind::Directive(directive) => directive.name.clone(),
        NodeKind::SubstitutionDef(def) => def.needle.clone(),
        NodeKind::BulletListItem(item) | NodeKind::EnumeratedListItem(item) => item.bullet.clone(),
        NodeKind::OptionListItem(item) => item
            .options
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        NodeKind::TableRow(_) | NodeKind::Table(_) => String::new(),
        _ => doc.text_content(id),
    }
}
