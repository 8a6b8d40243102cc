//! Node arena and document-order traversal
//!
//! The [Registrar] is the single owner of every node created during one parse, sub-parses
//! of table cells and directive arguments included. Once parsing completes it is frozen
//! into a [Document], which answers the structural questions the resolver and renderers
//! ask: parent, siblings, and the previous/next node in document order.

use super::node::{Node, NodeId, NodeKind, NodeType};
use super::span::Span;
use std::collections::HashMap;

/// Arena that hands out node identities in construction order
#[derive(Debug, Default)]
pub struct Registrar {
    nodes: Vec<Node>,
    type_counts: HashMap<NodeType, usize>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node built from already-registered children.
    ///
    /// The children are attached to the new node: their parent link is set here and never
    /// changes afterwards, except when a list merge retires the old parent.
    pub fn register(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let count = self.type_counts.entry(kind.node_type()).or_insert(0);
        *count += 1;

        for child in &children {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }

        self.nodes.push(Node {
            id,
            nth_of_type: *count,
            kind,
            span,
            children,
            parent: None,
            retired: false,
        });
        id
    }

    /// Take a node out of the tree. Its id stays allocated so later ids are unaffected.
    pub fn retire(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.retired = true;
            node.parent = None;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_document(self, root: NodeId) -> Document {
        Document {
            registrar: self,
            root,
        }
    }
}

/// A completed tree: the frozen arena plus its root
#[derive(Debug)]
pub struct Document {
    registrar: Registrar,
    root: NodeId,
}

impl Document {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.registrar.get(id)
    }

    /// Node by id. Ids are only ever produced by this document's registrar.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.registrar.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Number of nodes ever registered, retired ones included
    pub fn node_count(&self) -> usize {
        self.registrar.len()
    }

    /// Leading field list lifted out of the body, if any
    pub fn meta(&self) -> Option<NodeId> {
        match self.kind(self.root) {
            NodeKind::Document(doc) => doc.meta,
            _ => None,
        }
    }

    /// Top-level blocks excluding the meta field list
    pub fn body(&self) -> Vec<NodeId> {
        let meta = self.meta();
        self.children(self.root)
            .iter()
            .copied()
            .filter(|id| Some(*id) != meta)
            .collect()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        idx.checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.children(parent).get(idx + 1).copied()
    }

    /// Next node in pre-order: first child, else the nearest following sibling of this
    /// node or of an ancestor. `None` after the last leaf.
    pub fn next_in_tree(&self, id: NodeId) -> Option<NodeId> {
        if let Some(first) = self.children(id).first() {
            return Some(*first);
        }
        self.next_after_subtree(id)
    }

    /// Next node in pre-order that is not a descendant of `id`
    pub fn next_after_subtree(&self, id: NodeId) -> Option<NodeId> {
        let mut curr = Some(id);
        while let Some(node) = curr {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            curr = self.parent(node);
        }
        None
    }

    /// Previous node in pre-order: the deepest last descendant of the previous sibling,
    /// else the parent. `None` for the root.
    pub fn prev_in_tree(&self, id: NodeId) -> Option<NodeId> {
        match self.prev_sibling(id) {
            Some(mut prev) => {
                while let Some(last) = self.children(prev).last() {
                    prev = *last;
                }
                Some(prev)
            }
            None => self.parent(id),
        }
    }

    /// All nodes below `id` in pre-order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(curr) = stack.pop() {
            out.push(curr);
            stack.extend(self.children(curr).iter().rev().copied());
        }
        out
    }

    /// Every node of one type in document order
    pub fn find_all(&self, node_type: NodeType) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|id| self.node_type(*id) == node_type)
            .collect()
    }

    pub fn find_first(&self, node_type: NodeType) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.node_type(*id) == node_type)
    }

    /// Visible text of a node: inline leaves give their text, verbatim blocks their body,
    /// everything else the concatenation of its children.
    pub fn text_content(&self, id: NodeId) -> String {
        let kind = self.kind(id);
        if let Some(text) = kind.inline_text() {
            return text;
        }
        match kind {
            NodeKind::LiteralBlock(block) => block.text.clone(),
            NodeKind::DoctestBlock(block) => block.text.clone(),
            NodeKind::Comment(comment) => comment.text.clone(),
            _ => self
                .children(id)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    /// Whether rendering this node produces anything a reader would see.
    ///
    /// Targets, comments and substitution definitions are markers only; an invisible
    /// directive is configured as such; a paragraph reading `::` just introduces the
    /// literal block after it.
    pub fn renders_visible_content(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::HyperlinkTarget(_) | NodeKind::Comment(_) | NodeKind::SubstitutionDef(_) => {
                false
            }
            NodeKind::Directive(directive) => !directive.invisible,
            NodeKind::Paragraph => {
                let introduces_literal = self
                    .next_sibling(id)
                    .is_some_and(|next| self.node_type(next) == NodeType::LiteralBlock);
                !(introduces_literal && self.text_content(id) == "::")
            }
            _ => true,
        }
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut curr = self.parent(id);
        while let Some(node) = curr {
            out.push(node);
            curr = self.parent(node);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::ast::elements::{DocumentRoot, InlineText, LiteralBlock};

    fn text(reg: &mut Registrar, s: &str, line: usize) -> NodeId {
        reg.register(NodeKind::Text(InlineText::new(s)), Span::line(line), vec![])
    }

    /// Document
    ///   Paragraph "a"
    ///   Blockquote
    ///     Paragraph "b"
    ///     Paragraph "c"
    ///   Paragraph "d"
    fn sample() -> (Document, [NodeId; 8]) {
        let mut reg = Registrar::new();
        let ta = text(&mut reg, "a", 0);
        let pa = reg.register(NodeKind::Paragraph, Span::line(0), vec![ta]);
        let tb = text(&mut reg, "b", 2);
        let pb = reg.register(NodeKind::Paragraph, Span::line(2), vec![tb]);
        let tc = text(&mut reg, "c", 4);
        let pc = reg.register(NodeKind::Paragraph, Span::line(4), vec![tc]);
        let bq = reg.register(NodeKind::Blockquote, Span::new(2, 5), vec![pb, pc]);
        let td = text(&mut reg, "d", 6);
        let pd = reg.register(NodeKind::Paragraph, Span::line(6), vec![td]);
        let root = reg.register(
            NodeKind::Document(DocumentRoot::default()),
            Span::new(0, 7),
            vec![pa, bq, pd],
        );
        (reg.into_document(root), [pa, bq, pb, tb, pc, tc, pd, root])
    }

    #[test]
    fn test_ids_follow_construction_order() {
        let (doc, [pa, bq, pb, ..]) = sample();
        assert!(pb < bq);
        assert!(pa < pb);
        assert_eq!(doc.node(pb).nth_of_type(), 2);
        assert_eq!(doc.node(bq).nth_of_type(), 1);
    }

    #[test]
    fn test_parent_and_siblings() {
        let (doc, [pa, bq, pb, _, pc, _, pd, root]) = sample();
        assert_eq!(doc.parent(pb), Some(bq));
        assert_eq!(doc.parent(root), None);
        assert_eq!(doc.next_sibling(pa), Some(bq));
        assert_eq!(doc.prev_sibling(pd), Some(bq));
        assert_eq!(doc.next_sibling(pc), None);
        assert_eq!(doc.prev_sibling(pa), None);
        assert_eq!(doc.index_in_parent(pd), Some(2));
    }

    #[test]
    fn test_next_in_tree_is_preorder() {
        let (doc, [pa, bq, pb, tb, pc, tc, pd, root]) = sample();
        let mut order = vec![root];
        let mut curr = root;
        while let Some(next) = doc.next_in_tree(curr) {
            order.push(next);
            curr = next;
        }
        let ta = doc.children(pa)[0];
        let td = doc.children(pd)[0];
        assert_eq!(order, vec![root, pa, ta, bq, pb, tb, pc, tc, pd, td]);
        assert_eq!(doc.next_in_tree(td), None);
    }

    #[test]
    fn test_prev_in_tree_mirrors_next() {
        let (doc, [_, _, _, _, _, _, pd, root]) = sample();
        let td = doc.children(pd)[0];
        let mut backwards = vec![td];
        let mut curr = td;
        while let Some(prev) = doc.prev_in_tree(curr) {
            backwards.push(prev);
            curr = prev;
        }
        backwards.reverse();

        let mut forwards = vec![root];
        curr = root;
        while let Some(next) = doc.next_in_tree(curr) {
            forwards.push(next);
            curr = next;
        }
        assert_eq!(backwards, forwards);
    }

    #[test]
    fn test_next_after_subtree_skips_children() {
        let (doc, [_, bq, pb, tb, _, tc, pd, _]) = sample();
        assert_eq!(doc.next_after_subtree(bq), Some(pd));
        assert_eq!(doc.next_after_subtree(tb), doc.next_sibling(pb));
        assert_eq!(doc.next_after_subtree(tc), Some(pd));
    }

    #[test]
    fn test_text_content_and_find_all() {
        let (doc, [_, bq, ..]) = sample();
        assert_eq!(doc.text_content(bq), "bc");
        assert_eq!(doc.find_all(NodeType::Paragraph).len(), 4);
        assert_eq!(doc.find_first(NodeType::Blockquote), Some(bq));
    }

    #[test]
    fn test_double_colon_paragraph_before_literal_is_invisible() {
        let mut reg = Registrar::new();
        let t = text(&mut reg, "::", 0);
        let p = reg.register(NodeKind::Paragraph, Span::line(0), vec![t]);
        let lit = reg.register(
            NodeKind::LiteralBlock(LiteralBlock {
                text: "code".to_string(),
            }),
            Span::line(2),
            vec![],
        );
        let root = reg.register(
            NodeKind::Document(DocumentRoot::default()),
            Span::new(0, 3),
            vec![p, lit],
        );
        let doc = reg.into_document(root);
        assert!(!doc.renders_visible_content(p));
        assert!(doc.renders_visible_content(lit));
    }

    #[test]
    fn test_retire_detaches() {
        let mut reg = Registrar::new();
        let t = text(&mut reg, "x", 0);
        let p = reg.register(NodeKind::Paragraph, Span::line(0), vec![t]);
        reg.retire(p);
        assert!(reg.get(p).is_some_and(|n| n.is_retired()));
        let q = reg.register(NodeKind::Paragraph, Span::line(0), vec![t]);
        assert_eq!(reg.get(t).and_then(|n| n.parent()), Some(q));
    }
}
