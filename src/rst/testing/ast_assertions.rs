//! Fluent assertion API for parsed documents
//!
//! Nodes live in an arena, so every assertion carries the [Document] and a [NodeId] plus a
//! path string (`items[1].children[0]`) that ends up in the failure message.

use super::matchers::TextMatch;
use crate::rst::ast::{snapshot_node, Document, NodeId, NodeType};

/// Create an assertion builder for a document
pub fn assert_ast(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

fn summarize(doc: &Document, ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| doc.node_type(*id).as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    /// Assert the number of top-level body blocks (document meta excluded)
    pub fn item_count(self, expected: usize) -> Self {
        let body = self.doc.body();
        assert_eq!(
            body.len(),
            expected,
            "Expected {} items, found {} items: [{}]",
            expected,
            body.len(),
            summarize(self.doc, &body)
        );
        self
    }

    pub fn item_types(self, expected: &[NodeType]) -> Self {
        let actual: Vec<NodeType> = self.doc.body().iter().map(|id| self.doc.node_type(*id)).collect();
        assert_eq!(actual, expected, "Unexpected top-level block types");
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let body = self.doc.body();
        assert!(
            index < body.len(),
            "Item index {} out of bounds (document has {} items)",
            index,
            body.len()
        );
        assertion(NodeAssertion {
            doc: self.doc,
            id: body[index],
            context: format!("items[{}]", index),
        });
        self
    }

    /// Assert on the document meta field list
    pub fn meta<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let meta = self
            .doc
            .meta()
            .unwrap_or_else(|| panic!("Expected document meta, found none"));
        assertion(NodeAssertion {
            doc: self.doc,
            id: meta,
            context: "meta".to_string(),
        });
        self
    }

    pub fn no_meta(self) -> Self {
        assert!(self.doc.meta().is_none(), "Expected no document meta");
        self
    }

    /// Assert how many nodes of a type exist anywhere in the tree
    pub fn count_of(self, node_type: NodeType, expected: usize) -> Self {
        let actual = self.doc.find_all(node_type).len();
        assert_eq!(actual, expected, "Expected {} {} nodes, found {}", expected, node_type, actual);
        self
    }
}

pub struct NodeAssertion<'a> {
    doc: &'a Document,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is(self, expected: NodeType) -> Self {
        let actual = self.doc.node_type(self.id);
        assert_eq!(actual, expected, "{}: expected {}, found {}", self.context, expected, actual);
        self
    }

    /// Assert on [Document::text_content] of this node
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(&self.doc.text_content(self.id), &self.context);
        self
    }

    pub fn text_starts_with(self, prefix: &str) -> Self {
        self.text(TextMatch::starts_with(prefix))
    }

    pub fn text_contains(self, needle: &str) -> Self {
        self.text(TextMatch::contains(needle))
    }

    /// Assert a payload attribute as it appears in the snapshot (`level`, `bullet`, `target`, ...)
    pub fn attribute(self, key: &str, expected: &str) -> Self {
        let snapshot = snapshot_node(self.doc, self.id);
        let actual = snapshot.attributes.get(key).map(String::as_str);
        assert_eq!(
            actual,
            Some(expected),
            "{}: attribute {:?} mismatch (attributes: {:?})",
            self.context,
            key,
            snapshot.attributes
        );
        self
    }

    pub fn lines(self, start_line: usize, end_line: usize) -> Self {
        let span = self.doc.node(self.id).span();
        assert_eq!(
            (span.start_line, span.end_line),
            (start_line, end_line),
            "{}: unexpected line span",
            self.context
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.doc.children(self.id);
        assert_eq!(
            children.len(),
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(self.doc, children)
        );
        self
    }

    pub fn child_types(self, expected: &[NodeType]) -> Self {
        let actual: Vec<NodeType> = self.doc.children(self.id).iter().map(|id| self.doc.node_type(*id)).collect();
        assert_eq!(actual, expected, "{}: unexpected child types", self.context);
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.doc.children(self.id);
        assert!(
            index < children.len(),
            "{}: child index {} out of bounds ({} children)",
            self.context,
            index,
            children.len()
        );
        assertion(NodeAssertion {
            doc: self.doc,
            id: children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    /// Run the same assertion over every child
    pub fn each_child<F>(self, assertion: F) -> Self
    where
        F: Fn(NodeAssertion<'a>),
    {
        for (i, child) in self.doc.children(self.id).iter().enumerate() {
            assertion(NodeAssertion {
                doc: self.doc,
                id: *child,
                context: format!("{}.children[{}]", self.context, i),
            });
        }
        self
    }
}
