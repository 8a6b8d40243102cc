//! Visitor interface over a [Document]
//!
//! Renderers and the resolver walk the tree in document order. Default implementations
//! are empty, so a visitor only overrides the hooks it cares about.
//!
//! # Example
//!
//! ```ignore
//! struct CountSections(usize);
//!
//! impl Visitor for CountSections {
//!     fn visit_section(&mut self, _doc: &Document, _id: NodeId, _section: &Section) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut counter = CountSections(0);
//! walk(&doc, &mut counter);
//! ```

use super::elements::{HyperlinkRef, HyperlinkTarget, Section};
use super::node::{NodeId, NodeKind};
use super::registrar::Document;

pub trait Visitor {
    /// Called before the children. Return false to skip them (and their `leave_node`).
    fn visit_node(&mut self, _doc: &Document, _id: NodeId) -> bool {
        true
    }
    fn leave_node(&mut self, _doc: &Document, _id: NodeId) {}

    fn visit_section(&mut self, _doc: &Document, _id: NodeId, _section: &Section) {}
    fn visit_hyperlink_target(&mut self, _doc: &Document, _id: NodeId, _target: &HyperlinkTarget) {
    }
    fn visit_hyperlink_ref(&mut self, _doc: &Document, _id: NodeId, _reference: &HyperlinkRef) {}
}

/// Walk the whole document in pre-order
pub fn walk(doc: &Document, visitor: &mut dyn Visitor) {
    walk_from(doc, doc.root(), visitor);
}

pub fn walk_from(doc: &Document, id: NodeId, visitor: &mut dyn Visitor) {
    match doc.kind(id) {
        NodeKind::Section(section) => visitor.visit_section(doc, id, section),
        NodeKind::HyperlinkTarget(target) => visitor.visit_hyperlink_target(doc, id, target),
        NodeKind::HyperlinkRef(reference) => visitor.visit_hyperlink_ref(doc, id, reference),
        _ => {}
    }

    if !visitor.visit_node(doc, id) {
        return;
    }
    for child in doc.children(id) {
        walk_from(doc, *child, visitor);
    }
    visitor.leave_node(doc, id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::ast::elements::{DocumentRoot, InlineText};
    use crate::rst::ast::node::NodeType;
    use crate::rst::ast::registrar::Registrar;
    use crate::rst::ast::span::Span;

    struct Recorder {
        events: Vec<String>,
        skip_paragraphs: bool,
    }

    impl Visitor for Recorder {
        fn visit_node(&mut self, doc: &Document, id: NodeId) -> bool {
            self.events.push(format!("enter {}", doc.node_type(id)));
            !(self.skip_paragraphs && doc.node_type(id) == NodeType::Paragraph)
        }

        fn leave_node(&mut self, doc: &Document, id: NodeId) {
            self.events.push(format!("leave {}", doc.node_type(id)));
        }

        fn visit_section(&mut self, _doc: &Document, _id: NodeId, section: &Section) {
            self.events.push(format!("section {}", section.level));
        }
    }

    fn doc() -> Document {
        let mut reg = Registrar::new();
        let title = reg.register(NodeKind::Text(InlineText::new("T")), Span::line(0), vec![]);
        let section = reg.register(NodeKind::Section(Section { level: 1 }), Span::new(0, 2), vec![title]);
        let text = reg.register(NodeKind::Text(InlineText::new("p")), Span::line(3), vec![]);
        let para = reg.register(NodeKind::Paragraph, Span::line(3), vec![text]);
        let root = reg.register(
            NodeKind::Document(DocumentRoot::default()),
            Span::new(0, 4),
            vec![section, para],
        );
        reg.into_document(root)
    }

    #[test]
    fn test_walk_order() {
        let mut rec = Recorder {
            events: vec![],
            skip_paragraphs: false,
        };
        walk(&doc(), &mut rec);
        assert_eq!(
            rec.events,
            vec![
                "enter Document",
                "section 1",
                "enter Section",
                "enter Text",
                "leave Text",
                "leave Section",
                "enter Paragraph",
                "enter Text",
                "leave Text",
                "leave Paragraph",
                "leave Document",
            ]
        );
    }

    #[test]
    fn test_skip_children() {
        let mut rec = Recorder {
            events: vec![],
            skip_paragraphs: true,
        };
        walk(&doc(), &mut rec);
        assert!(rec.events.contains(&"enter Paragraph".to_string()));
        assert!(!rec.events.contains(&"leave Paragraph".to_string()));
        assert_eq!(rec.events.iter().filter(|e| *e == "enter Text").count(), 1);
    }
}
