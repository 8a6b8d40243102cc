//! Explicit markup and inline elements loaded from the sample library

use rstc::rst::ast::{NodeKind, NodeType};
use rstc::rst::testing::{assert_ast, Rstplore};

#[test]
fn test_explicit_01_directive() {
    let doc = Rstplore::explicit(1).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::Directive, NodeType::Paragraph])
        .item(0, |directive| {
            directive
                .attribute("name", "note")
                .child_types(&[NodeType::Paragraph, NodeType::Paragraph])
                .child(0, |p| {
                    p.text("Be careful.");
                });
        })
        .item(1, |p| {
            p.text("After.");
        });
}

#[test]
fn test_explicit_02_footnotes_and_citations() {
    let doc = Rstplore::explicit(2).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::FootnoteDefGroup, NodeType::CitationDefGroup])
        .item(0, |group| {
            group.child_count(4);
        })
        .item(1, |group| {
            group.child(0, |def| {
                def.text("A citation\ncontinued.");
            });
        });
}

#[test]
fn test_explicit_03_targets_and_comments() {
    let doc = Rstplore::explicit(3).parse();
    assert_ast(&doc)
        .item_types(&[
            NodeType::HyperlinkTarget,
            NodeType::HyperlinkTarget,
            NodeType::HyperlinkTarget,
            NodeType::Comment,
            NodeType::Paragraph,
        ])
        .item(0, |target| {
            target.attribute("target", "https://www.python.org/");
        })
        .item(2, |target| {
            target.attribute("alias", "true");
        })
        .item(3, |comment| {
            comment.text("a comment");
        });
    let visible: Vec<bool> = doc.body().iter().map(|id| doc.renders_visible_content(*id)).collect();
    assert_eq!(visible, vec![false, false, false, false, true]);
}

#[test]
fn test_explicit_04_substitutions() {
    let doc = Rstplore::explicit(4).parse();
    assert_ast(&doc)
        .count_of(NodeType::SubstitutionDef, 2)
        .count_of(NodeType::SubstitutionRef, 2)
        .item(0, |def| {
            def.attribute("needle", "logo").attribute("directive", "image");
        });
}

#[test]
fn test_inlines_01_markup() {
    let doc = Rstplore::inlines(1).parse();
    assert_ast(&doc).item(0, |p| {
        p.child_types(&[
            NodeType::Text,
            NodeType::Emphasis,
            NodeType::Text,
            NodeType::StrongEmphasis,
            NodeType::Text,
            NodeType::InlineLiteral,
            NodeType::Text,
            NodeType::InterpretedText,
            NodeType::Text,
        ])
        .child(7, |role| {
            role.attribute("role", "role").text("interpreted");
        });
    });
}

#[test]
fn test_inlines_02_references() {
    let doc = Rstplore::inlines(2).parse();
    let refs = doc.find_all(NodeType::HyperlinkRef);
    assert_eq!(refs.len(), 2);
    match doc.kind(refs[1]) {
        NodeKind::HyperlinkRef(r) => {
            assert!(r.is_embedded);
            assert_eq!(r.label, "the docs");
            assert_eq!(r.target, "https://docs.python.org/");
        }
        other => panic!("expected hyperlink ref, got {:?}", other),
    }
    assert_ast(&doc).count_of(NodeType::InlineInternalTarget, 1);
}
