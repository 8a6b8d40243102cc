//! Paragraph-level and section elements loaded from the sample library

use rstc::rst::ast::{NodeKind, NodeType};
use rstc::rst::testing::{assert_ast, Rstplore};

#[test]
fn test_paragraphs_01_plain() {
    let doc = Rstplore::paragraphs(1).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::Paragraph, NodeType::Paragraph])
        .item(0, |p| {
            p.text("The first paragraph spans\ntwo lines.").lines(0, 2);
        })
        .item(1, |p| {
            p.text("The second paragraph.").lines(3, 4);
        });
}

#[test]
fn test_paragraphs_02_literal_block() {
    let doc = Rstplore::paragraphs(2).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::Paragraph, NodeType::LiteralBlock, NodeType::Paragraph])
        .item(1, |block| {
            block.text("fn main() {}\n\n  indented more");
        })
        .item(2, |p| {
            p.text("After the block.");
        });
}

#[test]
fn test_paragraphs_03_blockquote_attribution() {
    let doc = Rstplore::paragraphs(3).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::Paragraph, NodeType::Blockquote])
        .item(1, |quote| {
            quote
                .child_types(&[NodeType::Paragraph, NodeType::BlockquoteAttribution])
                .child(0, |p| {
                    p.text("Wise words.");
                })
                .child(1, |attribution| {
                    attribution.text("Someone");
                });
        });
}

#[test]
fn test_paragraphs_04_nested_line_block() {
    let doc = Rstplore::paragraphs(4).parse();
    assert_ast(&doc).item(0, |block| {
        block
            .is(NodeType::LineBlock)
            .child_types(&[NodeType::LineBlockLine, NodeType::LineBlock, NodeType::LineBlockLine])
            .child(0, |line| {
                line.text("first");
            })
            .child(2, |line| {
                line.text("back");
            });
    });
}

#[test]
fn test_paragraphs_05_doctest() {
    let doc = Rstplore::paragraphs(5).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::DoctestBlock, NodeType::Paragraph])
        .item(0, |block| {
            block.text(">>> 1 + 1\n2");
        });
}

#[test]
fn test_sections_01_levels_by_first_use() {
    let doc = Rstplore::sections(1).parse();
    let levels: Vec<String> = doc
        .find_all(NodeType::Section)
        .into_iter()
        .map(|id| match doc.kind(id) {
            NodeKind::Section(section) => section.level.to_string(),
            other => panic!("expected section, got {:?}", other),
        })
        .collect();
    assert_eq!(levels, vec!["1", "2", "1", "2"]);
    assert_ast(&doc).item(0, |section| {
        section.text("Title").lines(0, 3);
    });
}

#[test]
fn test_sections_02_titles_stay_flat() {
    let doc = Rstplore::sections(2).parse();
    assert_ast(&doc).item_types(&[
        NodeType::Section,
        NodeType::Paragraph,
        NodeType::Section,
        NodeType::Paragraph,
    ]);
}

#[test]
fn test_sections_03_transition() {
    let doc = Rstplore::sections(3).parse();
    assert_ast(&doc).item_types(&[NodeType::Paragraph, NodeType::Transition, NodeType::Paragraph]);
}
