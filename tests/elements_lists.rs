//! List elements loaded from the sample library

use rstc::rst::ast::NodeType;
use rstc::rst::config::ParserOptions;
use rstc::rst::testing::{assert_ast, Rstplore};
use rstc::rst::Compiler;

#[test]
fn test_lists_01_bullet_list() {
    let doc = Rstplore::lists(1).parse();
    assert_ast(&doc).item_count(1).item(0, |list| {
        list.is(NodeType::BulletList)
            .child_count(3)
            .child(0, |item| {
                item.is(NodeType::BulletListItem).attribute("bullet", "-").text("First item");
            })
            .child(1, |item| {
                item.child_types(&[NodeType::Paragraph, NodeType::Paragraph])
                    .child(1, |p| {
                        p.text("still the second item");
                    });
            })
            .child(2, |item| {
                item.text("Third item");
            });
    });
}

#[test]
fn test_lists_02_gap_in_enumeration_starts_new_list() {
    let doc = Rstplore::lists(2).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::EnumeratedList, NodeType::EnumeratedList])
        .item(0, |list| {
            list.child_count(1).child(0, |item| {
                item.attribute("bullet", "1").text("list 1");
            });
        })
        .item(1, |list| {
            list.child_count(1).child(0, |item| {
                item.attribute("bullet", "3").text("list 2");
            });
        });
}

#[test]
fn test_lists_03_leading_field_list_is_meta() {
    let doc = Rstplore::lists(3).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::Paragraph])
        .meta(|meta| {
            meta.is(NodeType::FieldList).child_count(2);
        });

    let opts = ParserOptions {
        parse_first_field_list_as_document_meta: false,
        ..ParserOptions::default()
    };
    let doc = Rstplore::lists(3).with_compiler(Compiler::new(opts)).parse();
    assert_ast(&doc)
        .no_meta()
        .item_types(&[NodeType::FieldList, NodeType::Paragraph]);
}

#[test]
fn test_lists_04_definition_list() {
    let doc = Rstplore::lists(4).parse();
    assert_ast(&doc).item(0, |list| {
        list.is(NodeType::DefinitionList)
            .child_count(2)
            .child(0, |item| {
                item.attribute("classifiers", "1").text_contains("Definition.");
            })
            .child(1, |item| {
                item.attribute("classifiers", "0").text_contains("More.");
            });
    });
}

#[test]
fn test_lists_05_option_list() {
    let doc = Rstplore::lists(5).parse();
    assert_ast(&doc).item(0, |list| {
        list.is(NodeType::OptionList)
            .child_count(2)
            .child(0, |item| {
                item.attribute("options", "-a");
            })
            .child(1, |item| {
                item.attribute("options", "--long").child(0, |desc| {
                    desc.text("Long option\ncontinued.");
                });
            });
    });
}

#[test]
fn test_lists_06_auto_enumerators_continue() {
    let doc = Rstplore::lists(6).parse();
    assert_ast(&doc)
        .item_types(&[NodeType::BulletList, NodeType::Paragraph, NodeType::EnumeratedList])
        .item(2, |list| {
            list.child_count(3);
        });
}

#[test]
fn test_largest_arabic_enumerator_does_not_continue() {
    let input = "18446744073709551615. a\n18446744073709551615. b\n";
    let doc = Compiler::new(ParserOptions::default()).parse(input).unwrap();
    assert_ast(&doc).item_types(&[NodeType::EnumeratedList, NodeType::EnumeratedList]);
}
