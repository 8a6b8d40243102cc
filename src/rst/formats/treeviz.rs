//! Treeviz formatter
//!
//! Treeviz is a one-line-per-node view of the document tree, meant for quick scanning in a
//! terminal and for stable snapshot tests. Nesting is drawn with `├─` / `└─` connectors
//! and `│` rails; each line is an icon followed by the node's label, truncated to 30
//! characters. Nodes without a label show their type name.
//!
//!     ⧉ Document (2 blocks)
//!     ├─ § Introduction
//!     │ └─ ◦ Introduction
//!     └─ ¶ Some text with a [1]_ refere...
//!       ├─ ◦ Some text with a
//!       ...
//!
//! With line numbers enabled every line starts with the node's 1-based start line.
//!
//! Icons
//!     Blocks:
//!         Document: ⧉   Section: §   Paragraph: ¶   Transition: ―
//!         Blockquote: ❝   Attribution: —   LiteralBlock: ƒ   DoctestBlock: ⋙
//!         LineBlock: ┆   LineBlockLine: ↵
//!     Lists:
//!         BulletList / EnumeratedList / FieldList / OptionList / DefinitionList: ☰
//!         list items: •   FieldListItem: ∷   OptionListItem: ⌥   DefinitionListItem: ≔
//!     Tables:
//!         Table: ▦   TableRow: ═   TableCell: ▢
//!     Explicit markup:
//!         Directive: ⚙   SubstitutionDef: ≝   FootnoteDef / group: ³
//!         CitationDef / group: †   HyperlinkTarget: ⚓   Comment: #
//!     Inlines:
//!         Text: ◦   Emphasis: 𝐼   StrongEmphasis: 𝐁   InlineLiteral: ƒ
//!         InterpretedText: ℛ   SubstitutionRef: ≡   FootnoteRef: ³
//!         CitationRef: †   HyperlinkRef: ⊕   InlineInternalTarget: ⊙

use super::registry::{FormatError, Formatter, ViewOptions};
use crate::rst::ast::{snapshot_from_document, AstSnapshot, Document};

const MAX_LABEL_CHARS: usize = 30;

fn icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Section" => "§",
        "Paragraph" => "¶",
        "Transition" => "―",
        "Blockquote" => "❝",
        "BlockquoteAttribution" => "—",
        "LiteralBlock" | "InlineLiteral" => "ƒ",
        "DoctestBlock" => "⋙",
        "LineBlock" => "┆",
        "LineBlockLine" => "↵",
        "BulletList" | "EnumeratedList" | "FieldList" | "OptionList" | "DefinitionList" => "☰",
        "BulletListItem" | "EnumeratedListItem" => "•",
        "FieldListItem" => "∷",
        "OptionListItem" => "⌥",
        "DefinitionListItem" => "≔",
        "Table" => "▦",
        "TableRow" => "═",
        "TableCell" => "▢",
        "Directive" => "⚙",
        "SubstitutionDef" => "≝",
        "FootnoteDefGroup" | "FootnoteDef" | "FootnoteRef" => "³",
        "CitationDefGroup" | "CitationDef" | "CitationRef" => "†",
        "HyperlinkTarget" => "⚓",
        "Comment" => "#",
        "Text" => "◦",
        "Emphasis" => "𝐼",
        "StrongEmphasis" => "𝐁",
        "InterpretedText" => "ℛ",
        "SubstitutionRef" => "≡",
        "HyperlinkRef" => "⊕",
        "InlineInternalTarget" => "⊙",
        _ => "?",
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn display_label(snapshot: &AstSnapshot) -> String {
    let label = snapshot.label.replace('\n', " ");
    if label.trim().is_empty() {
        return snapshot.node_type.clone();
    }
    truncate(&label, MAX_LABEL_CHARS)
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with(doc, ViewOptions::default())
}

pub fn to_treeviz_str_with(doc: &Document, opts: ViewOptions) -> String {
    snapshot_to_treeviz(&snapshot_from_document(doc), opts)
}

pub fn snapshot_to_treeviz(root: &AstSnapshot, opts: ViewOptions) -> String {
    let mut result = String::new();
    push_line(&mut result, root, "", opts);
    append_children(&mut result, &root.children, "", opts);
    result
}

fn push_line(result: &mut String, snapshot: &AstSnapshot, lead: &str, opts: ViewOptions) {
    if opts.line_numbers {
        result.push_str(&format!("{:>4} ", snapshot.span.start_line + 1));
    }
    result.push_str(&format!(
        "{}{} {}\n",
        lead,
        icon(&snapshot.node_type),
        display_label(snapshot)
    ));
}

fn append_node(result: &mut String, snapshot: &AstSnapshot, prefix: &str, is_last: bool, opts: ViewOptions) {
    let connector = if is_last { "└─ " } else { "├─ " };
    push_line(result, snapshot, &format!("{}{}", prefix, connector), opts);

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, &snapshot.children, &new_prefix, opts);
}

fn append_children(result: &mut String, children: &[AstSnapshot], prefix: &str, opts: ViewOptions) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, child, prefix, is_last, opts);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "One line per node with icons and tree connectors"
    }

    fn serialize(&self, doc: &Document, opts: ViewOptions) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with(doc, opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::config::ParserOptions;
    use crate::rst::parsing::parse;
    use insta::assert_snapshot;

    fn treeviz(text: &str) -> String {
        to_treeviz_str(&parse(text, &ParserOptions::default()).unwrap())
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_section_and_paragraph() {
        assert_snapshot!(treeviz("Title\n=====\n\nBody text.\n"), @r"
        ⧉ Document (2 blocks)
        ├─ § Title
        │ └─ ◦ Title
        └─ ¶ Body text.
          └─ ◦ Body text.
        ");
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let out = treeviz("This paragraph is far longer than thirty characters.\n");
        assert!(out.contains("¶ This paragraph is far longer t...\n"));
    }

    #[test]
    fn test_line_numbers() {
        let doc = parse("First.\n\nSecond.\n", &ParserOptions::default()).unwrap();
        let out = to_treeviz_str_with(&doc, ViewOptions { line_numbers: true });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "   1 ⧉ Document (2 blocks)");
        assert_eq!(lines[3], "   3 └─ ¶ Second.");
    }

    #[test]
    fn test_unlabelled_nodes_show_type() {
        let out = treeviz("+---+\n| a |\n+---+\n");
        assert!(out.contains("└─ ▦ Table"));
        assert!(out.contains("└─ ═ TableRow"));
    }
}
