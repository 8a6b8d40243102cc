//! Block parsing
//!
//!     The block parser turns lines into a tree in one top-to-bottom pass. At every block
//!     boundary the current line is offered to an ordered list of parser units
//!     (see [registry]); the first unit whose lookahead matches parses the whole construct,
//!     recursing into [ParserState::parse_body_nodes] for nested content at a deeper indent.
//!     Paragraph is last and always matches.
//!
//! Lookahead
//!
//!     Units are written look-before-you-leap against the [LineCursor](crate::rst::lexing::LineCursor):
//!     a unit peeks and tests before consuming anything, and once it consumes it commits.
//!     A unit that refuses a line (a bullet-like paragraph, an out-of-sequence enumerator)
//!     leaves the cursor untouched so a later unit can take it.
//!
//! Sub-parses
//!
//!     Table cells and the argument text of explicit markup are parsed again as small
//!     documents of their own, sharing the arena and offset to their absolute line so spans
//!     stay correct. Section levels are tracked per sub-parse.
//!
//! After Parsing
//!
//!     Each body is passed through [merge::merge_sequential_lists] before it is attached,
//!     and a leading field list can be lifted into the document meta.

pub mod explicit;
pub mod grid_table;
pub mod lists;
pub mod merge;
pub mod registry;
pub mod simple_table;
pub mod state;
pub mod text_blocks;

pub use registry::NodeParser;
pub use state::ParserState;

use crate::rst::ast::{Document, DocumentRoot, NodeKind, NodeType, Registrar, Span};
use crate::rst::config::ParserOptions;
use crate::rst::error::ParserResult;
use crate::rst::inlines::RoleValidator;
use crate::rst::lexing::split_lines;
use tracing::debug;

/// Parse a complete document with no role validators.
pub fn parse(input: &str, opts: &ParserOptions) -> ParserResult<Document> {
    parse_with_validators(input, opts, &[])
}

/// Parse a complete document, consulting `validators` for interpreted-text roles.
///
/// The epilog from `opts` is appended after a blank line before the input is split.
pub fn parse_with_validators(
    input: &str,
    opts: &ParserOptions,
    validators: &[RoleValidator],
) -> ParserResult<Document> {
    let source = with_epilog(input, opts);
    let lines = split_lines(&source);
    debug!(lines = lines.len(), "parsing document");

    let mut registrar = Registrar::new();
    let (body, span) = {
        let mut state = ParserState::new(&mut registrar, opts, validators, lines, 0);
        let start = state.cursor.line_idx();
        let body = state.parse_body_nodes(0, NodeType::Document, Vec::new())?;
        (body, Span::new(start, state.cursor.line_idx()))
    };

    let meta = body.first().copied().filter(|first| {
        opts.parse_first_field_list_as_document_meta
            && registrar.get(*first).map(|n| n.node_type()) == Some(NodeType::FieldList)
    });

    let root = registrar.register(NodeKind::Document(DocumentRoot { meta }), span, body);
    Ok(registrar.into_document(root))
}

fn with_epilog<'a>(input: &'a str, opts: &ParserOptions) -> std::borrow::Cow<'a, str> {
    if opts.epilog.is_empty() {
        return input.into();
    }
    format!("{}\n\n{}", input, opts.epilog).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let doc = parse("", &ParserOptions::default()).unwrap();
        assert_eq!(doc.node_type(doc.root()), NodeType::Document);
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn test_leading_field_list_becomes_meta() {
        let doc = parse(":author: me\n\nBody text.\n", &ParserOptions::default()).unwrap();
        let meta = doc.meta().unwrap();
        assert_eq!(doc.node_type(meta), NodeType::FieldList);
        assert_eq!(doc.body().len(), 1);
    }

    #[test]
    fn test_meta_can_be_disabled() {
        let opts = ParserOptions {
            parse_first_field_list_as_document_meta: false,
            ..ParserOptions::default()
        };
        let doc = parse(":author: me\n", &opts).unwrap();
        assert!(doc.meta().is_none());
        assert_eq!(doc.body().len(), 1);
    }

    #[test]
    fn test_epilog_is_appended() {
        let opts = ParserOptions {
            epilog: "Closing words.".to_string(),
            ..ParserOptions::default()
        };
        let doc = parse("Opening words.", &opts).unwrap();
        let body = doc.body();
        assert_eq!(body.len(), 2);
        assert_eq!(doc.text_content(body[1]), "Closing words.");
        assert_eq!(doc.node(body[1]).span().start_line, 2);
    }

    #[test]
    fn test_root_span_covers_input() {
        let doc = parse("a\n\nb\n", &ParserOptions::default()).unwrap();
        let span = doc.node(doc.root()).span();
        assert_eq!((span.start_line, span.end_line), (0, 3));
    }
}
