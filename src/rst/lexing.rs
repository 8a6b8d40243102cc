//! Lexer
//!
//!     rST is line-oriented, so lexing is just line splitting: the whole input is
//!     materialized as a line array before parsing starts. There are no tokens below the
//!     line level; block grammars are regexes tested against whole lines, and inline markup
//!     is scanned later from the text a block collected.
//!
//! Indentation Model
//!
//!     A line's indent is the number of leading spaces (tabs are expanded to the next
//!     multiple of 8 when splitting). A line made only of whitespace is blank. Block parsers
//!     never look at raw positions; they go through the [LineCursor], which offers
//!     peek-then-consume primitives gated on indent:
//!
//!         peek_is_indented(n)            exactly n
//!         peek_is_at_least_indented(n)   n or more
//!         peek_nested_indent_size(n)     indent a nested body must use
//!
//!     A parser unit must match with peeks before it consumes anything. Once it consumes,
//!     it owns the construct: there is no backtracking.
//!
//! Sub-documents
//!
//!     Table cells and directive arguments are parsed as documents of their own. Their text
//!     goes through [trim_common_indent] and a new cursor is started with a line offset, so
//!     line indexes reported by the nested parse are still absolute.

pub mod cursor;
pub mod lines;

pub use cursor::LineCursor;
pub use lines::{indent_of, is_blank, split_lines, strip_columns, trim_common_indent};
