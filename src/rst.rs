//! Main module for rst library functionality
//!
//! Layout follows the pipeline order:
//!
//!     lexing     line splitting and the indentation-aware cursor
//!     parsing    parser state, the ordered registry of block parsers, tables, list merging
//!     inlines    inline markup inside paragraphs, titles, terms and cells
//!     ast        node kinds, the registrar arena and document-order traversal
//!     resolving  section anchors, footnotes, citations and hyperlink bindings
//!     compiler   options + plugins, runs parse and resolve as one compilation
//!
//! Supporting modules: config (parser options), error (fatal errors), formats (tree views)
//! and testing (assertion helpers and sample loading).

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod formats;
pub mod inlines;
pub mod lexing;
pub mod parsing;
pub mod resolving;
pub mod testing;

pub use compiler::{Compilation, Compiler, Plugin};
pub use config::ParserOptions;
pub use error::{ParseError, ParserResult};
