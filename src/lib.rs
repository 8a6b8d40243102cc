//! # rstc
//!
//! A compiler front end for reStructuredText.
//!
//! The crate turns rST source into a typed document tree and then runs a name resolution
//! pass over that tree. Renderers (HTML, Markdown) are not part of this crate: they consume
//! the tree and the resolver's lookup tables through the read API in [rst::resolving].
//!
//! ## Pipeline
//!
//!     source text
//!       -> lines + [LineCursor](rst::lexing::LineCursor)
//!       -> ordered parser registry ([rst::parsing])
//!       -> [Document](rst::ast::Document) arena with parent links
//!       -> four-phase [Resolver](rst::resolving::Resolver)
//!
//! ## Testing
//!
//! For testing guidelines, see the [testing module](rst::testing).
//! Parser tests use verified rST samples and the fluent AST assertions.

pub mod rst;
