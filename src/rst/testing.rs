//! Testing utilities
//!
//! # Parser testing guidelines
//!
//! Parser and resolver tests are written with two tools used together:
//!
//! 1. [Rstplore] loads verified sample files from `docs/samples/`. Small inline strings are
//!    fine for unit tests of one construct; anything exercising several constructs together
//!    belongs in a sample file, where it is reviewed once and shared.
//! 2. [assert_ast] checks the shape and content of the tree with a fluent API instead of
//!    nested `match` blocks.
//!
//! ```rust,ignore
//! use rstc::rst::ast::NodeType;
//! use rstc::rst::testing::{assert_ast, Rstplore};
//!
//! let doc = Rstplore::lists(1).parse();
//! assert_ast(&doc).item(0, |list| {
//!     list.is(NodeType::BulletList)
//!         .child_count(3)
//!         .child(0, |item| {
//!             item.attribute("bullet", "-").text_starts_with("First");
//!         });
//! });
//! ```
//!
//! Failure messages carry the path to the node (`items[0].children[2]`), so a broken
//! expectation points at the exact node.
//!
//! ## Extending
//!
//! Payload fields are checked through [NodeAssertion::attribute], which reads the same
//! attributes the JSON view shows. A new node kind only needs its attributes added to the
//! snapshot to be testable here.

mod ast_assertions;
mod matchers;
mod rstplore;

pub use ast_assertions::{assert_ast, DocumentAssertion, NodeAssertion};
pub use matchers::TextMatch;
pub use rstplore::{Rstplore, SampleCategory, SampleError, SampleLoader};
