//! Output views of a parsed tree
//!
//! These are inspection formats, not renderers: a compact treeviz for terminals and
//! snapshot tests, and the JSON form of the [AstSnapshot](crate::rst::ast::AstSnapshot).
//! Both are built from the snapshot, so they always agree on labels and attributes.

pub mod json;
pub mod registry;
pub mod treeviz;

pub use json::{to_json_str, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter, ViewOptions};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with, TreevizFormatter};
