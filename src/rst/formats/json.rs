//! JSON view of a parsed tree
//!
//! The [AstSnapshot] of the document, pretty-printed with serde_json. Spans are included
//! so the output can be mapped back to the source.

use super::registry::{FormatError, Formatter, ViewOptions};
use crate::rst::ast::{snapshot_from_document, Document};

pub fn to_json_str(doc: &Document) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&snapshot_from_document(doc))
        .map_err(|e| FormatError::SerializationError(e.to_string()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "The AST snapshot as pretty-printed JSON"
    }

    /// Spans are always part of the snapshot, so `line_numbers` changes nothing here
    fn serialize(&self, doc: &Document, _opts: ViewOptions) -> Result<String, FormatError> {
        to_json_str(doc)
    }
}
