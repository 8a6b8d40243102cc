//! Output views by name
//!
//! The CLI's `--format` and `--line-numbers` flags both land here: the flags become one
//! [ViewOptions], and the format name picks the [Formatter] it is handed to. Names match
//! case-insensitively and are listed in registration order.

use crate::rst::ast::Document;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Presentation switches shared by every view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Lead each node with the 1-based source line it starts on
    pub line_numbers: bool,
}

/// Serializes a [Document] to one textual view
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn serialize(&self, doc: &Document, opts: ViewOptions) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    /// Add a formatter. One registered under a taken name replaces the old one in its slot.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        match self.formatters.iter().position(|f| f.name() == formatter.name()) {
            Some(idx) => self.formatters[idx] = Box::new(formatter),
            None => self.formatters.push(Box::new(formatter)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .map(|f| f.as_ref())
    }

    pub fn formatters(&self) -> impl Iterator<Item = &dyn Formatter> {
        self.formatters.iter().map(|f| f.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.formatters().map(|f| f.name()).collect()
    }

    pub fn serialize(&self, doc: &Document, format: &str, opts: ViewOptions) -> Result<String, FormatError> {
        self.get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?
            .serialize(doc, opts)
    }
}

impl Default for FormatRegistry {
    /// Treeviz first, then JSON
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry
    }
}
