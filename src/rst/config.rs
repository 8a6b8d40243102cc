//! Parser options
//!
//! Options are plain serde data so a CLI (or a plugin) can load them from YAML and layer
//! directive lists on top before a parse starts. Keys use kebab-case:
//!
//! ```yaml
//! input-indent-size: 4
//! default-interpreted-text-role: title-reference
//! directives-with-raw-text: [code, math]
//! epilog: |
//!   .. |project| replace:: rstc
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParserOptions {
    /// Indent step for blockquotes and definition bodies
    pub input_indent_size: usize,
    /// Role of interpreted text written without one
    pub default_interpreted_text_role: String,
    /// Skip the start/end surrounding-character checks for inline markup
    pub enable_character_level_inline_markup: bool,
    /// Lift a leading field list into the document meta
    pub parse_first_field_list_as_document_meta: bool,
    pub directives_with_raw_text: Vec<String>,
    pub directives_with_init_content: Vec<String>,
    pub directives_with_invisible_content: Vec<String>,
    /// Appended to every input after a blank line
    pub epilog: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            input_indent_size: 4,
            default_interpreted_text_role: "title-reference".to_string(),
            enable_character_level_inline_markup: false,
            parse_first_field_list_as_document_meta: true,
            directives_with_raw_text: Vec::new(),
            directives_with_init_content: Vec::new(),
            directives_with_invisible_content: Vec::new(),
            epilog: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid parser options: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ParserOptions {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn is_raw_text_directive(&self, name: &str) -> bool {
        self.directives_with_raw_text.iter().any(|d| d == name)
    }

    pub fn is_init_content_directive(&self, name: &str) -> bool {
        self.directives_with_init_content.iter().any(|d| d == name)
    }

    pub fn is_invisible_directive(&self, name: &str) -> bool {
        self.directives_with_invisible_content.iter().any(|d| d == name)
    }

    /// Append directive names, skipping ones already present
    pub(crate) fn extend_directives(list: &mut Vec<String>, names: &[&str]) {
        for name in names {
            if !list.iter().any(|d| d == name) {
                list.push((*name).to_string());
            }
        }
    }
}
