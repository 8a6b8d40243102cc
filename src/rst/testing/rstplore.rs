//! Loader for the verified rST sample files
//!
//!     Samples live in `docs/samples/<category>/NN-description.rst`. A test names a sample
//!     by category and number only, so renaming the description part never breaks a test,
//!     while two files sharing one number in a category is a hard failure.
//!
//!     ```rust,ignore
//!     use rstc::rst::testing::{Rstplore, SampleCategory};
//!
//!     let doc = Rstplore::load(SampleCategory::Lists, 2).parse();
//!     let compilation = Rstplore::load(SampleCategory::Resolving, 1).compile();
//!     let source = Rstplore::tables(1).source();
//!     ```
//!
//! The `must_`/panicking flavour is what tests use; the fallible `get_source` is there for
//! tools that walk the sample tree.

use crate::rst::ast::Document;
use crate::rst::compiler::{Compilation, CompileError, Compiler};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleCategory {
    Paragraphs,
    Sections,
    Lists,
    Tables,
    Explicit,
    Inlines,
    Resolving,
}

impl SampleCategory {
    pub const ALL: [SampleCategory; 7] = [
        SampleCategory::Paragraphs,
        SampleCategory::Sections,
        SampleCategory::Lists,
        SampleCategory::Tables,
        SampleCategory::Explicit,
        SampleCategory::Inlines,
        SampleCategory::Resolving,
    ];

    fn dir_name(&self) -> &'static str {
        match self {
            SampleCategory::Paragraphs => "paragraphs",
            SampleCategory::Sections => "sections",
            SampleCategory::Lists => "lists",
            SampleCategory::Tables => "tables",
            SampleCategory::Explicit => "explicit",
            SampleCategory::Inlines => "inlines",
            SampleCategory::Resolving => "resolving",
        }
    }
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no sample {number:02} in {dir}")]
    NotFound { dir: PathBuf, number: usize },

    #[error("{count} samples share number {number:02} in {dir}")]
    DuplicateNumber { dir: PathBuf, number: usize, count: usize },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub struct Rstplore;

impl Rstplore {
    pub fn samples_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("docs").join("samples")
    }

    pub fn category_dir(category: SampleCategory) -> PathBuf {
        Self::samples_dir().join(category.dir_name())
    }

    pub fn load(category: SampleCategory, number: usize) -> SampleLoader {
        SampleLoader {
            source: SampleSource::Numbered(category, number),
            compiler: Compiler::default(),
        }
    }

    pub fn from_path<P: Into<PathBuf>>(path: P) -> SampleLoader {
        SampleLoader {
            source: SampleSource::Path(path.into()),
            compiler: Compiler::default(),
        }
    }

    pub fn paragraphs(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Paragraphs, number)
    }

    pub fn sections(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Sections, number)
    }

    pub fn lists(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Lists, number)
    }

    pub fn tables(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Tables, number)
    }

    pub fn explicit(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Explicit, number)
    }

    pub fn inlines(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Inlines, number)
    }

    pub fn resolving(number: usize) -> SampleLoader {
        Self::load(SampleCategory::Resolving, number)
    }

    pub fn find_file(category: SampleCategory, number: usize) -> Result<PathBuf, SampleError> {
        let dir = Self::category_dir(category);
        let prefix = format!("{:02}-", number);

        let mut matching = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".rst") {
                matching.push(entry.path());
            }
        }

        match matching.len() {
            0 => Err(SampleError::NotFound { dir, number }),
            1 => Ok(matching.remove(0)),
            count => Err(SampleError::DuplicateNumber { dir, number, count }),
        }
    }

    pub fn get_source(category: SampleCategory, number: usize) -> Result<String, SampleError> {
        let path = Self::find_file(category, number)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Every sample file of a category, sorted by name
    pub fn list(category: SampleCategory) -> Result<Vec<PathBuf>, SampleError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(Self::category_dir(category))? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "rst") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[derive(Debug)]
enum SampleSource {
    Numbered(SampleCategory, usize),
    Path(PathBuf),
}

/// Fluent builder returned by [Rstplore]
#[derive(Debug)]
pub struct SampleLoader {
    source: SampleSource,
    compiler: Compiler,
}

impl SampleLoader {
    /// Use a configured compiler (plugins, options) instead of the default one
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn try_source(&self) -> Result<String, SampleError> {
        match &self.source {
            SampleSource::Numbered(category, number) => Rstplore::get_source(*category, *number),
            SampleSource::Path(path) => Ok(fs::read_to_string(path)?),
        }
    }

    pub fn source(&self) -> String {
        self.try_source()
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", self.describe(), e))
    }

    pub fn try_parse(&self) -> Result<Document, SampleError> {
        Ok(self.compiler.parse(&self.try_source()?)?)
    }

    pub fn parse(&self) -> Document {
        self.try_parse()
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", self.describe(), e))
    }

    pub fn try_compile(&self) -> Result<Compilation, SampleError> {
        Ok(self.compiler.compile(&self.try_source()?)?)
    }

    pub fn compile(&self) -> Compilation {
        self.try_compile()
            .unwrap_or_else(|e| panic!("Failed to compile {}: {}", self.describe(), e))
    }

    fn describe(&self) -> String {
        match &self.source {
            SampleSource::Numbered(category, number) => format!("{:?} #{:02}", category, number),
            SampleSource::Path(path) => path.display().to_string(),
        }
    }
}
