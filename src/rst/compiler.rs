//! Compiler: parser options plus plugins, driving parse then resolve
//!
//!     A [Compiler] holds the base [ParserOptions] and an ordered list of [Plugin]s. Each
//!     compilation starts from a fresh copy of the options: plugins add their directive names
//!     and run their `before_parse` hooks, the input is parsed into a new arena, and the
//!     resolver runs over it with the plugins' resolver hooks. Nothing is shared between two
//!     compilations, so one compiler can be reused freely.
//!
//!     Warnings are kept on the [Resolution] and also handed to the caller's sink when one is
//!     given. Fatal problems come back as [CompileError].

use crate::rst::ast::Document;
use crate::rst::config::{ConfigError, ParserOptions};
use crate::rst::error::ParseError;
use crate::rst::inlines::RoleValidator;
use crate::rst::parsing::parse_with_validators;
use crate::rst::resolving::{
    resolve, IgnoreWarnings, OnParseHook, Resolution, ResolveError, ResolverHooks, SimpleNameHook,
    WarningSink,
};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] Box<ParseError>),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Adjusts the options of one compilation before parsing starts
pub type BeforeParseHook = fn(opts: &mut ParserOptions);

/// What a plugin contributes. Every part is optional.
#[derive(Clone, Default)]
pub struct Plugin {
    pub name: String,
    pub directives_with_raw_text: Vec<String>,
    pub directives_with_init_content: Vec<String>,
    pub directives_with_invisible_content: Vec<String>,
    pub before_parse: Option<BeforeParseHook>,
    pub role_validator: Option<RoleValidator>,
    pub simple_name: Option<SimpleNameHook>,
    pub on_parse: Option<OnParseHook>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_raw_text_directives(mut self, names: &[&str]) -> Self {
        ParserOptions::extend_directives(&mut self.directives_with_raw_text, names);
        self
    }

    pub fn with_init_content_directives(mut self, names: &[&str]) -> Self {
        ParserOptions::extend_directives(&mut self.directives_with_init_content, names);
        self
    }

    pub fn with_invisible_directives(mut self, names: &[&str]) -> Self {
        ParserOptions::extend_directives(&mut self.directives_with_invisible_content, names);
        self
    }

    pub fn with_before_parse(mut self, hook: BeforeParseHook) -> Self {
        self.before_parse = Some(hook);
        self
    }

    pub fn with_role_validator(mut self, validator: RoleValidator) -> Self {
        self.role_validator = Some(validator);
        self
    }

    pub fn with_simple_name(mut self, hook: SimpleNameHook) -> Self {
        self.simple_name = Some(hook);
        self
    }

    pub fn with_on_parse(mut self, hook: OnParseHook) -> Self {
        self.on_parse = Some(hook);
        self
    }

    fn apply(&self, opts: &mut ParserOptions) {
        fn names(list: &[String]) -> Vec<&str> {
            list.iter().map(String::as_str).collect()
        }

        ParserOptions::extend_directives(&mut opts.directives_with_raw_text, &names(&self.directives_with_raw_text));
        ParserOptions::extend_directives(
            &mut opts.directives_with_init_content,
            &names(&self.directives_with_init_content),
        );
        ParserOptions::extend_directives(
            &mut opts.directives_with_invisible_content,
            &names(&self.directives_with_invisible_content),
        );
        if let Some(hook) = self.before_parse {
            hook(opts);
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("directives_with_raw_text", &self.directives_with_raw_text)
            .field("directives_with_init_content", &self.directives_with_init_content)
            .field("directives_with_invisible_content", &self.directives_with_invisible_content)
            .field("before_parse", &self.before_parse.is_some())
            .field("role_validator", &self.role_validator.is_some())
            .field("simple_name", &self.simple_name.is_some())
            .field("on_parse", &self.on_parse.is_some())
            .finish()
    }
}

/// The parsed tree and everything resolved about it
#[derive(Debug)]
pub struct Compilation {
    pub document: Document,
    pub resolution: Resolution,
}

impl Compilation {
    pub fn warnings(&self) -> &[String] {
        self.resolution.warnings()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: ParserOptions,
    plugins: Vec<Plugin>,
}

impl Compiler {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            plugins: Vec::new(),
        }
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        Ok(Self::new(ParserOptions::from_yaml_file(path)?))
    }

    pub fn use_plugin(&mut self, plugin: Plugin) -> &mut Self {
        debug!(plugin = %plugin.name, "installing plugin");
        self.plugins.push(plugin);
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.use_plugin(plugin);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Base options with every plugin applied, in installation order
    pub fn effective_options(&self) -> ParserOptions {
        let mut opts = self.options.clone();
        for plugin in &self.plugins {
            plugin.apply(&mut opts);
        }
        opts
    }

    pub fn resolver_hooks(&self) -> ResolverHooks {
        ResolverHooks {
            simple_name: self.plugins.iter().filter_map(|p| p.simple_name).collect(),
            on_parse: self.plugins.iter().filter_map(|p| p.on_parse).collect(),
        }
    }

    fn role_validators(&self) -> Vec<RoleValidator> {
        self.plugins.iter().filter_map(|p| p.role_validator).collect()
    }

    /// Parse only; no names are resolved
    pub fn parse(&self, input: &str) -> Result<Document, CompileError> {
        let opts = self.effective_options();
        Ok(parse_with_validators(input, &opts, &self.role_validators())?)
    }

    /// Resolve an already parsed document
    pub fn resolve(&self, doc: &Document, sink: &mut dyn WarningSink) -> Result<Resolution, CompileError> {
        Ok(resolve(doc, &self.resolver_hooks(), sink)?)
    }

    /// Parse and resolve. Warnings stay on the [Resolution] (and in the log).
    pub fn compile(&self, input: &str) -> Result<Compilation, CompileError> {
        self.compile_with_sink(input, &mut IgnoreWarnings)
    }

    pub fn compile_with_sink(&self, input: &str, sink: &mut dyn WarningSink) -> Result<Compilation, CompileError> {
        let document = self.parse(input)?;
        let resolution = self.resolve(&document, sink)?;
        debug!(
            nodes = document.node_count(),
            warnings = resolution.warnings().len(),
            "compiled document"
        );
        Ok(Compilation {
            document,
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::ast::{NodeId, NodeKind, NodeType};
    use crate::rst::resolving::{ForwardTarget, NameTable, WarningCallback};

    #[test]
    fn test_plugins_extend_directive_lists() {
        let compiler = Compiler::default()
            .with_plugin(Plugin::new("code").with_raw_text_directives(&["code"]).with_init_content_directives(&["code"]))
            .with_plugin(Plugin::new("only").with_invisible_directives(&["only"]))
            .with_plugin(Plugin::new("again").with_raw_text_directives(&["code"]));

        let opts = compiler.effective_options();
        assert_eq!(opts.directives_with_raw_text, vec!["code"]);
        assert!(opts.is_init_content_directive("code"));
        assert!(opts.is_invisible_directive("only"));
        // Base options stay untouched
        assert!(compiler.options().directives_with_raw_text.is_empty());
    }

    #[test]
    fn test_raw_text_directive_through_plugin() {
        let compiler = Compiler::default().with_plugin(Plugin::new("code").with_raw_text_directives(&["code"]));
        let doc = compiler.parse(".. code::\n\n    let x = 1;\n").unwrap();
        match doc.kind(doc.body()[0]) {
            NodeKind::Directive(d) => assert_eq!(d.raw_body.as_deref(), Some("let x = 1;")),
            other => panic!("expected directive, got {:?}", other),
        }
    }

    #[test]
    fn test_before_parse_hook_runs_after_directive_lists() {
        fn epilog(opts: &mut ParserOptions) {
            opts.epilog = "Appended.".to_string();
        }
        let compiler = Compiler::default().with_plugin(Plugin::new("epilog").with_before_parse(epilog));
        let doc = compiler.parse("Body.").unwrap();
        let texts: Vec<String> = doc.body().iter().map(|id| doc.text_content(*id)).collect();
        assert_eq!(texts, vec!["Body.", "Appended."]);
    }

    #[test]
    fn test_role_validator_from_plugin() {
        fn only_known(_: &str, role: &str) -> Option<bool> {
            Some(role == "known")
        }
        let compiler = Compiler::default().with_plugin(Plugin::new("roles").with_role_validator(only_known));
        let doc = compiler.parse(":known:`yes` and :unknown:`no`").unwrap();
        assert_eq!(doc.find_all(NodeType::InterpretedText).len(), 1);
    }

    #[test]
    fn test_compile_collects_warnings() {
        let mut seen = Vec::new();
        let compilation = Compiler::default()
            .compile_with_sink("Cite [missing]_.\n", &mut WarningCallback(|w: &str| seen.push(w.to_string())))
            .unwrap();
        assert_eq!(compilation.warnings().len(), 1);
        assert_eq!(seen, compilation.warnings());
    }

    #[test]
    fn test_parse_errors_are_fatal() {
        let input = "+---+\n| a |\n+===+\n| b |\n+===+\n| c |\n+---+\n";
        let err = Compiler::default().compile(input).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Parse(ref e) if matches!(**e, ParseError::MultipleTableSeparators { .. })
        ));
    }

    #[test]
    fn test_plugin_resolver_hooks() {
        fn rename_targets(doc: &Document, node: NodeId) -> Option<String> {
            (doc.node_type(node) == NodeType::HyperlinkTarget).then(|| "landing".to_string())
        }
        fn conflict(_: &Document, names: &mut NameTable) -> Result<(), ResolveError> {
            names.register_explicit("landing", ForwardTarget::url("https://elsewhere.example"), None)
        }

        let compiler = Compiler::default().with_plugin(Plugin::new("names").with_simple_name(rename_targets));
        let compilation = compiler.compile(".. _here:\n\nLanding.\n").unwrap();
        assert_eq!(compilation.resolution.resolve_url("landing"), Some("#landing"));
        assert!(compilation.resolution.target("here").is_none());

        let compiler = compiler.with_plugin(Plugin::new("conflict").with_on_parse(conflict));
        let err = compiler.compile(".. _here:\n\nLanding.\n").unwrap_err();
        assert!(matches!(err, CompileError::Resolve(ResolveError::DuplicateName { .. })));
    }
}
