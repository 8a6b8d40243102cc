//! Command-line interface for rstc
//! This binary parses rST files and shows the resulting tree or the names the resolver bound.
//!
//! Usage:
//!   rstc parse `<path>` [--format `<format>`] [--config `<yaml>`] [--line-numbers]  - Print the parsed tree
//!   rstc names `<path>` [--config `<yaml>`] [--strict]                          - Print name bindings and warnings
//!   rstc list-formats                                                       - List the output formats
//!
//! Logging goes to stderr; set `RUST_LOG=rstc=debug` to follow the parser and the resolver.

use clap::{Arg, ArgAction, ArgMatches, Command};
use rstc::rst::compiler::{CompileError, Compiler};
use rstc::rst::error::format_source_context;
use rstc::rst::formats::{FormatRegistry, ViewOptions};
use std::process;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;
const EXIT_WARNINGS: i32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("YAML file with parser options");

    let matches = Command::new("rstc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse reStructuredText and inspect the tree and its names")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print the tree")
                .arg(Arg::new("path").help("Path to the rST file").required(true).index(1))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('treeviz' or 'json')")
                        .default_value("treeviz"),
                )
                .arg(config_arg.clone())
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .short('n')
                        .help("Prefix treeviz lines with source line numbers")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("names")
                .about("Resolve a file and print its name bindings")
                .arg(Arg::new("path").help("Path to the rST file").required(true).index(1))
                .arg(config_arg)
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Exit with status 2 when the resolver reports warnings")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    let code = match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches),
        Some(("names", names_matches)) => handle_names_command(names_matches),
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    };
    process::exit(code);
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn load_compiler(matches: &ArgMatches) -> Result<Compiler, CompileError> {
    match matches.get_one::<String>("config") {
        Some(path) => Compiler::from_yaml_file(path),
        None => Ok(Compiler::default()),
    }
}

fn read_source(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            None
        }
    }
}

fn report_compile_error(path: &str, source: &str, err: &CompileError) {
    eprintln!("{}: {}", path, err);
    if let CompileError::Parse(parse_err) = err {
        eprint!("{}", format_source_context(source, parse_err.line()));
    }
}

fn handle_parse_command(matches: &ArgMatches) -> i32 {
    let path = required(matches, "path");
    let format = required(matches, "format");
    let Some(source) = read_source(path) else {
        return EXIT_FAILURE;
    };

    let compiler = match load_compiler(matches) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return EXIT_FAILURE;
        }
    };

    let doc = match compiler.parse(&source) {
        Ok(doc) => doc,
        Err(e) => {
            report_compile_error(path, &source, &e);
            return EXIT_FAILURE;
        }
    };

    let registry = FormatRegistry::default();
    let opts = ViewOptions {
        line_numbers: matches.get_flag("line-numbers"),
    };

    match registry.serialize(&doc, format, opts) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {} (available: {})", e, registry.names().join(", "));
            EXIT_FAILURE
        }
    }
}

fn handle_names_command(matches: &ArgMatches) -> i32 {
    let path = required(matches, "path");
    let Some(source) = read_source(path) else {
        return EXIT_FAILURE;
    };

    let compiler = match load_compiler(matches) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return EXIT_FAILURE;
        }
    };

    let compilation = match compiler.compile(&source) {
        Ok(compilation) => compilation,
        Err(e) => {
            report_compile_error(path, &source, &e);
            return EXIT_FAILURE;
        }
    };

    let doc = &compilation.document;
    let resolution = &compilation.resolution;
    for (name, target) in resolution.names().iter() {
        let origin = resolution
            .node_for_name(name)
            .map(|id| format!("  [{} {}, line {}]", id, doc.node_type(id), doc.node(id).span().start_line + 1))
            .unwrap_or_default();
        let arrow = if target.is_alias { "=>" } else { "->" };
        let url = match (target.is_alias, resolution.resolve_url(name)) {
            (true, Some(url)) => format!("{} ({})", target.target, url),
            (true, None) => format!("{} (unresolved)", target.target),
            (false, _) => target.target.clone(),
        };
        println!("{} {} {}{}", name, arrow, url, origin);
    }

    for warning in compilation.warnings() {
        eprintln!("warning: {}", warning);
    }

    if matches.get_flag("strict") && !compilation.warnings().is_empty() {
        EXIT_WARNINGS
    } else {
        0
    }
}

fn handle_list_formats_command() -> i32 {
    let registry = FormatRegistry::default();
    println!("Available output formats:\n");
    for formatter in registry.formatters() {
        println!("  {}", formatter.name());
        println!("    {}", formatter.description());
    }
    0
}
