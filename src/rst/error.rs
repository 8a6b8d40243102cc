//! Fatal parse errors
//!
//! Soft rejections (a construct failing its lookahead) are never errors: the dispatcher
//! just offers the line to the next parser. Everything here aborts the compilation.

use thiserror::Error;

/// Errors that abort parsing. Line indexes are 0-based into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {}: Table has multiple head/body row separators", .line + 1)]
    MultipleTableSeparators { line: usize },

    #[error("line {}: TopLeft corner of TableCell is not \"+\" (found {found:?} at column {column})", .line + 1)]
    InvalidTableCorner {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("line {}: malformed table: {reason}", .line + 1)]
    MalformedTable { line: usize, reason: String },

    #[error("line {}: failed to find parser for {text:?}", .line + 1)]
    NoParserMatched { line: usize, text: String },

    #[error("line {}: {message}", .line + 1)]
    Internal { line: usize, message: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MultipleTableSeparators { line }
            | ParseError::InvalidTableCorner { line, .. }
            | ParseError::MalformedTable { line, .. }
            | ParseError::NoParserMatched { line, .. }
            | ParseError::Internal { line, .. } => *line,
        }
    }

    pub(crate) fn internal(line: usize, message: impl Into<String>) -> Box<Self> {
        Box::new(ParseError::Internal {
            line,
            message: message.into(),
        })
    }
}

/// Boxed so the recursive parser's frames stay small
pub type ParserResult<T> = Result<T, Box<ParseError>>;

/// Format source around an error line
///
/// Shows 2 lines before the error, the error line with a >> marker, and 2 lines after.
/// Line numbers are 1-based.
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let start_line = line.saturating_sub(2);
    let end_line = (line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, text) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, text));
    }
    context
}
