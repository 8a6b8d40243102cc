//! Source spans for nodes
//!
//! A [Span] is expressed in line indexes of the original input: `start_line` is the first
//! line a node occupies and `end_line` is exclusive. Nodes built by a recursive sub-parse
//! (table cells, directive arguments) carry absolute line indexes because the sub-parser
//! is started with a line offset.
//!
//! Inline nodes additionally record byte columns into the text they were parsed from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line range (end exclusive) with optional byte columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_col: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_col: Option<usize>,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
            start_col: None,
            end_col: None,
        }
    }

    /// Span covering exactly one line
    pub fn line(line: usize) -> Self {
        Self::new(line, line + 1)
    }

    pub fn with_columns(mut self, start_col: usize, end_col: usize) -> Self {
        self.start_col = Some(start_col);
        self.end_col = Some(end_col);
        self
    }

    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }

    /// Check if another span lies within the lines of this one
    pub fn contains(&self, other: &Span) -> bool {
        other.start_line >= self.start_line && other.end_line <= self.end_line
    }

    /// Smallest span covering both. Columns are dropped since they only make sense on one line.
    pub fn union(&self, other: &Span) -> Span {
        Span::new(
            self.start_line.min(other.start_line),
            self.end_line.max(other.end_line),
        )
    }

    /// Build a span that covers all provided spans.
    pub fn bounding_box<'a, I>(mut spans: I) -> Option<Span>
    where
        I: Iterator<Item = &'a Span>,
    {
        let first = *spans.next()?;
        Some(spans.fold(Span::new(first.start_line, first.end_line), |acc, span| {
            acc.union(span)
        }))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start_col, self.end_col) {
            (Some(start_col), Some(end_col)) => write!(
                f,
                "{}:{}..{}:{}",
                self.start_line, start_col, self.end_line, end_col
            ),
            _ => write!(f, "{}..{}", self.start_line, self.end_line),
        }
    }
}
