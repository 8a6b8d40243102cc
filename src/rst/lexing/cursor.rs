//! Indentation-aware line cursor
//!
//! Every block grammar is written as look-before-you-leap against this cursor: peek and
//! test first, consume only what was matched.

use super::lines::{indent_of, is_blank};
use crate::rst::error::{ParseError, ParserResult};
use regex::{Captures, Regex};

#[derive(Debug, Clone)]
pub struct LineCursor {
    lines: Vec<String>,
    idx: usize,
    line_offset: usize,
}

impl LineCursor {
    /// `line_offset` is the absolute index of the first line, for sub-documents
    pub fn new(lines: Vec<String>, line_offset: usize) -> Self {
        Self {
            lines,
            idx: 0,
            line_offset,
        }
    }

    /// Absolute index of the current line
    pub fn line_idx(&self) -> usize {
        self.idx + self.line_offset
    }

    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn can_consume(&self, offset: usize) -> bool {
        self.idx + offset < self.lines.len()
    }

    pub fn peek(&self, offset: usize) -> Option<&str> {
        self.lines.get(self.idx + offset).map(String::as_str)
    }

    pub fn peek_is_blank(&self, offset: usize) -> bool {
        self.peek(offset).is_some_and(is_blank)
    }

    pub fn peek_is_content(&self, offset: usize) -> bool {
        self.peek(offset).is_some_and(|line| !is_blank(line))
    }

    /// Test the line at `offset` without consuming it
    pub fn peek_test<'a>(&'a self, re: &Regex, offset: usize) -> Option<Captures<'a>> {
        re.captures(self.peek(offset)?)
    }

    pub fn peek_matches(&self, re: &Regex, offset: usize) -> bool {
        self.peek(offset).is_some_and(|line| re.is_match(line))
    }

    /// Indent of the line at `offset`, 0 past the end
    pub fn peek_indent_size(&self, offset: usize) -> usize {
        self.peek(offset).map(indent_of).unwrap_or(0)
    }

    pub fn peek_is_indented(&self, expected: usize, offset: usize) -> bool {
        self.peek_indent_size(offset) == expected
    }

    pub fn peek_is_at_least_indented(&self, expected: usize, offset: usize) -> bool {
        self.peek_indent_size(offset) >= expected
    }

    /// Indent a nested body below a line at `current` should use.
    ///
    /// Looks ahead over the following lines until a content line at or left of `current`
    /// and returns the smallest indent found, never less than `current + step`. This does
    /// not imply a nested body exists; it is where one would be.
    pub fn peek_nested_indent_size(&self, current: usize, step: usize) -> usize {
        let default = current + step;
        let mut smallest: Option<usize> = None;

        let mut offset = 0;
        while self.can_consume(offset) {
            if self.peek_is_content(offset) {
                let indent = self.peek_indent_size(offset);
                if indent <= current {
                    break;
                }
                smallest = Some(smallest.map_or(indent, |s| s.min(indent)));
            }
            offset += 1;
        }

        smallest.map_or(default, |s| s.max(default))
    }

    /// Return the current line and advance
    pub fn consume(&mut self) -> ParserResult<String> {
        match self.lines.get(self.idx) {
            Some(line) => {
                let line = line.clone();
                self.idx += 1;
                Ok(line)
            }
            None => Err(ParseError::internal(
                self.line_idx(),
                format!("cannot consume past end of input (line {})", self.idx),
            )),
        }
    }

    pub fn advance(&mut self, n: usize) -> ParserResult<()> {
        if n == 0 || self.idx + n > self.lines.len() {
            return Err(ParseError::internal(
                self.line_idx(),
                format!("invalid advance by {} from line {}", n, self.idx),
            ));
        }
        self.idx += n;
        Ok(())
    }

    pub fn consume_all_blank_lines(&mut self) {
        while self.peek_is_blank(0) {
            self.idx += 1;
        }
    }

    /// Lines in `[start, end)` relative to the current position, clamped to the input
    pub fn peek_range(&self, start: usize, end: usize) -> &[String] {
        let len = self.lines.len();
        let lo = (self.idx + start).min(len);
        let hi = (self.idx + end).min(len).max(lo);
        &self.lines[lo..hi]
    }
}
