//! Simple tables
//!
//!     =====  =====  ======
//!     A      B      A or B
//!     =====  =====  ======
//!     False  False  False
//!     True   False  True
//!     =====  =====  ======
//!
//! Columns come from the runs of `=` in the top border. A row continues onto the next line
//! while that line's first column is blank. A `---` underline below a row regroups its
//! columns so one cell can span several. The last column has no right edge.

use super::grid_table::register_table;
use super::state::ParserState;
use crate::rst::ast::{NodeId, NodeKind, Span, TableCell, TableRow};
use crate::rst::error::{ParseError, ParserResult};
use crate::rst::lexing::strip_columns;
use once_cell::sync::Lazy;
use regex::Regex;

static SIMPLE_BORDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]*=+(?:[ ]+=+)+$").unwrap());
static COLUMN_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]*-[ -]*$").unwrap());

/// Start and end character columns of a border run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Column {
    start: usize,
    end: usize,
}

/// Runs of `marker` in a border line
fn parse_columns(line: &str, marker: char) -> Vec<Column> {
    let chars: Vec<char> = line.chars().collect();
    let mut columns = Vec::new();
    let mut from = 0;

    while let Some(start) = (from..chars.len()).find(|i| chars[*i] == marker) {
        let end = (start..chars.len())
            .find(|i| chars[*i] == ' ')
            .unwrap_or(chars.len());
        columns.push(Column { start, end });
        from = end;
    }
    columns
}

/// Characters `start..end` of `line`, or `start..` without an end
fn char_slice(line: &str, start: usize, end: Option<usize>) -> String {
    let rest = line.chars().skip(start);
    match end {
        Some(end) => rest.take(end.saturating_sub(start)).collect(),
        None => rest.collect(),
    }
}

struct SimpleTable<'t> {
    lines: &'t [String],
    columns: Vec<Column>,
}

impl SimpleTable<'_> {
    fn is_break_line(&self, idx: usize) -> bool {
        let line = &self.lines[idx];
        SIMPLE_BORDER_RE.is_match(line) || COLUMN_SPAN_RE.is_match(line)
    }

    fn first_column_is_blank(&self, idx: usize) -> bool {
        let Some(first) = self.columns.first() else {
            return true;
        };
        char_slice(&self.lines[idx], first.start, Some(first.end))
            .trim()
            .is_empty()
    }

    /// Number of border columns a cell starting at `start` covers
    fn col_span(&self, start: usize, end: Option<usize>) -> usize {
        let from = self
            .columns
            .iter()
            .position(|c| start <= c.start)
            .unwrap_or(self.columns.len());
        let to = match end {
            None => self.columns.len(),
            Some(end) => {
                let mut to = from + 1;
                while to < self.columns.len() && end > self.columns[to].start {
                    to += 1;
                }
                to
            }
        };
        to.saturating_sub(from)
    }
}

pub(crate) fn parse_simple_table(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) || !state.cursor.peek_matches(&SIMPLE_BORDER_RE, 0) {
        return Ok(None);
    }

    // Top border, then up to the bottom border: either a second border (header
    // separator plus bottom) or a border followed by a blank line or end of input
    let mut lines = vec![strip_columns(&state.cursor.consume()?, indent).to_string()];
    let mut borders = 0;
    loop {
        if !state.cursor.can_consume(0) {
            return Err(Box::new(ParseError::MalformedTable {
                line: state.cursor.line_idx(),
                reason: "reached end of input before the simple table's bottom border".to_string(),
            }));
        }

        let is_border = state.cursor.peek_matches(&SIMPLE_BORDER_RE, 0);
        borders += usize::from(is_border);
        let line = state.cursor.consume()?;
        lines.push(strip_columns(&line, indent).to_string());

        if borders == 2 {
            break;
        }
        if is_border && (state.cursor.peek_is_blank(0) || !state.cursor.can_consume(0)) {
            break;
        }
    }

    let head_separator = (1..lines.len() - 1).find(|i| SIMPLE_BORDER_RE.is_match(&lines[*i]));
    let table = SimpleTable {
        columns: parse_columns(&lines[0], '='),
        lines: &lines,
    };

    let mut rows = Vec::new();
    let mut head_rows = 0;
    let mut i = 1;
    while i < lines.len() - 1 {
        let row_start = i;
        let mut j = i;
        while j < lines.len() - 2 {
            if table.is_break_line(j + 1) {
                i += 1;
                break;
            }
            if !table.first_column_is_blank(j + 1) {
                break;
            }
            i += 1;
            j += 1;
        }

        let is_head = head_separator.is_some_and(|sep| row_start < sep);
        head_rows += usize::from(is_head);
        rows.push(parse_row(state, &table, start, row_start, i + 1, is_head)?);
        i += 1;
    }

    let span = Span::new(start, state.cursor.line_idx());
    Ok(Some(register_table(state, span, rows, head_rows)))
}

/// One row from table lines `row_start..row_end`. A trailing border or column-span
/// underline is not part of the row's text.
fn parse_row(
    state: &mut ParserState<'_>,
    table: &SimpleTable<'_>,
    first_line: usize,
    row_start: usize,
    row_end: usize,
    is_head: bool,
) -> ParserResult<NodeId> {
    let last = &table.lines[row_end - 1];
    let ends_with_border = SIMPLE_BORDER_RE.is_match(last);
    let ends_with_span = COLUMN_SPAN_RE.is_match(last);
    let text_end = if ends_with_border || ends_with_span {
        row_end - 1
    } else {
        row_end
    };
    let row_lines = &table.lines[row_start..text_end];

    let columns = if ends_with_span {
        parse_columns(last, '-')
    } else {
        table.columns.clone()
    };

    let span = Span::new(first_line + row_start, first_line + text_end);
    let mut cells = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        let is_last = idx + 1 == columns.len();
        let end = (!is_last).then_some(column.end);

        let text = row_lines
            .iter()
            .map(|line| char_slice(line, column.start, end))
            .collect::<Vec<_>>()
            .join("\n");
        let children = state.parse_nested(&text, first_line + row_start)?;

        let payload = TableCell {
            row_span: 1,
            col_span: table.col_span(column.start, end),
            char_width: column.end - column.start,
        };
        cells.push(state.register(NodeKind::TableCell(payload), span, children));
    }

    Ok(state.register(NodeKind::TableRow(TableRow { is_head }), span, cells))
}
