//! Grid tables
//!
//!     +-----+-----+
//!     | A   | C   |
//!     +-----+     |
//!     | B   |     |
//!     +-----+-----+
//!
//! Cells are found with a corner flood. Starting from the top-left `+`, each candidate
//! corner is walked clockwise: right along the top edge to a `+`, down the right edge to a
//! `+`, left along the bottom edge and back up to the start. Intermediate `+` junctions are
//! passed through. A corner whose walk closes is a cell; its top-right and bottom-left
//! corners are queued as new candidates. A walk that cannot close is discarded.
//!
//! Rows are the distinct top coordinates of the cells and columns the distinct left
//! coordinates; spans count how many of those boundaries a cell's far edge skips. Cell
//! interiors are parsed again as documents of their own.
//!
//! Lines shorter than the widest line are padded with spaces before the walk.

use super::state::ParserState;
use crate::rst::ast::{NodeId, NodeKind, NodeType, Span, Table, TableCell, TableRow};
use crate::rst::error::{ParseError, ParserResult};
use crate::rst::lexing::strip_columns;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, VecDeque};
use tracing::trace;

static GRID_BORDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]*(?:\+-*)+\+[ ]*$").unwrap());
static GRID_HEAD_SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]*(?:\+=*)+\+[ ]*$").unwrap());

/// Characters of the table, one row per line, padded to a rectangle
struct Grid {
    cells: Vec<Vec<char>>,
    width: usize,
}

impl Grid {
    fn new(lines: &[String]) -> Self {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let cells = lines
            .iter()
            .map(|l| {
                let mut row: Vec<char> = l.chars().collect();
                row.resize(width, ' ');
                row
            })
            .collect();
        Self { cells, width }
    }

    fn height(&self) -> usize {
        self.cells.len()
    }

    fn at(&self, row: usize, col: usize) -> char {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(' ')
    }

    /// Interior text of the cell bounded by the given border coordinates
    fn interior(&self, top: usize, left: usize, right: usize, bottom: usize) -> String {
        let mut text = String::new();
        for row in &self.cells[top + 1..bottom] {
            let line: String = row[left + 1..right].iter().collect();
            if line.is_empty() {
                continue;
            }
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    /// Walk right from a top-left corner, trying each `+` as a top-right corner
    fn scan_top_right(&self, top: usize, left: usize) -> Option<(usize, usize)> {
        for col in left + 1..self.width {
            match self.at(top, col) {
                '+' => {
                    if let Some(bottom_right) = self.scan_bottom_right(top, left, col) {
                        return Some(bottom_right);
                    }
                }
                '-' => {}
                _ => return None,
            }
        }
        None
    }

    fn scan_bottom_right(&self, top: usize, left: usize, right: usize) -> Option<(usize, usize)> {
        for row in top + 1..self.height() {
            match self.at(row, right) {
                '+' => {
                    if self.scan_bottom_left(top, left, right, row) {
                        return Some((row, right));
                    }
                }
                '|' => {}
                _ => return None,
            }
        }
        None
    }

    fn scan_bottom_left(&self, top: usize, left: usize, right: usize, bottom: usize) -> bool {
        let edge_ok = (left..right)
            .rev()
            .all(|col| matches!(self.at(bottom, col), '+' | '-'));
        edge_ok && self.scan_top_left(top, left, bottom)
    }

    fn scan_top_left(&self, top: usize, left: usize, bottom: usize) -> bool {
        (top..bottom)
            .rev()
            .all(|row| matches!(self.at(row, left), '+' | '|'))
    }
}

/// A cell found by the flood, in grid coordinates of its border corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridCell {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

/// Find every cell of `grid`.
///
/// `first_line` and `indent` only position error reports.
fn find_cells(grid: &Grid, first_line: usize, indent: usize) -> ParserResult<Vec<GridCell>> {
    let bottom_edge = grid.height().saturating_sub(1);
    let right_edge = grid.width.saturating_sub(1);

    let mut done = vec![vec![false; grid.width]; grid.height()];
    let mut corners = VecDeque::from([(0usize, 0usize)]);
    let mut cells = Vec::new();

    while let Some((top, left)) = corners.pop_front() {
        if top == bottom_edge || left == right_edge || done[top][left] {
            continue;
        }

        let found = grid.at(top, left);
        if found != '+' {
            return Err(Box::new(ParseError::InvalidTableCorner {
                line: first_line + top,
                column: indent + left,
                found,
            }));
        }

        let Some((bottom, right)) = grid.scan_top_right(top, left) else {
            continue;
        };
        for row in &mut done[top..bottom] {
            for flag in &mut row[left..right] {
                *flag = true;
            }
        }

        corners.push_back((top, right));
        corners.push_back((bottom, left));
        trace!(top, left, bottom, right, "grid table cell");
        cells.push(GridCell {
            top,
            left,
            bottom,
            right,
        });
    }

    Ok(cells)
}

/// Number of boundaries between `start` and `end`, or up to the last boundary when `end`
/// is not one
fn span_between(boundaries: &[usize], start: usize, end: usize) -> usize {
    let from = boundaries.iter().position(|b| *b == start).unwrap_or(0);
    match boundaries.iter().position(|b| *b == end) {
        Some(to) => to.saturating_sub(from),
        None => boundaries.len() - from,
    }
}

pub(crate) fn parse_grid_table(state: &mut ParserState<'_>, indent: usize) -> ParserResult<Option<NodeId>> {
    let start = state.cursor.line_idx();
    if !state.cursor.peek_is_indented(indent, 0) || !state.cursor.peek_matches(&GRID_BORDER_RE, 0) {
        return Ok(None);
    }

    let mut lines = Vec::new();
    while state.cursor.peek_is_content(0) && state.cursor.peek_is_indented(indent, 0) {
        let line = state.cursor.consume()?;
        lines.push(strip_columns(&line, indent).to_string());
    }

    let mut head_separator = None;
    for (idx, line) in lines.iter_mut().enumerate() {
        if !GRID_HEAD_SEP_RE.is_match(line) {
            continue;
        }
        if head_separator.is_some() {
            return Err(Box::new(ParseError::MultipleTableSeparators { line: start + idx }));
        }
        head_separator = Some(idx);
        *line = line.replace('=', "-");
    }

    let grid = Grid::new(&lines);
    let cells = find_cells(&grid, start, indent)?;
    if cells.is_empty() {
        return Err(Box::new(ParseError::MalformedTable {
            line: start,
            reason: "no cell border could be walked from the top-left corner".to_string(),
        }));
    }

    let row_coords: Vec<usize> = cells.iter().map(|c| c.top).collect::<BTreeSet<_>>().into_iter().collect();
    let col_coords: Vec<usize> = cells.iter().map(|c| c.left).collect::<BTreeSet<_>>().into_iter().collect();

    let mut rows = Vec::with_capacity(row_coords.len());
    let mut head_rows = 0;
    for row_top in &row_coords {
        let mut row_cells: Vec<GridCell> = cells.iter().filter(|c| c.top == *row_top).copied().collect();
        row_cells.sort_by_key(|c| c.left);

        let mut row_end = start + row_top + 1;
        let mut cell_ids = Vec::with_capacity(row_cells.len());
        for cell in row_cells {
            let text = grid.interior(cell.top, cell.left, cell.right, cell.bottom);
            let children = state.parse_nested(&text, start + cell.top + 1)?;
            let span = Span::new(start + cell.top, start + cell.bottom + 1);
            row_end = row_end.max(span.end_line);

            let payload = TableCell {
                row_span: span_between(&row_coords, cell.top, cell.bottom),
                col_span: span_between(&col_coords, cell.left, cell.right),
                char_width: cell.right - cell.left,
            };
            cell_ids.push(state.register(NodeKind::TableCell(payload), span, children));
        }

        let is_head = head_separator.is_some_and(|sep| *row_top < sep);
        head_rows += usize::from(is_head);
        rows.push(state.register(
            NodeKind::TableRow(TableRow { is_head }),
            Span::new(start + row_top, row_end),
            cell_ids,
        ));
    }

    let span = Span::new(start, state.cursor.line_idx());
    Ok(Some(register_table(state, span, rows, head_rows)))
}

/// Register a table over its rows, working out the complexity flag.
///
/// A table is simple when it has exactly one head row, no spanning cells and nothing but
/// paragraphs in its cells.
pub(crate) fn register_table(
    state: &mut ParserState<'_>,
    span: Span,
    rows: Vec<NodeId>,
    head_rows: usize,
) -> NodeId {
    let registrar = state.registrar();
    let cells: Vec<NodeId> = rows
        .iter()
        .filter_map(|row| registrar.get(*row))
        .flat_map(|row| row.children().iter().copied())
        .collect();

    let has_spanning_cell = cells.iter().any(|cell| {
        matches!(registrar.get(*cell).map(|n| n.kind()), Some(NodeKind::TableCell(c)) if c.is_spanning())
    });
    let only_paragraphs = cells
        .iter()
        .filter_map(|cell| registrar.get(*cell))
        .flat_map(|cell| cell.children().iter())
        .all(|child| registrar.get(*child).map(|n| n.node_type()) == Some(NodeType::Paragraph));

    let is_complex = head_rows != 1 || has_spanning_cell || !only_paragraphs;
    state.register(NodeKind::Table(Table { head_rows, is_complex }), span, rows)
}
