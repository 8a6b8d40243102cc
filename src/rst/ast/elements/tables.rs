//! Table payloads shared by grid and simple tables

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub head_rows: usize,
    /// True unless the table has exactly one head row, no spanning cells and only
    /// paragraphs in its cells
    pub is_complex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub is_head: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub row_span: usize,
    pub col_span: usize,
    /// Interior width in characters, used by renderers to size columns
    pub char_width: usize,
}

impl TableCell {
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}
