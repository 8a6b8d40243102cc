//! Line splitting and indentation helpers

const TAB_WIDTH: usize = 8;

/// Split input into lines.
///
/// A trailing newline does not produce an empty last line. Carriage returns are dropped
/// and tabs are expanded to 8-column stops.
pub fn split_lines(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    let body = input.strip_suffix('\n').unwrap_or(input);
    body.split('\n')
        .map(|line| expand_tabs(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut col = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - (col % TAB_WIDTH);
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(c);
            col += 1;
        }
    }
    out
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading spaces. Blank lines report their full width.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

/// Drop the first `columns` characters. Shorter lines become empty.
pub fn strip_columns(line: &str, columns: usize) -> &str {
    match line.char_indices().nth(columns) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

/// Prepare text for a nested parse.
///
/// Trailing whitespace is removed from every line, leading and trailing blank lines are
/// dropped, and the smallest indent among non-blank lines is removed from all lines.
pub fn trim_common_indent(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').map(str::trim_end).collect();

    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];

    let common = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| strip_columns(l, common))
        .collect::<Vec<_>>()
        .join("\n")
}
