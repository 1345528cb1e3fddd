use serde::Serialize;
use std::borrow::Cow;

/// Column separator of GitHub-style tables
pub const COLUMN_SEPARATOR: char = '|';

/// Separator between cells when a long row is folded into the last column
const FOLDED_CELL_SEPARATOR: &str = " | ";

/// A parsed GitHub-style table.
///
/// Every row holds exactly `header.len()` cells: short rows are padded with
/// empty strings and surplus cells are folded into the last column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    /// Column names, in order
    pub header: Vec<String>,
    /// Data rows (the header and divider are not included)
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Name of column `index`; blank header cells become `Column N`
    pub fn column_name(&self, index: usize) -> Cow<'_, str> {
        match self.header.get(index).map(String::as_str) {
            Some(name) if !name.is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(format!("Column {}", index + 1)),
        }
    }

    /// Render a row as `"colA: valA; colB: valB"`
    pub fn format_row(&self, row: &[String]) -> String {
        row.iter()
            .enumerate()
            .map(|(i, value)| format!("{}: {}", self.column_name(i), value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Rendered data rows, skipping rows whose cells are all empty
    pub fn formatted_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| self.format_row(row))
    }
}

/// A line that could belong to a table: it contains a column separator.
pub fn is_table_row(line: &str) -> bool {
    line.contains(COLUMN_SEPARATOR)
}

/// A divider line: only separators, dashes, colons and whitespace, with at
/// least one dash.
pub fn is_table_divider(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| c == COLUMN_SEPARATOR || c == '-' || c == ':' || c.is_whitespace())
}

/// Whether a table (header line followed by a divider) starts at `index`.
pub fn is_table_start(lines: &[&str], index: usize) -> bool {
    match (lines.get(index), lines.get(index + 1)) {
        (Some(header), Some(divider)) => is_table_row(header) && is_table_divider(divider),
        _ => false,
    }
}

/// End (exclusive) of the table block starting at `start`, or `None` when no
/// well-formed header and divider are found there.
///
/// Data rows run until the first blank line or line without a separator.
pub fn table_extent(lines: &[&str], start: usize) -> Option<usize> {
    if !is_table_start(lines, start) {
        return None;
    }

    let mut end = start + 2;
    while end < lines.len() && !lines[end].trim().is_empty() && is_table_row(lines[end]) {
        end += 1;
    }
    Some(end)
}

/// Split a table line into trimmed cells, dropping the outer separators.
pub fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix(COLUMN_SEPARATOR).unwrap_or(trimmed);
    let inner = inner.strip_suffix(COLUMN_SEPARATOR).unwrap_or(inner);

    inner
        .split(COLUMN_SEPARATOR)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Parse raw table lines (header, divider, data rows).
///
/// Returns `None` when the header or divider is malformed; callers fall back
/// to emitting the raw lines.
pub fn parse_table(lines: &[&str]) -> Option<ParsedTable> {
    let (header_line, divider_line) = match lines {
        [header, divider, ..] => (*header, *divider),
        _ => return None,
    };
    if !is_table_row(header_line) || !is_table_divider(divider_line) {
        return None;
    }

    let header = split_row(header_line);
    let width = header.len();

    let rows = lines[2..]
        .iter()
        .take_while(|line| !line.trim().is_empty() && is_table_row(line))
        .map(|line| fit_row(split_row(line), width))
        .collect();

    Some(ParsedTable { header, rows })
}

/// Pad or fold a row to exactly `width` cells.
fn fit_row(mut cells: Vec<String>, width: usize) -> Vec<String> {
    if width > 0 && cells.len() > width {
        let surplus = cells.split_off(width);
        let last = &mut cells[width - 1];
        for cell in surplus.into_iter().filter(|c| !c.is_empty()) {
            if !last.is_empty() {
                last.push_str(FOLDED_CELL_SEPARATOR);
            }
            last.push_str(&cell);
        }
    }
    cells.resize(width, String::new());
    cells
}
