use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::parser::{
    COLUMN_SEPARATOR, is_figure_label, is_list_item, is_table_divider, is_table_label,
};

/// Best-effort classification of an emitted chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Running text
    Paragraph,
    /// A single list item
    ListItem,
    /// One table row rendered as `col: value` pairs
    TableRow,
    /// A caption with the verbatim table
    TableBlock,
    /// A figure caption and its description
    Figure,
}

impl ChunkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::ListItem => "list_item",
            Self::TableRow => "table_row",
            Self::TableBlock => "table_block",
            Self::Figure => "figure",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of an emitted chunk, for vector-index consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// The chunk exactly as emitted, prefix included
    pub text: String,
    /// Section path from the `[...]` prefix; empty when there is none
    pub section_path: String,
    /// Inferred from the body's leading pattern
    pub kind: ChunkKind,
    /// Hex SHA-256 of `text`
    pub content_hash: String,
}

impl ChunkMetadata {
    /// Project metadata out of an emitted chunk
    pub fn from_chunk(text: String) -> Self {
        let (path, body) = split_path_prefix(&text);
        let section_path = path.unwrap_or_default().to_string();
        let kind = classify_body(body);
        let content_hash = hex::encode(Sha256::digest(text.as_bytes()));

        Self {
            text,
            section_path,
            kind,
            content_hash,
        }
    }

    /// Chunk text with the section prefix removed
    pub fn body(&self) -> &str {
        split_path_prefix(&self.text).1
    }
}

/// Split a `"[A > B]\n"` prefix off a chunk, returning `(path, body)`.
pub fn split_path_prefix(chunk: &str) -> (Option<&str>, &str) {
    let prefixed = chunk
        .strip_prefix('[')
        .and_then(|rest| rest.split_once('\n'))
        .and_then(|(first, body)| first.strip_suffix(']').map(|path| (path, body)));

    match prefixed {
        Some((path, body)) => (Some(path), body),
        None => (None, chunk),
    }
}

/// Classify a chunk body by its leading pattern.
///
/// A captioned body is a table block when a later line is shaped like a
/// table line (leading separator or divider); folded row values may still
/// contain `|` mid-line.
pub fn classify_body(body: &str) -> ChunkKind {
    let mut lines = body.lines();
    let first_line = lines.next().unwrap_or("").trim();

    if is_table_label(first_line) {
        let has_table_lines = lines.map(str::trim).any(|line| {
            line.starts_with(COLUMN_SEPARATOR) || is_table_divider(line)
        });
        if has_table_lines {
            ChunkKind::TableBlock
        } else {
            ChunkKind::TableRow
        }
    } else if is_figure_label(first_line) {
        ChunkKind::Figure
    } else if is_list_item(first_line) {
        ChunkKind::ListItem
    } else {
        ChunkKind::Paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefix() {
        assert_eq!(
            split_path_prefix("[Report > Risks]\n- Item A"),
            (Some("Report > Risks"), "- Item A")
        );
        assert_eq!(split_path_prefix("No prefix here"), (None, "No prefix here"));
        assert_eq!(split_path_prefix("[unterminated\nbody"), (None, "[unterminated\nbody"));
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            classify_body("Table 1: Revenue\nSegment: Retail; Revenue: 120"),
            ChunkKind::TableRow
        );
        assert_eq!(
            classify_body("Table 1: Revenue\n| Segment | Revenue |\n|---|---|"),
            ChunkKind::TableBlock
        );
        assert_eq!(classify_body("Figure 3 Share price\nLine chart."), ChunkKind::Figure);
        assert_eq!(classify_body("(a) First obligation"), ChunkKind::ListItem);
        assert_eq!(classify_body("Revenue grew."), ChunkKind::Paragraph);
    }

    #[test]
    fn test_folded_row_is_not_a_block() {
        assert_eq!(classify_body("Table 1: X\nA: 1; B: 2 | 3"), ChunkKind::TableRow);
        assert_eq!(
            classify_body("Table 1: X\nA | B\n--- | ---\n1 | 2"),
            ChunkKind::TableBlock
        );
    }

    #[test]
    fn test_from_chunk() {
        let meta = ChunkMetadata::from_chunk("[Report]\n- Item A".to_string());
        assert_eq!(meta.section_path, "Report");
        assert_eq!(meta.kind, ChunkKind::ListItem);
        assert_eq!(meta.body(), "- Item A");
        assert_eq!(meta.content_hash.len(), 64);

        let again = ChunkMetadata::from_chunk("[Report]\n- Item A".to_string());
        assert_eq!(meta.content_hash, again.content_hash);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ChunkKind::TableBlock).unwrap();
        assert_eq!(json, "\"table_block\"");
    }
}
