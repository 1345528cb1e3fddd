//! Index-driven structural scan over normalized lines.
//!
//! Each `consume_*` routine takes the index of the line that triggered it and
//! returns the index of the first line it did not consume, which is always
//! greater than the start.

use tracing::{debug, trace};

use super::config::ChunkerConfig;
use super::splitter::{Budget, emit_bounded};
use crate::parser::{
    HeadingPath, StructuralUnit, classify_line, is_table_start, parse_table, table_extent,
};

pub(crate) struct Scanner<'a, B: ?Sized> {
    lines: &'a [&'a str],
    config: &'a ChunkerConfig,
    budget: &'a B,
    path: HeadingPath,
    chunks: Vec<String>,
}

impl<'a, B: Budget + ?Sized> Scanner<'a, B> {
    pub(crate) fn new(lines: &'a [&'a str], config: &'a ChunkerConfig, budget: &'a B) -> Self {
        Self {
            lines,
            config,
            budget,
            path: HeadingPath::new(),
            chunks: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Vec<String> {
        let mut index = 0;
        while index < self.lines.len() {
            index = self.step(index);
        }
        self.chunks
    }

    fn step(&mut self, index: usize) -> usize {
        let unit = classify_line(self.lines[index]);
        trace!(line = index + 1, unit = unit.name(), "scan");

        match unit {
            StructuralUnit::Heading { level, title } => {
                self.path.set(level, title);
                index + 1
            }
            StructuralUnit::Blank | StructuralUnit::Rule => index + 1,
            StructuralUnit::TableLabel { caption } => {
                let next = self.consume_labeled_table(index, &caption);
                self.skip_blank(next)
            }
            _ if is_table_start(self.lines, index) => {
                let next = self.consume_table(index, "");
                self.skip_blank(next)
            }
            StructuralUnit::FigureLabel { caption } => {
                let next = self.consume_figure(index, &caption);
                self.skip_blank(next)
            }
            StructuralUnit::ListItem { .. } => {
                let next = self.consume_list(index);
                self.skip_blank(next)
            }
            StructuralUnit::Paragraph { .. } => {
                let next = self.consume_paragraph(index);
                self.skip_blank(next)
            }
        }
    }

    /// Caption followed (after optional blank lines) by a table. Without a
    /// well-formed table the caption is emitted alone as a paragraph.
    fn consume_labeled_table(&mut self, index: usize, caption: &str) -> usize {
        let table_start = self.skip_blank(index + 1);
        if is_table_start(self.lines, table_start) {
            return self.consume_table(table_start, caption);
        }

        debug!(line = index + 1, caption, "table caption without a table");
        self.emit(caption);
        index + 1
    }

    fn consume_table(&mut self, start: usize, caption: &str) -> usize {
        let lines = self.lines;
        let end = table_extent(lines, start).unwrap_or(start + 1);
        self.emit_table(caption, &lines[start..end]);
        end
    }

    fn emit_table(&mut self, caption: &str, raw_lines: &[&str]) {
        let raw_block = raw_lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        let Some(table) = parse_table(raw_lines) else {
            debug!(caption, "table failed to parse; emitting raw block");
            self.emit(&with_caption(caption, &raw_block));
            return;
        };

        let rows: Vec<String> = if self.config.table_mode.emits_rows() {
            table.formatted_rows().collect()
        } else {
            Vec::new()
        };

        // A table without data rows is kept as a block so nothing is lost
        if self.config.emits_table_block() || rows.is_empty() {
            self.emit(&with_caption(caption, &raw_block));
        }
        for row in &rows {
            self.emit(&with_caption(caption, row));
        }
    }

    /// Caption plus the contiguous description lines that follow it.
    fn consume_figure(&mut self, index: usize, caption: &str) -> usize {
        let lines = self.lines;
        let mut end = index + 1;
        let mut description = Vec::new();

        while end < lines.len() && !is_table_start(lines, end) {
            match classify_line(lines[end]) {
                StructuralUnit::Paragraph { text } | StructuralUnit::ListItem { text } => {
                    description.push(text);
                }
                _ => break,
            }
            end += 1;
        }

        if description.is_empty() {
            self.emit(caption);
        } else {
            self.emit(&format!("{caption}\n{}", description.join(" ")));
        }
        end
    }

    /// One chunk per list item; items are never merged.
    fn consume_list(&mut self, index: usize) -> usize {
        let lines = self.lines;
        let mut end = index;

        while end < lines.len() {
            let StructuralUnit::ListItem { text } = classify_line(lines[end]) else {
                break;
            };
            self.emit(text);
            end += 1;
        }
        end.max(index + 1)
    }

    /// Contiguous running-text lines joined with single spaces. Stops before
    /// any structural line, including an unlabeled table.
    fn consume_paragraph(&mut self, index: usize) -> usize {
        let lines = self.lines;
        let mut end = index;
        let mut parts = Vec::new();

        while end < lines.len() {
            if end > index && is_table_start(lines, end) {
                break;
            }
            let StructuralUnit::Paragraph { text } = classify_line(lines[end]) else {
                break;
            };
            parts.push(text);
            end += 1;
        }

        if !parts.is_empty() {
            self.emit(&parts.join(" "));
        }
        end.max(index + 1)
    }

    fn skip_blank(&self, mut index: usize) -> usize {
        while index < self.lines.len() && self.lines[index].trim().is_empty() {
            index += 1;
        }
        index
    }

    fn emit(&mut self, body: &str) {
        let prefix = self.prefix();
        let chunks = emit_bounded(self.budget, &prefix, body);
        self.chunks.extend(chunks);
    }

    fn prefix(&self) -> String {
        if !self.config.keep_path_prefix || self.path.is_empty() {
            return String::new();
        }
        format!("[{}]\n", self.path.render())
    }
}

fn with_caption(caption: &str, body: &str) -> String {
    if caption.is_empty() {
        body.to_string()
    } else {
        format!("{caption}\n{body}")
    }
}
