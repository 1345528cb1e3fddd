// Safe unwrap usage: every pattern below is a compile-time constant.
#![allow(clippy::unwrap_used)]

use regex::Regex;
use std::sync::OnceLock;

/// Compiled line-shape patterns shared by the normalizer, the scanner and the
/// metadata projector.
pub(crate) struct Patterns {
    /// Canonical heading: `## Title` (optional closing `#` run)
    pub heading: Regex,
    /// A lone bold phrase: `**Title**` or `__Title__`
    pub bold_line: Regex,
    /// Decimal multi-level enumeration: `2.1 Revenue Recognition`
    pub decimal_heading: Regex,
    /// Upper-case roman enumeration: `IV. Risk Factors`
    pub roman_heading: Regex,
    /// Bracketed upper-case roman enumeration: `(IV) Risk Factors`
    pub bracketed_roman_heading: Regex,
    /// Table caption: `Table 3: Segment revenue`
    pub table_label: Regex,
    /// Figure caption: `Figure 2 - Share price`
    pub figure_label: Regex,
    /// Bullet, numbered, lettered, roman and parenthesised list markers
    pub list_item: Regex,
    /// Horizontal rule: `---`, `***`, `___`
    pub horizontal_rule: Regex,
    /// Sentence boundary; group 1 is the whitespace gap to split on
    pub sentence_break: Regex,
}

impl Patterns {
    pub(crate) fn get() -> &'static Self {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Patterns {
            heading: Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap(),
            bold_line: Regex::new(r"^\s*(?:\*\*|__)\s*([^*_]+?)\s*(?:\*\*|__)\s*:?\s*$").unwrap(),
            decimal_heading: Regex::new(r"^\s*\d+(?:\.\d+)+\.?\s+[A-Z]").unwrap(),
            roman_heading: Regex::new(r"^\s*(X{0,3}(?:IX|IV|V?I{0,3}))[.)]\s+[A-Z]").unwrap(),
            bracketed_roman_heading: Regex::new(
                r"^\s*[(\[](X{0,3}(?:IX|IV|V?I{0,3}))[)\]]\s+(\S.*)$",
            )
            .unwrap(),
            table_label: Regex::new(
                r"(?i)^\s*[*_]*\s*(?:table|tbl)(?:\.\s*|\s+)(?:\d+|(?-i:[IVXLC]+))[a-z]?(?:[.\-][0-9]+)*\b",
            )
            .unwrap(),
            figure_label: Regex::new(
                r"(?i)^\s*[*_]*\s*(?:figure|fig|chart|graph|image)(?:\.\s*|\s+)(?:\d+|(?-i:[IVXLC]+))[a-z]?(?:[.\-][0-9]+)*\b",
            )
            .unwrap(),
            list_item: Regex::new(
                r"^\s*(?:[-*+•▪◦‣]|\d{1,3}[.)]|[A-Za-z][.)]|[ivxlcdm]{1,6}[.)]|\((?:\d{1,3}|[a-z]|[ivxlcdm]{1,6})\))\s+\S",
            )
            .unwrap(),
            horizontal_rule: Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap(),
            sentence_break: Regex::new(r#"[.!?]["'’”)\]]*(\s+)[A-Z(]"#).unwrap(),
        })
    }
}

/// Whether a line opens a list item (`- x`, `1. x`, `b) x`, `(iv) x`).
pub fn is_list_item(line: &str) -> bool {
    Patterns::get().list_item.is_match(line)
}

/// Whether a line starts with a table caption marker.
pub fn is_table_label(line: &str) -> bool {
    Patterns::get().table_label.is_match(line)
}

/// Whether a line starts with a figure caption marker.
pub fn is_figure_label(line: &str) -> bool {
    Patterns::get().figure_label.is_match(line)
}
