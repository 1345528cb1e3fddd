use std::borrow::Cow;

use super::patterns::Patterns;

/// Classification of a single normalized line.
///
/// Produced by [`classify_line`], which evaluates the line predicates in a
/// fixed priority order. Units borrow from the line they were derived from
/// and are never stored beyond the scan step that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralUnit<'a> {
    /// Canonical `#` heading
    Heading { level: usize, title: &'a str },
    /// Empty or whitespace-only line
    Blank,
    /// Horizontal rule (`---`), carries no content
    Rule,
    /// Table caption line, emphasis markers removed
    TableLabel { caption: Cow<'a, str> },
    /// Figure caption line, emphasis markers removed
    FigureLabel { caption: Cow<'a, str> },
    /// A line opening a list item
    ListItem { text: &'a str },
    /// Anything else: a line of running text
    Paragraph { text: &'a str },
}

impl StructuralUnit<'_> {
    /// Short name used in trace output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Blank => "blank",
            Self::Rule => "rule",
            Self::TableLabel { .. } => "table_label",
            Self::FigureLabel { .. } => "figure_label",
            Self::ListItem { .. } => "list_item",
            Self::Paragraph { .. } => "paragraph",
        }
    }
}

/// Classify a line: heading, blank, rule, table label, figure label, list
/// item, then paragraph text.
pub fn classify_line(line: &str) -> StructuralUnit<'_> {
    let patterns = Patterns::get();

    if let Some(caps) = patterns.heading.captures(line) {
        if let (Some(hashes), Some(title)) = (caps.get(1), caps.get(2)) {
            return StructuralUnit::Heading {
                level: hashes.as_str().len(),
                title: title.as_str().trim(),
            };
        }
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return StructuralUnit::Blank;
    }
    if patterns.horizontal_rule.is_match(trimmed) {
        return StructuralUnit::Rule;
    }
    if patterns.table_label.is_match(trimmed) {
        return StructuralUnit::TableLabel {
            caption: strip_emphasis(trimmed),
        };
    }
    if patterns.figure_label.is_match(trimmed) {
        return StructuralUnit::FigureLabel {
            caption: strip_emphasis(trimmed),
        };
    }
    if patterns.list_item.is_match(trimmed) {
        return StructuralUnit::ListItem { text: trimmed };
    }

    StructuralUnit::Paragraph { text: trimmed }
}

/// Strip emphasis markers from a caption: `**Table 2.3** Segment data`
/// becomes `Table 2.3 Segment data`.
fn strip_emphasis(text: &str) -> Cow<'_, str> {
    let stripped = text.trim_matches(|c| c == '*' || c == '_').trim();
    let stripped = if stripped.is_empty() { text } else { stripped };

    if !stripped.contains("**") && !stripped.contains("__") {
        return Cow::Borrowed(stripped);
    }
    let cleaned = stripped.replace("**", "").replace("__", "");
    Cow::Owned(cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}
