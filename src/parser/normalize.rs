//! Line normalization: unify line endings and promote pseudo-headings.
//!
//! PDF-to-Markdown conversion often renders section titles as bold lines,
//! numbered captions or all-caps banners instead of `#` headings. These are
//! rewritten into canonical heading syntax at [`PSEUDO_HEADING_LEVEL`] so the
//! scanner can track them in the section path.

use super::patterns::{Patterns, is_figure_label, is_table_label};

/// Level assigned to every promoted pseudo-heading (`###`)
pub const PSEUDO_HEADING_LEVEL: usize = 3;

/// Longest line still considered a pseudo-heading
const MAX_PSEUDO_HEADING_CHARS: usize = 120;

/// Shortest all-caps banner considered a pseudo-heading
const MIN_CAPS_HEADING_CHARS: usize = 8;

/// Punctuation allowed inside an all-caps banner
const CAPS_PUNCTUATION: &[char] = &[
    '&', ',', '\'', '’', '/', '-', '–', ':', '(', ')', '.', '%', '$',
];

/// Collapse CRLF and lone CR line endings into LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Rewrite pseudo-heading lines as canonical headings.
///
/// Lines that are already canonical headings are left untouched, which makes
/// the rewrite idempotent.
pub fn normalize_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match pseudo_heading_title(line) {
            Some(title) => {
                out.push_str(&"#".repeat(PSEUDO_HEADING_LEVEL));
                out.push(' ');
                out.push_str(&title);
            }
            None => out.push_str(line),
        }
    }

    out
}

/// Full normalization pass: line endings, then headings.
pub fn normalize_document(text: &str) -> String {
    normalize_headings(&normalize_line_endings(text))
}

/// Title of a pseudo-heading line, or `None` when the line is not one.
pub fn pseudo_heading_title(line: &str) -> Option<String> {
    let patterns = Patterns::get();
    let trimmed = line.trim();

    if trimmed.is_empty() || patterns.heading.is_match(line) {
        return None;
    }
    // Table rows and captions keep their structural role
    if (trimmed.starts_with('|') && trimmed.ends_with('|'))
        || is_table_label(trimmed)
        || is_figure_label(trimmed)
    {
        return None;
    }

    let raw_title = if let Some(caps) = patterns.bold_line.captures(trimmed) {
        caps.get(1)?.as_str().to_string()
    } else if patterns.decimal_heading.is_match(trimmed) {
        trimmed.to_string()
    } else if let Some(numeral) = roman_numeral(trimmed) {
        if numeral.is_empty() {
            return None;
        }
        trimmed.to_string()
    } else if let Some(caps) = patterns.bracketed_roman_heading.captures(trimmed) {
        let numeral = caps.get(1)?.as_str();
        if numeral.is_empty() {
            return None;
        }
        format!("{} {}", numeral, caps.get(2)?.as_str())
    } else if is_caps_banner(trimmed) {
        trimmed.to_string()
    } else {
        return None;
    };

    let title = strip_decorations(&raw_title);
    if title.is_empty()
        || title.ends_with('.')
        || title.chars().count() > MAX_PSEUDO_HEADING_CHARS
    {
        return None;
    }

    Some(title.to_string())
}

/// Numeral of a `IV. Title` line; the pattern can match an empty numeral,
/// which callers reject.
fn roman_numeral(line: &str) -> Option<&str> {
    Patterns::get()
        .roman_heading
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// All-caps banner: long enough, mostly upper-case letters, no trailing
/// period.
fn is_caps_banner(line: &str) -> bool {
    if line.chars().count() < MIN_CAPS_HEADING_CHARS || line.ends_with('.') {
        return false;
    }
    if !line.chars().next().is_some_and(char::is_alphanumeric) {
        return false;
    }

    let mut letters = 0usize;
    let mut visible = 0usize;
    for c in line.chars().filter(|c| !c.is_whitespace()) {
        visible += 1;
        if c.is_alphabetic() {
            if c.is_lowercase() {
                return false;
            }
            letters += 1;
        } else if !c.is_ascii_digit() && !CAPS_PUNCTUATION.contains(&c) {
            return false;
        }
    }

    letters >= 2 && letters * 2 >= visible
}

/// Strip emphasis markers and brackets wrapping a title.
fn strip_decorations(title: &str) -> &str {
    title
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '[' | ']') || c.is_whitespace())
        .trim_end_matches(':')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_line_endings(""), "");
    }

    #[test]
    fn test_bold_line_promoted() {
        assert_eq!(
            pseudo_heading_title("**Liquidity and Capital Resources**").as_deref(),
            Some("Liquidity and Capital Resources")
        );
        assert_eq!(pseudo_heading_title("__Outlook__:").as_deref(), Some("Outlook"));
        // Inline bold inside running text is not a heading
        assert_eq!(pseudo_heading_title("Revenue **grew** strongly"), None);
    }

    #[test]
    fn test_enumerations_promoted() {
        assert_eq!(
            pseudo_heading_title("2.1 Revenue Recognition").as_deref(),
            Some("2.1 Revenue Recognition")
        );
        assert_eq!(
            pseudo_heading_title("3.4.1. Leases").as_deref(),
            Some("3.4.1. Leases")
        );
        assert_eq!(
            pseudo_heading_title("IV. Risk Factors").as_deref(),
            Some("IV. Risk Factors")
        );
        assert_eq!(
            pseudo_heading_title("(II) Notes to the Accounts").as_deref(),
            Some("II Notes to the Accounts")
        );
        assert_eq!(
            pseudo_heading_title("[III] Related Parties").as_deref(),
            Some("III Related Parties")
        );
        // Lower-case continuation is a sentence, not a heading
        assert_eq!(pseudo_heading_title("2.1 million shares were issued"), None);
    }

    #[test]
    fn test_caps_banner() {
        assert_eq!(
            pseudo_heading_title("MANAGEMENT DISCUSSION & ANALYSIS").as_deref(),
            Some("MANAGEMENT DISCUSSION & ANALYSIS")
        );
        assert_eq!(pseudo_heading_title("SHORT"), None);
        assert_eq!(pseudo_heading_title("ALL CAPS SENTENCE HERE."), None);
        assert_eq!(pseudo_heading_title("USD 1,000,000"), None);
    }

    #[test]
    fn test_exemptions() {
        assert_eq!(pseudo_heading_title("| **Total** |"), None);
        assert_eq!(pseudo_heading_title("TABLE 1: REVENUE BY SEGMENT"), None);
        assert_eq!(pseudo_heading_title("## Already Canonical"), None);
        assert_eq!(pseudo_heading_title("- BULLETED CAPS ITEM"), None);
    }

    #[test]
    fn test_normalize_headings_rewrites_in_place() {
        let input = "# Report\n**Overview**\nText line.\n";
        assert_eq!(
            normalize_headings(input),
            "# Report\n### Overview\nText line.\n"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let input = "**Overview**\r\n2.1 Revenue Recognition\r\nRISK FACTORS SUMMARY\n| a | b |\n- item";
        let once = normalize_document(input);
        let twice = normalize_document(&once);
        assert_eq!(once, twice);
    }
}
