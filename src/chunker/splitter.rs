//! Capacity-bounded emission.
//!
//! A body is emitted whole when it fits; otherwise it is packed at
//! successively finer granularity (lines, sentences, words). A word that does
//! not fit on its own is emitted bare and verbatim, the only chunk allowed to
//! exceed the budget.

use tracing::{debug, trace};

use crate::parser::Patterns;

/// Decides whether a fully composed chunk (prefix included) is small enough.
///
/// The default [`CharBudget`] compares byte length against a character cap
/// derived from the token budget; a tokenizer-backed budget can be dropped
/// in without touching the scanner.
pub trait Budget {
    fn fits(&self, chunk: &str) -> bool;
}

/// Byte-length budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharBudget {
    pub max_chars: usize,
}

impl CharBudget {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Budget for CharBudget {
    fn fits(&self, chunk: &str) -> bool {
        chunk.len() <= self.max_chars
    }
}

impl<F> Budget for F
where
    F: Fn(&str) -> bool,
{
    fn fits(&self, chunk: &str) -> bool {
        self(chunk)
    }
}

/// Split granularity, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Line,
    Sentence,
    Word,
}

impl Granularity {
    fn finer(self) -> Option<Self> {
        match self {
            Self::Line => Some(Self::Sentence),
            Self::Sentence => Some(Self::Word),
            Self::Word => None,
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            Self::Line => "\n",
            Self::Sentence | Self::Word => " ",
        }
    }

    /// Segments of `text` at this granularity, or `None` when this level
    /// cannot subdivide it and the next level should be tried.
    fn split(self, text: &str) -> Option<Vec<&str>> {
        let segments: Vec<&str> = match self {
            Self::Line => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect(),
            Self::Sentence => split_sentences(text),
            Self::Word => return Some(text.split_whitespace().collect()),
        };

        (segments.len() > 1).then_some(segments)
    }
}

/// Split text at sentence boundaries: `.`, `!` or `?` (plus closing quotes or
/// brackets), whitespace, then an upper-case letter or `(`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for caps in Patterns::get().sentence_break.captures_iter(text) {
        let Some(gap) = caps.get(1) else { continue };
        segments.push(text[start..gap.start()].trim());
        start = gap.end();
    }
    segments.push(text[start..].trim());

    segments.retain(|s| !s.is_empty());
    segments
}

/// Emit `body` under `prefix` as one or more chunks that satisfy `budget`.
///
/// Content is never dropped: stripping prefixes and joining the chunk bodies
/// with whitespace reproduces the body with whitespace collapsed.
pub fn emit_bounded<B: Budget + ?Sized>(budget: &B, prefix: &str, body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }

    let prefix = if prefix.is_empty() || budget.fits(prefix) {
        prefix
    } else {
        debug!(prefix_len = prefix.len(), "section prefix exceeds budget; dropping it");
        ""
    };

    let mut packer = Packer {
        budget,
        prefix,
        chunks: Vec::new(),
    };

    if packer.fits(body) {
        packer.push(body);
    } else {
        trace!(body_len = body.len(), "body exceeds budget; splitting");
        packer.pack(body, Granularity::Line);
    }

    packer.chunks
}

struct Packer<'a, B: ?Sized> {
    budget: &'a B,
    prefix: &'a str,
    chunks: Vec<String>,
}

impl<B: Budget + ?Sized> Packer<'_, B> {
    fn compose(&self, body: &str) -> String {
        let mut chunk = String::with_capacity(self.prefix.len() + body.len());
        chunk.push_str(self.prefix);
        chunk.push_str(body);
        chunk
    }

    fn fits(&self, body: &str) -> bool {
        self.budget.fits(&self.compose(body))
    }

    fn push(&mut self, body: &str) {
        let chunk = self.compose(body);
        self.chunks.push(chunk);
    }

    /// Greedily pack the segments of `text` at `level`, escalating any
    /// segment that does not fit alone to the next finer level.
    fn pack(&mut self, text: &str, level: Granularity) {
        let Some(segments) = level.split(text) else {
            if let Some(finer) = level.finer() {
                self.pack(text, finer);
            }
            return;
        };

        let joiner = level.joiner();
        let mut buffer = String::new();

        for segment in segments {
            if !buffer.is_empty() {
                let candidate = format!("{buffer}{joiner}{segment}");
                if self.fits(&candidate) {
                    buffer = candidate;
                    continue;
                }
                self.push(&buffer);
                buffer.clear();
            }

            if self.fits(segment) {
                buffer.push_str(segment);
                continue;
            }

            match level.finer() {
                Some(finer) => self.pack(segment, finer),
                None => self.push_oversized(segment),
            }
        }

        if !buffer.is_empty() {
            self.push(&buffer);
        }
    }

    /// A single word that cannot fit under the prefix. It goes out without
    /// the prefix, and unmodified even if it alone exceeds the budget.
    fn push_oversized(&mut self, word: &str) {
        if !self.budget.fits(word) {
            debug!(word_len = word.len(), "word exceeds budget; emitting verbatim");
        }
        self.chunks.push(word.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(chunks: &[String], prefix: &str) -> Vec<String> {
        chunks
            .iter()
            .map(|c| c.strip_prefix(prefix).unwrap_or(c).to_string())
            .collect()
    }

    #[test]
    fn test_whole_body_fits() {
        let chunks = emit_bounded(&CharBudget::new(100), "[A]\n", "Short body.");
        assert_eq!(chunks, vec!["[A]\nShort body."]);
    }

    #[test]
    fn test_empty_body_emits_nothing() {
        assert!(emit_bounded(&CharBudget::new(100), "[A]\n", "   ").is_empty());
    }

    #[test]
    fn test_sentence_grouping() {
        let body = "Revenue grew 10%. Profit grew 5%. Costs fell sharply.";
        let chunks = emit_bounded(&CharBudget::new(36), "", body);

        assert_eq!(
            chunks,
            vec!["Revenue grew 10%. Profit grew 5%.", "Costs fell sharply."]
        );
    }

    #[test]
    fn test_word_packing_reconstructs_body() {
        let body = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma";
        let chunks = emit_bounded(&CharBudget::new(20), "", body);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 20));
        assert_eq!(chunks.join(" "), body);
    }

    #[test]
    fn test_oversized_word_is_verbatim() {
        let long_word = "x".repeat(50);
        let body = format!("a {long_word} b");
        let chunks = emit_bounded(&CharBudget::new(10), "", &body);

        assert_eq!(chunks, vec!["a".to_string(), long_word, "b".to_string()]);
    }

    #[test]
    fn test_prefix_counts_toward_budget() {
        let prefix = "[Report]\n";
        let body = "one two three four five six";
        let chunks = emit_bounded(&CharBudget::new(20), prefix, body);

        assert!(chunks.iter().all(|c| c.len() <= 20));
        assert!(chunks.iter().all(|c| c.starts_with(prefix)));
        assert_eq!(bodies(&chunks, prefix).join(" "), body);
    }

    #[test]
    fn test_word_that_only_fits_without_prefix_goes_bare() {
        let chunks = emit_bounded(&CharBudget::new(12), "[Section]\n", "abcdefgh");
        assert_eq!(chunks, vec!["abcdefgh"]);
    }

    #[test]
    fn test_oversized_prefix_is_dropped() {
        let chunks = emit_bounded(&CharBudget::new(8), "[Very long section]\n", "tiny");
        assert_eq!(chunks, vec!["tiny"]);
    }

    #[test]
    fn test_line_grouping_keeps_rows_intact() {
        let body = "Table 1\n| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |";
        let chunks = emit_bounded(&CharBudget::new(30), "", body);

        assert_eq!(
            chunks,
            vec!["Table 1\n| A | B |\n|---|---|", "| 1 | 2 |\n| 3 | 4 |"]
        );
    }

    #[test]
    fn test_closure_budget() {
        let max_words = |chunk: &str| chunk.split_whitespace().count() <= 2;
        let chunks = emit_bounded(&max_words, "", "a b c d e");
        assert_eq!(chunks, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn test_sentence_boundaries() {
        assert_eq!(
            split_sentences("It rose. (See note 4.) Then \"it fell.\" Then 3.5 billion."),
            vec!["It rose.", "(See note 4.)", "Then \"it fell.\"", "Then 3.5 billion."]
        );
        assert_eq!(split_sentences("no boundary here"), vec!["no boundary here"]);
    }
}
