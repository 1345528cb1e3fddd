use tracing::debug;

use super::config::ChunkerConfig;
use super::metadata::ChunkMetadata;
use super::scanner::Scanner;
use super::splitter::{Budget, CharBudget};
use crate::parser::normalize_document;

/// Converts heading-structured Markdown into size-bounded chunks.
///
/// The chunker is immutable and holds no per-document state, so one instance
/// can serve any number of documents, including from several threads.
///
/// # Example
///
/// ```
/// use disclosure_chunker::{ChunkerConfig, MarkdownChunker};
///
/// let chunker = MarkdownChunker::new(ChunkerConfig::default());
/// let chunks = chunker.chunk("# Report\n\n- Item A\n- Item B\n");
///
/// assert_eq!(chunks, vec!["[Report]\n- Item A", "[Report]\n- Item B"]);
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownChunker<B = CharBudget> {
    config: ChunkerConfig,
    budget: B,
}

impl MarkdownChunker<CharBudget> {
    /// Chunker whose budget is the config's character cap
    pub fn new(config: ChunkerConfig) -> Self {
        let budget = CharBudget::new(config.max_chars());
        Self { config, budget }
    }
}

impl Default for MarkdownChunker<CharBudget> {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

impl<B: Budget> MarkdownChunker<B> {
    /// Chunker with a custom fit predicate (e.g. a real tokenizer); the
    /// config's size fields are then ignored.
    pub fn with_budget(config: ChunkerConfig, budget: B) -> Self {
        Self { config, budget }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk a document into prefixed text units, in document order.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let normalized = normalize_document(text);
        let lines: Vec<&str> = normalized.split('\n').collect();

        let chunks = Scanner::new(&lines, &self.config, &self.budget).run();
        debug!(
            lines = lines.len(),
            chunks = chunks.len(),
            table_mode = %self.config.table_mode,
            "chunked document"
        );
        chunks
    }

    /// Chunk a document and project metadata for each chunk.
    pub fn chunk_with_metadata(&self, text: &str) -> Vec<ChunkMetadata> {
        self.chunk(text)
            .into_iter()
            .map(ChunkMetadata::from_chunk)
            .collect()
    }
}

/// Chunk with default settings
pub fn chunk_markdown(text: &str) -> Vec<String> {
    MarkdownChunker::default().chunk(text)
}

/// Chunk with the given settings
pub fn chunk_markdown_with_config(text: &str, config: ChunkerConfig) -> Vec<String> {
    MarkdownChunker::new(config).chunk(text)
}
