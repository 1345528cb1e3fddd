mod config;
mod document;
mod metadata;
mod scanner;
mod splitter;


pub use config::{ChunkerConfig, ConfigError, TableMode};
pub use document::{MarkdownChunker, chunk_markdown, chunk_markdown_with_config};
pub use metadata::{ChunkKind, ChunkMetadata, classify_body, split_path_prefix};
pub use splitter::{Budget, CharBudget, emit_bounded, split_sentences};

/// Default approximate token budget per chunk
pub const DEFAULT_MAX_TOKENS: usize = 8000;

/// Characters assumed per token when converting the budget to a byte cap
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;
