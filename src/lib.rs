//! Structure-aware chunking of Markdown converted from financial disclosures.
//!
//! ```text
//! Markdown ──► normalize ──► scan lines ──► tables / figures / lists / paragraphs
//!                               │                         │
//!                         heading path ──────────► capacity-bounded emitter ──► chunks
//! ```

pub mod chunker;
pub mod input;
pub mod parser;

// Re-export main types for convenience
pub use chunker::{
    Budget, CharBudget, ChunkKind, ChunkMetadata, ChunkerConfig, ConfigError,
    DEFAULT_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS, MarkdownChunker, TableMode, chunk_markdown,
    chunk_markdown_with_config,
};

pub use parser::{HeadingPath, ParsedTable, StructuralUnit, normalize_document, parse_table};

pub use input::{collect_markdown_files, is_markdown};
