use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use disclosure_chunker::input::{collect_markdown_files, read_document};
use disclosure_chunker::{ChunkMetadata, ChunkerConfig, MarkdownChunker, TableMode};
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Split disclosure Markdown into size-bounded, section-prefixed chunks
#[derive(Parser, Debug)]
#[command(name = "disclosure-chunker", version, about)]
struct Cli {
    /// Markdown files or directories to chunk
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// TOML file with chunker settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Approximate token budget per chunk
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Explicit character cap per chunk
    #[arg(long)]
    max_chars: Option<usize>,

    /// How table rows become chunks
    #[arg(long, value_enum)]
    table_mode: Option<TableModeArg>,

    /// Do not prefix chunks with their section path
    #[arg(long)]
    no_path_prefix: bool,

    /// Also emit the whole table when emitting rows
    #[arg(long)]
    with_table_block: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TableModeArg {
    Row,
    Block,
    Hybrid,
}

impl From<TableModeArg> for TableMode {
    fn from(arg: TableModeArg) -> Self {
        match arg {
            TableModeArg::Row => TableMode::Row,
            TableModeArg::Block => TableMode::Block,
            TableModeArg::Hybrid => TableMode::Hybrid,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Chunks separated by blank lines
    Text,
    /// One JSON array of chunk strings per input file
    Json,
    /// One JSON object per chunk, with metadata
    Jsonl,
}

/// A JSON-lines record
#[derive(Serialize)]
struct ChunkRecord<'a> {
    source: &'a str,
    index: usize,
    #[serde(flatten)]
    chunk: ChunkMetadata,
}

impl Cli {
    fn chunker_config(&self) -> Result<ChunkerConfig> {
        let mut config = match &self.config {
            Some(path) => ChunkerConfig::from_file(path)?,
            None => ChunkerConfig::default(),
        };

        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if self.max_chars.is_some() {
            config.max_chars = self.max_chars;
        }
        if let Some(mode) = self.table_mode {
            config.table_mode = mode.into();
        }
        if self.no_path_prefix {
            config.keep_path_prefix = false;
        }
        if self.with_table_block {
            config.include_table_block_with_rows = true;
        }

        config.validate().context("Invalid chunker settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.chunker_config()?;
    debug!(?config, "resolved chunker settings");

    let files = collect_markdown_files(&cli.inputs)?;
    let chunker = MarkdownChunker::new(config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let start = Instant::now();
    let mut total_chunks = 0;

    for path in &files {
        total_chunks += write_file(&chunker, path, cli.format, &mut out)?;
    }
    out.flush().context("Failed to flush output")?;

    info!(
        files = files.len(),
        chunks = total_chunks,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "chunking complete"
    );
    Ok(())
}

fn write_file(
    chunker: &MarkdownChunker,
    path: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<usize> {
    let text = read_document(path)?;
    let source = path.display().to_string();

    let count = match format {
        OutputFormat::Text => {
            let chunks = chunker.chunk(&text);
            for chunk in &chunks {
                writeln!(out, "{chunk}\n")?;
            }
            chunks.len()
        }
        OutputFormat::Json => {
            let chunks = chunker.chunk(&text);
            serde_json::to_writer_pretty(&mut *out, &chunks)
                .with_context(|| format!("Failed to serialize chunks for {source}"))?;
            writeln!(out)?;
            chunks.len()
        }
        OutputFormat::Jsonl => {
            let records = chunker.chunk_with_metadata(&text);
            let count = records.len();
            for (index, chunk) in records.into_iter().enumerate() {
                let record = ChunkRecord {
                    source: &source,
                    index,
                    chunk,
                };
                serde_json::to_writer(&mut *out, &record)
                    .with_context(|| format!("Failed to serialize chunk {index} of {source}"))?;
                writeln!(out)?;
            }
            count
        }
    };

    debug!(file = %source, chunks = count, "chunked file");
    Ok(count)
}
