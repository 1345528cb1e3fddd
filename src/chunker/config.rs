use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::{DEFAULT_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Chunk budget must be positive (max_tokens={max_tokens}, max_chars={max_chars:?})")]
    ZeroBudget {
        max_tokens: usize,
        max_chars: Option<usize>,
    },

    #[error("chars_per_token must be positive")]
    ZeroCharsPerToken,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse chunker config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How table rows are turned into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// One chunk per data row: `caption\ncolA: valA; colB: valB`
    #[default]
    Row,
    /// One chunk holding the caption and the verbatim table
    Block,
    /// Both the block and the per-row chunks
    Hybrid,
}

impl TableMode {
    pub fn emits_rows(self) -> bool {
        matches!(self, Self::Row | Self::Hybrid)
    }

    pub fn emits_block(self) -> bool {
        matches!(self, Self::Block | Self::Hybrid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Block => "block",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunker settings.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// max_tokens = 512
/// table_mode = "hybrid"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Approximate token budget per chunk
    pub max_tokens: usize,
    /// Characters assumed per token when converting the budget
    pub chars_per_token: usize,
    /// Explicit character cap; overrides `max_tokens * chars_per_token`
    pub max_chars: Option<usize>,
    /// Table row emission mode
    pub table_mode: TableMode,
    /// Prepend `[section > path]` to every chunk
    pub keep_path_prefix: bool,
    /// Emit the whole table alongside per-row chunks in `row` mode
    pub include_table_block_with_rows: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            max_chars: None,
            table_mode: TableMode::default(),
            keep_path_prefix: true,
            include_table_block_with_rows: false,
        }
    }
}

impl ChunkerConfig {
    /// Default settings with an explicit character cap
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Default::default()
        }
    }

    /// Character cap applied to every composed chunk
    pub fn max_chars(&self) -> usize {
        self.max_chars
            .unwrap_or_else(|| self.max_tokens.saturating_mul(self.chars_per_token))
    }

    /// Whether tables also produce a block chunk
    pub fn emits_table_block(&self) -> bool {
        self.table_mode.emits_block()
            || (self.table_mode == TableMode::Row && self.include_table_block_with_rows)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chars_per_token == 0 {
            return Err(ConfigError::ZeroCharsPerToken);
        }
        if self.max_chars() == 0 {
            return Err(ConfigError::ZeroBudget {
                max_tokens: self.max_tokens,
                max_chars: self.max_chars,
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChunkerConfig::default();
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.max_chars(), 32_000);
        assert_eq!(config.table_mode, TableMode::Row);
        assert!(config.keep_path_prefix);
        assert!(!config.emits_table_block());
    }

    #[test]
    fn test_explicit_max_chars_wins() {
        let config = ChunkerConfig::with_max_chars(20);
        assert_eq!(config.max_chars(), 20);
    }

    #[test]
    fn test_table_block_emission() {
        let mut config = ChunkerConfig::default();
        config.include_table_block_with_rows = true;
        assert!(config.emits_table_block());

        config.table_mode = TableMode::Block;
        config.include_table_block_with_rows = false;
        assert!(config.emits_table_block());
        assert!(!config.table_mode.emits_rows());

        assert!(TableMode::Hybrid.emits_rows() && TableMode::Hybrid.emits_block());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ChunkerConfig::from_toml_str(
            "max_tokens = 128\ntable_mode = \"hybrid\"\nkeep_path_prefix = false\n",
        )
        .unwrap();

        assert_eq!(config.max_chars(), 512);
        assert_eq!(config.table_mode, TableMode::Hybrid);
        assert!(!config.keep_path_prefix);
        assert_eq!(config.chars_per_token, DEFAULT_CHARS_PER_TOKEN);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let err = ChunkerConfig::from_toml_str("max_tokens = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroBudget { .. }));

        let err = ChunkerConfig::from_toml_str("chars_per_token = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCharsPerToken));

        let err = ChunkerConfig::from_toml_str("table_mode = \"columns\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
