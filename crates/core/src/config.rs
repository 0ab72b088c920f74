//! Parser configuration.
//!
//! One configurable parser replaces the family of near-identical variants
//! that differed only in which blocks they recognized and how they split
//! sections.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How raw text is cut into per-slide sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// Split the whole text on every slide marker, even inside fences.
    Regex,
    /// Walk lines, ignoring marker-looking lines inside block fences.
    #[default]
    LineScan,
}

impl FromStr for SplitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "line-scan" | "linescan" | "lines" => Ok(Self::LineScan),
            other => Err(Error::Config(format!("unknown split mode '{}'", other))),
        }
    }
}

/// What to do with text that contains no slide marker at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Produce no slides.
    #[default]
    Strict,
    /// Treat the whole text as a single slide titled "Slide 1".
    Lenient,
}

/// Whether slide-level bullets survive next to tables or columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrayBullets {
    #[default]
    Keep,
    /// Clear bullets on slides that produced a table or a column bucket.
    DropWithBlocks,
}

/// Block kinds the parser collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockKinds {
    pub charts: bool,
    pub tables: bool,
    pub columns: bool,
    pub shapes: bool,
}

impl Default for BlockKinds {
    fn default() -> Self {
        Self::all()
    }
}

impl BlockKinds {
    /// Every block kind enabled.
    pub fn all() -> Self {
        Self {
            charts: true,
            tables: true,
            columns: true,
            shapes: true,
        }
    }

    /// Only titles and bullets.
    pub fn none() -> Self {
        Self {
            charts: false,
            tables: false,
            columns: false,
            shapes: false,
        }
    }
}

/// Configuration for the slide text parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    pub split_mode: SplitMode,
    pub fallback: Fallback,
    pub blocks: BlockKinds,
    pub stray_bullets: StrayBullets,
    /// Clean up the text with [`crate::TextNormalizer`] before parsing.
    pub normalize: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            split_mode: SplitMode::default(),
            fallback: Fallback::default(),
            blocks: BlockKinds::default(),
            stray_bullets: StrayBullets::default(),
            normalize: true,
        }
    }
}

impl ParserConfig {
    /// Create a configuration with every block kind enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_blocks(mut self, blocks: BlockKinds) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_stray_bullets(mut self, policy: StrayBullets) -> Self {
        self.stray_bullets = policy;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}
