//! Core slide-deck types, parser configuration, text normalization, and
//! request/response envelopes for generated presentations.

pub mod config;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod request;
pub mod types;

pub use config::{BlockKinds, Fallback, ParserConfig, SplitMode, StrayBullets};
pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use outline::OutlineFormatter;
pub use request::{DeckRequest, DeckResponse, PromptBuilder, MAX_SLIDES};
pub use types::{ChartData, ColumnBucket, Columns, SeriesPoint, Slide, PALETTE};
