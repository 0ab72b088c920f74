//! Recovers slide decks from model-generated markdown.
//!
//! The reply is split at "Slide N: Title" markers and each section is scanned
//! once for bullets, tables, fenced chart/table/shapes/columns blocks, bold
//! column headings, and "Use a ... shape" hints.

pub mod chart;
mod lines;
pub mod parser;
mod sections;

pub use chart::ChartBlockDecoder;
pub use parser::{parse_slides, SlideTextParser};
