//! Single-line recognizers for slide markup.
//!
//! Every function here looks at one line in isolation. Deciding what a line
//! means in context is the scanner's job.

use regex::Regex;
use std::sync::LazyLock;

/// "Slide 3: Title" at the start of a line. Group 2 is the raw title.
pub(crate) static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*slide[ \t]+(\d+)[ \t]*:(.*)$").unwrap());

/// "Use a triangle shape" / "Use a `flow` diagram" anywhere in a line.
static SHAPE_HINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\buse\s+an?\s+[`"']?([A-Za-z][\w\s-]*?)[`"']?\s+(?:shape|diagram)\b"#)
        .unwrap()
});

/// A line that is nothing but a bold phrase, optionally ending in a colon.
static BOLD_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\s*([^*]+?)\s*:?\s*\*\*\s*:?$").unwrap());

/// Kind of block a fence delimits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FenceKind {
    Chart,
    Table,
    Shapes,
    Columns,
    /// Any other info string; the body is skipped.
    Other,
}

/// A line starting with three backticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FenceLine {
    /// No info string: closes an open fence, ignored otherwise.
    Bare,
    Open(FenceKind),
}

/// What a line means outside of any fence, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineClass {
    FenceOpen(FenceKind),
    ShapeHint(String),
    TableRow,
    LayoutMarker,
    ColumnHeading(String),
    Bullet(String),
    Other,
}

/// Return the trimmed title of a slide marker line.
pub(crate) fn marker_title(line: &str) -> Option<&str> {
    MARKER_REGEX
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

pub(crate) fn fence_line(line: &str) -> Option<FenceLine> {
    let info = line.trim().strip_prefix("```")?.trim();
    if info.is_empty() {
        return Some(FenceLine::Bare);
    }

    let kind = match info.to_lowercase().as_str() {
        "chart" => FenceKind::Chart,
        "table" => FenceKind::Table,
        "shapes" => FenceKind::Shapes,
        "columns" => FenceKind::Columns,
        _ => FenceKind::Other,
    };
    Some(FenceLine::Open(kind))
}

pub(crate) fn shape_hint(line: &str) -> Option<String> {
    SHAPE_HINT_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// "Multi-Column Layout", with any bold, heading, or colon decoration.
pub(crate) fn is_layout_marker(line: &str) -> bool {
    line.trim()
        .trim_matches(|c: char| c == '*' || c == '#' || c == ':' || c.is_whitespace())
        .eq_ignore_ascii_case("multi-column layout")
}

pub(crate) fn bold_heading(line: &str) -> Option<String> {
    BOLD_HEADING_REGEX
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(':').trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A heading inside a columns fence: bold, or plain text ending in a colon.
pub(crate) fn column_fence_heading(line: &str) -> Option<String> {
    if let Some(title) = bold_heading(line) {
        return Some(title);
    }

    let trimmed = line.trim();
    if bullet_text(trimmed).is_some() || !trimmed.ends_with(':') {
        return None;
    }

    let title = trimmed
        .trim_end_matches(':')
        .trim_start_matches('#')
        .trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Strip a `-` or `*` bullet marker.
///
/// A doubled marker (`---`, `**bold**`) is not a bullet.
pub(crate) fn bullet_text(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let marker = trimmed.chars().next().filter(|c| *c == '-' || *c == '*')?;
    let rest = &trimmed[marker.len_utf8()..];
    if rest.starts_with(marker) {
        return None;
    }

    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}
