//! Splitting raw text into per-slide sections.

use crate::lines::{marker_title, MARKER_REGEX};
use deck_core::SplitMode;

/// Lines belonging to one slide, borrowed from the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Section<'a> {
    /// Trimmed marker title; empty when the marker had none.
    pub title: &'a str,
    pub lines: Vec<&'a str>,
}

/// Cut `text` into sections at slide markers. Text before the first marker
/// is dropped.
pub(crate) fn split_sections(text: &str, mode: SplitMode) -> Vec<Section<'_>> {
    match mode {
        SplitMode::Regex => split_by_regex(text),
        SplitMode::LineScan => split_by_lines(text),
    }
}

fn split_by_regex(text: &str) -> Vec<Section<'_>> {
    let markers: Vec<_> = MARKER_REGEX.captures_iter(text).collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(idx, caps)| {
            let whole = caps.get(0)?;
            let title = caps.get(2)?;
            let end = markers
                .get(idx + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let body = &text[whole.end()..end];
            let body = body.strip_prefix('\n').unwrap_or(body);

            Some(Section {
                title: title.as_str().trim(),
                lines: body.lines().collect(),
            })
        })
        .collect()
}

/// Line-by-line split. Every marker line opens a new section, even inside
/// an unclosed fence; the scanner closes such fences at section end.
fn split_by_lines(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for line in text.lines() {
        if let Some(title) = marker_title(line) {
            sections.push(Section {
                title,
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line);
        }
    }

    sections
}
