//! Slide text parser.
//!
//! Splits a model reply into sections, then runs one top-to-bottom scan per
//! section. The scan is a small state machine: one state value holds the
//! pending buffer (table rows, fence body) or the current column bucket.

use crate::chart::ChartBlockDecoder;
use crate::lines::{
    bold_heading, bullet_text, column_fence_heading, fence_line, is_layout_marker, is_table_row,
    shape_hint, FenceKind, FenceLine, LineClass,
};
use crate::sections::{split_sections, Section};
use deck_core::{Fallback, ParserConfig, Slide, StrayBullets, TextNormalizer};
use std::borrow::Cow;

/// Parser for slide-formatted text produced by a generative model.
#[derive(Debug, Clone, Default)]
pub struct SlideTextParser {
    config: ParserConfig,
    charts: ChartBlockDecoder,
}

impl SlideTextParser {
    /// Create a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            charts: ChartBlockDecoder::new(),
        }
    }

    /// Parse raw text into slides.
    ///
    /// Never fails: text without any "Slide N:" marker yields no slides, or a
    /// single "Slide 1" under [`Fallback::Lenient`].
    pub fn parse(&self, raw: &str) -> Vec<Slide> {
        let text = if self.config.normalize {
            Cow::Owned(TextNormalizer::new().normalize(raw))
        } else {
            Cow::Borrowed(raw)
        };

        let mut sections = split_sections(&text, self.config.split_mode);
        log::debug!(
            "Split text into {} sections ({:?})",
            sections.len(),
            self.config.split_mode
        );

        if sections.is_empty() {
            match self.config.fallback {
                Fallback::Strict => {
                    log::debug!("No slide markers found");
                    return Vec::new();
                }
                Fallback::Lenient if text.trim().is_empty() => return Vec::new(),
                Fallback::Lenient => {
                    log::debug!("No slide markers found, treating text as one slide");
                    sections.push(Section {
                        title: "",
                        lines: text.lines().collect(),
                    });
                }
            }
        }

        sections
            .into_iter()
            .enumerate()
            .map(|(idx, section)| self.parse_section(idx, section))
            .collect()
    }

    fn parse_section(&self, index: usize, section: Section<'_>) -> Slide {
        let title = if section.title.is_empty() {
            Slide::default_title(index)
        } else {
            section.title.to_string()
        };

        let mut scanner = SectionScanner::new(&self.config, &self.charts, Slide::new(title));
        for line in section.lines {
            scanner.feed(line);
        }
        scanner.finish()
    }
}

/// Parse text with the default configuration.
pub fn parse_slides(text: &str) -> Vec<Slide> {
    SlideTextParser::default().parse(text)
}

/// Scanner state between lines.
#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Bullets,
    /// Bullets go to the column bucket at this index.
    Column(usize),
    /// A run of `|` rows waiting to be flushed as one table.
    Table(Vec<String>),
    /// Inside a fence; raw lines are buffered until the closer.
    Fence { kind: FenceKind, lines: Vec<String> },
}

/// Builds one slide from its section lines.
struct SectionScanner<'p> {
    config: &'p ParserConfig,
    charts: &'p ChartBlockDecoder,
    slide: Slide,
    state: ScanState,
}

impl<'p> SectionScanner<'p> {
    fn new(config: &'p ParserConfig, charts: &'p ChartBlockDecoder, slide: Slide) -> Self {
        Self {
            config,
            charts,
            slide,
            state: ScanState::Idle,
        }
    }

    fn feed(&mut self, line: &str) {
        if matches!(self.state, ScanState::Fence { .. }) {
            if fence_line(line) == Some(FenceLine::Bare) {
                self.close_fence();
            } else if let ScanState::Fence { lines, .. } = &mut self.state {
                lines.push(line.to_string());
            }
            return;
        }

        let class = self.classify(line);
        if class != LineClass::TableRow {
            self.flush_table();
        }

        match class {
            LineClass::FenceOpen(kind) => {
                self.state = ScanState::Fence {
                    kind,
                    lines: Vec::new(),
                };
            }
            LineClass::ShapeHint(shape) => self.slide.shapes.push(shape),
            LineClass::TableRow => {
                let row = line.trim().to_string();
                if let ScanState::Table(rows) = &mut self.state {
                    rows.push(row);
                } else {
                    self.state = ScanState::Table(vec![row]);
                }
            }
            LineClass::LayoutMarker => {}
            LineClass::ColumnHeading(title) => {
                let idx = self.slide.columns.open(title);
                self.state = ScanState::Column(idx);
            }
            LineClass::Bullet(text) => match self.state {
                ScanState::Column(idx) => self.slide.columns.push_item(idx, text),
                _ => {
                    self.slide.bullets.push(text);
                    self.state = ScanState::Bullets;
                }
            },
            LineClass::Other => {}
        }
    }

    /// Classify a line outside any fence. Earlier rules win.
    fn classify(&self, line: &str) -> LineClass {
        let blocks = &self.config.blocks;

        match fence_line(line) {
            Some(FenceLine::Bare) => {
                log::warn!(
                    "Ignoring stray closing fence in slide {:?}",
                    self.slide.title
                );
                return LineClass::Other;
            }
            Some(FenceLine::Open(kind)) if self.block_enabled(kind) => {
                return LineClass::FenceOpen(kind);
            }
            Some(FenceLine::Open(_)) => return LineClass::FenceOpen(FenceKind::Other),
            None => {}
        }

        if blocks.shapes {
            if let Some(shape) = shape_hint(line) {
                return LineClass::ShapeHint(shape);
            }
        }

        if blocks.tables && is_table_row(line) {
            return LineClass::TableRow;
        }

        if blocks.columns {
            if is_layout_marker(line) {
                return LineClass::LayoutMarker;
            }
            if let Some(title) = bold_heading(line) {
                return LineClass::ColumnHeading(title);
            }
        }

        match bullet_text(line) {
            Some(text) => LineClass::Bullet(text.to_string()),
            None => LineClass::Other,
        }
    }

    fn block_enabled(&self, kind: FenceKind) -> bool {
        let blocks = &self.config.blocks;
        match kind {
            FenceKind::Chart => blocks.charts,
            FenceKind::Table => blocks.tables,
            FenceKind::Shapes => blocks.shapes,
            FenceKind::Columns => blocks.columns,
            FenceKind::Other => false,
        }
    }

    fn flush_table(&mut self) {
        if let ScanState::Table(rows) = &mut self.state {
            let rows = std::mem::take(rows);
            self.state = ScanState::Idle;
            self.slide.tables.push(rows.join("\n"));
        }
    }

    fn close_fence(&mut self) {
        let ScanState::Fence { kind, lines } = std::mem::take(&mut self.state) else {
            return;
        };

        let body = trim_blank_lines(&lines);
        if body.is_empty() {
            log::debug!("Dropping empty {:?} fence", kind);
            return;
        }

        match kind {
            FenceKind::Chart => {
                let chart = self.charts.decode(&body.join("\n"));
                self.slide.charts.push(chart);
            }
            FenceKind::Table => self.slide.tables.push(body.join("\n")),
            FenceKind::Shapes => self.slide.shapes.push(body.join("\n")),
            FenceKind::Columns => self.parse_columns(body),
            FenceKind::Other => log::debug!("Skipped unrecognized fence ({} lines)", body.len()),
        }
    }

    /// Parse the body of a ```` ```columns ```` fence.
    fn parse_columns(&mut self, body: &[String]) {
        let mut current: Option<usize> = None;

        for line in body {
            if line.trim().is_empty() || is_layout_marker(line) {
                continue;
            }
            if let Some(title) = column_fence_heading(line) {
                current = Some(self.slide.columns.open(title));
                continue;
            }
            if let Some(text) = bullet_text(line) {
                match current {
                    Some(idx) => self.slide.columns.push_item(idx, text),
                    None => self.slide.bullets.push(text.to_string()),
                }
            }
        }
    }

    fn finish(mut self) -> Slide {
        if let ScanState::Fence { kind, .. } = &self.state {
            log::warn!(
                "Unterminated {:?} fence in slide {:?}, closing at section end",
                kind,
                self.slide.title
            );
            self.close_fence();
        }
        self.flush_table();

        let has_blocks = !self.slide.tables.is_empty() || !self.slide.columns.is_empty();
        if self.config.stray_bullets == StrayBullets::DropWithBlocks && has_blocks {
            self.slide.bullets.clear();
        }

        self.slide
    }
}

/// Drop leading and trailing blank lines.
fn trim_blank_lines(lines: &[String]) -> &[String] {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => &lines[start..=end],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{BlockKinds, SplitMode};
    use rstest::rstest;

    fn parse(text: &str) -> Vec<Slide> {
        parse_slides(text)
    }

    #[test]
    fn test_bullets() {
        let slides = parse("Slide 1: Intro\n- First point\n- Second point\n");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].bullets, vec!["First point", "Second point"]);
    }

    #[test]
    fn test_empty_title_defaults_to_position() {
        let slides = parse("Slide 1: Intro\nSlide 7:\n- a");
        assert_eq!(slides[1].title, "Slide 2");
        assert_eq!(slides[1].bullets, vec!["a"]);
    }

    #[test]
    fn test_shape_hint_not_a_bullet() {
        let slides =
            parse("Slide 1: Org\n- Use a triangle shape to represent hierarchy.\n- Real point");
        assert_eq!(slides[0].shapes, vec!["triangle"]);
        assert_eq!(slides[0].bullets, vec!["Real point"]);
    }

    #[test]
    fn test_columns() {
        let slides =
            parse("Slide 1: Tradeoffs\n**Benefits:**\n- Scalability\n**Challenges:**\n- Downtime");
        let columns = &slides[0].columns;

        assert_eq!(columns.titles().collect::<Vec<_>>(), vec!["Benefits", "Challenges"]);
        assert_eq!(columns.get("Benefits"), Some(&["Scalability".to_string()][..]));
        assert_eq!(columns.get("Challenges"), Some(&["Downtime".to_string()][..]));
        assert!(slides[0].bullets.is_empty());
    }

    #[test]
    fn test_layout_marker_is_not_a_column() {
        let slides = parse("Slide 1: T\n**Multi-Column Layout**\n**Left:**\n- a");
        assert_eq!(slides[0].columns.titles().collect::<Vec<_>>(), vec!["Left"]);
    }

    #[test]
    fn test_blank_lines_keep_column_open() {
        let slides = parse("Slide 1: T\n**Left:**\n\n- a\nSome prose\n- b");
        assert_eq!(
            slides[0].columns.get("Left"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn test_inline_table_run() {
        let slides = parse("Slide 1: T\n| A | B |\n|---|---|\n| 1 | 2 |\n\n- after");
        assert_eq!(slides[0].tables, vec!["| A | B |\n|---|---|\n| 1 | 2 |"]);
        assert_eq!(slides[0].bullets, vec!["after"]);
    }

    #[test]
    fn test_two_table_runs() {
        let slides = parse("Slide 1: T\n| a |\nbreak\n| b |");
        assert_eq!(slides[0].tables, vec!["| a |", "| b |"]);
    }

    #[test]
    fn test_table_ends_column_bucket() {
        let slides = parse("Slide 1: T\n**Left:**\n- a\n| x |\n- b");
        assert_eq!(slides[0].columns.get("Left"), Some(&["a".to_string()][..]));
        assert_eq!(slides[0].tables, vec!["| x |"]);
        assert_eq!(slides[0].bullets, vec!["b"]);
    }

    #[test]
    fn test_table_fence_verbatim() {
        let text = "Slide 1: T\n```table\n  | Name | Score |  \n| --- | --- |\n| Ann | 9 |\n```";
        let slides = parse(text);
        assert_eq!(
            slides[0].tables,
            vec!["  | Name | Score |  \n| --- | --- |\n| Ann | 9 |"]
        );
    }

    #[test]
    fn test_chart_fence() {
        let text =
            "Slide 1: Share\n```chart\nType: pie\nHealthcare: 40%\nFinance: 25%\n```\n- note";
        let slides = parse(text);
        let chart = &slides[0].charts[0];
        assert_eq!(chart.chart_type, "pie");
        assert_eq!(chart.series.len(), 2);
        assert_eq!(slides[0].bullets, vec!["note"]);
    }

    #[test]
    fn test_shapes_fence() {
        let slides = parse("Slide 1: T\n```shapes\n\ncircle: center\narrow: right\n\n```");
        assert_eq!(slides[0].shapes, vec!["circle: center\narrow: right"]);
    }

    #[test]
    fn test_columns_fence() {
        let text = "Slide 1: T\n```columns\n- loose\nLeft:\n- a\n**Right**\n- b\n* c\n```";
        let slides = parse(text);
        assert_eq!(slides[0].bullets, vec!["loose"]);
        assert_eq!(slides[0].columns.get("Left"), Some(&["a".to_string()][..]));
        assert_eq!(
            slides[0].columns.get("Right"),
            Some(&["b".to_string(), "c".to_string()][..])
        );
    }

    #[rstest]
    #[case(SplitMode::LineScan)]
    #[case(SplitMode::Regex)]
    fn test_unterminated_fence_closed_at_section_end(#[case] mode: SplitMode) {
        let text = "Slide 1: A\n```chart\nQ1: 5\nSlide 2: B\n- b\nSlide 3: C\n- c";
        let slides = SlideTextParser::new(ParserConfig::new().with_split_mode(mode)).parse(text);

        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].charts[0].series.len(), 1);
        assert_eq!(slides[1].title, "B");
        assert_eq!(slides[1].bullets, vec!["b"]);
        assert_eq!(slides[2].bullets, vec!["c"]);
    }

    #[test]
    fn test_stray_closing_fence_ignored() {
        let slides = parse("Slide 1: A\n```\n- one\n- two\n");
        assert_eq!(slides[0].bullets, vec!["one", "two"]);
    }

    #[test]
    fn test_stray_closer_after_closed_fence() {
        let slides = parse("Slide 1: A\n```chart\nQ1: 5\n```\n```\n- after");
        assert_eq!(slides[0].charts.len(), 1);
        assert_eq!(slides[0].bullets, vec!["after"]);
    }

    #[test]
    fn test_joiner_sequences_survive_in_table_fence() {
        let text = "Slide 1: Team\n```table\n| Role | 👩\u{200D}💻 dev |\n```\n- Soft\u{00AD}ware";
        let slides = parse(text);
        assert_eq!(slides[0].tables, vec!["| Role | 👩\u{200D}💻 dev |"]);
        assert_eq!(slides[0].bullets, vec!["Soft\u{00AD}ware"]);
    }

    #[test]
    fn test_decomposed_title_kept_as_written() {
        let slides = parse("Slide 1: Cafe\u{0301}\n");
        assert_eq!(slides[0].title, "Cafe\u{0301}");
    }

    #[test]
    fn test_unterminated_table_flushed() {
        let slides = parse("Slide 1: A\n```table\n| a |\n| b |");
        assert_eq!(slides[0].tables, vec!["| a |\n| b |"]);
    }

    #[test]
    fn test_other_fence_body_skipped() {
        let slides = parse("Slide 1: Code\n```python\n- not a bullet\n```\n- real");
        assert_eq!(slides[0].bullets, vec!["real"]);
    }

    #[test]
    fn test_empty_fence_produces_nothing() {
        let slides = parse("Slide 1: T\n```chart\n\n```\n```table\n```");
        assert!(slides[0].charts.is_empty());
        assert!(slides[0].tables.is_empty());
    }

    #[test]
    fn test_no_markers_strict() {
        assert!(parse("- a\n- b").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_no_markers_lenient() {
        let parser = SlideTextParser::new(ParserConfig::new().with_fallback(Fallback::Lenient));

        let slides = parser.parse("Some intro\n- a\n- b");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Slide 1");
        assert_eq!(slides[0].bullets, vec!["a", "b"]);

        assert!(parser.parse("  \n\n").is_empty());
    }

    #[test]
    fn test_disabled_chart_fence_is_discarded() {
        let config = ParserConfig::new().with_blocks(BlockKinds {
            charts: false,
            ..BlockKinds::all()
        });
        let slides = SlideTextParser::new(config).parse("Slide 1: T\n```chart\n- Q1: 10\n```");
        assert!(slides[0].charts.is_empty());
        assert!(slides[0].bullets.is_empty());
    }

    #[test]
    fn test_disabled_columns_send_bullets_to_slide() {
        let config = ParserConfig::new().with_blocks(BlockKinds {
            columns: false,
            ..BlockKinds::all()
        });
        let slides = SlideTextParser::new(config).parse("Slide 1: T\n**Left:**\n- a");
        assert!(slides[0].columns.is_empty());
        assert_eq!(slides[0].bullets, vec!["a"]);
    }

    #[test]
    fn test_disabled_tables_ignore_rows() {
        let config = ParserConfig::new().with_blocks(BlockKinds {
            tables: false,
            ..BlockKinds::all()
        });
        let slides = SlideTextParser::new(config).parse("Slide 1: T\n| a |\n- b");
        assert!(slides[0].tables.is_empty());
        assert_eq!(slides[0].bullets, vec!["b"]);
    }

    #[test]
    fn test_disabled_shapes_fall_through_to_bullets() {
        let config = ParserConfig::new().with_blocks(BlockKinds {
            shapes: false,
            ..BlockKinds::all()
        });
        let slides = SlideTextParser::new(config).parse("Slide 1: T\n- Use a circle shape");
        assert!(slides[0].shapes.is_empty());
        assert_eq!(slides[0].bullets, vec!["Use a circle shape"]);
    }

    #[test]
    fn test_drop_stray_bullets_with_blocks() {
        let config = ParserConfig::new().with_stray_bullets(StrayBullets::DropWithBlocks);
        let parser = SlideTextParser::new(config);

        let slides = parser.parse("Slide 1: T\n- stray\n| a |\nSlide 2: U\n- kept");
        assert!(slides[0].bullets.is_empty());
        assert_eq!(slides[0].tables.len(), 1);
        assert_eq!(slides[1].bullets, vec!["kept"]);
    }

    #[test]
    fn test_keep_stray_bullets_by_default() {
        let slides = parse("Slide 1: T\n- stray\n| a |");
        assert_eq!(slides[0].bullets, vec!["stray"]);
    }

    #[test]
    fn test_wrapper_fence_removed_before_parsing() {
        let slides = parse("```markdown\nSlide 1: Intro\n- a\n```");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].bullets, vec!["a"]);
    }

    #[test]
    fn test_horizontal_rule_and_bold_prose_ignored() {
        let slides = parse("Slide 1: T\n---\n**Note** this is prose\n* real");
        assert_eq!(slides[0].bullets, vec!["real"]);
        assert!(slides[0].columns.is_empty());
    }

    #[test]
    fn test_trim_blank_lines() {
        let lines: Vec<String> = vec!["".into(), " a".into(), "".into(), "b".into(), "  ".into()];
        assert_eq!(trim_blank_lines(&lines), &lines[1..4]);
        assert!(trim_blank_lines(&["".to_string()]).is_empty());
    }
}
