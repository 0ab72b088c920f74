//! Plain-text outline output.
//!
//! Lists each parsed slide as an indented outline, slides separated by a
//! blank line. Meant for eyeballing parser output in a terminal.

use crate::{ChartData, Slide};

/// Formatter for plain-text slide outlines.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Spaces per indentation level.
    indent: usize,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl OutlineFormatter {
    /// Create a new formatter with two-space indentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per indentation level.
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces.max(1); // Nested items must stay distinguishable
        self
    }

    /// Format slides as an outline.
    ///
    /// # Example output
    /// ```text
    /// Slide 1: Cloud Adoption
    ///   - Lower upfront cost
    ///   [Benefits]
    ///     - Scalability
    ///   Chart (pie, Dataset): Healthcare=40, Finance=25
    ///   Shape: triangle
    /// ```
    pub fn format(&self, slides: &[Slide]) -> String {
        slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| self.format_slide(idx, slide))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format and add a trailing newline when there is any output.
    pub fn format_with_newline(&self, slides: &[Slide]) -> String {
        let formatted = self.format(slides);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }

    fn format_slide(&self, idx: usize, slide: &Slide) -> String {
        let one = " ".repeat(self.indent);
        let two = " ".repeat(self.indent * 2);
        let mut lines = vec![format!("Slide {}: {}", idx + 1, slide.title)];

        for bullet in &slide.bullets {
            lines.push(format!("{}- {}", one, bullet));
        }

        for bucket in &slide.columns {
            lines.push(format!("{}[{}]", one, bucket.title));
            for item in &bucket.items {
                lines.push(format!("{}- {}", two, item));
            }
        }

        for table in &slide.tables {
            for row in table.lines() {
                lines.push(format!("{}{}", one, row.trim()));
            }
        }

        for chart in &slide.charts {
            lines.push(format!("{}{}", one, chart_summary(chart)));
        }

        for shape in &slide.shapes {
            lines.push(format!("{}Shape: {}", one, shape.replace('\n', "; ")));
        }

        lines.join("\n")
    }
}

fn chart_summary(chart: &ChartData) -> String {
    let points = chart
        .series
        .iter()
        .map(|p| format!("{}={}", p.label, p.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Chart ({}, {}): {}", chart.chart_type, chart.label, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_slide() -> Slide {
        let mut slide = Slide::new("Cloud Adoption");
        slide.bullets.push("Lower upfront cost".to_string());
        let idx = slide.columns.open("Benefits");
        slide.columns.push_item(idx, "Scalability");
        slide.tables.push("| A | B |\n| 1 | 2 |".to_string());
        let mut chart = ChartData::new();
        chart.chart_type = "pie".to_string();
        chart.push_point("Healthcare", 40.0);
        chart.push_point("Finance", 25.5);
        slide.charts.push(chart);
        slide.shapes.push("triangle".to_string());
        slide
    }

    #[test]
    fn test_format_empty() {
        let formatter = OutlineFormatter::new();
        assert_eq!(formatter.format(&[]), "");
        assert_eq!(formatter.format_with_newline(&[]), "");
    }

    #[test]
    fn test_format_full_slide() {
        let formatter = OutlineFormatter::new();
        let expected = "Slide 1: Cloud Adoption\n  - Lower upfront cost\n  [Benefits]\n    - Scalability\n  | A | B |\n  | 1 | 2 |\n  Chart (pie, Dataset): Healthcare=40, Finance=25.5\n  Shape: triangle";
        assert_eq!(formatter.format(&[sample_slide()]), expected);
    }

    #[test]
    fn test_slides_separated_by_blank_line() {
        let formatter = OutlineFormatter::new();
        let slides = vec![Slide::new("One"), Slide::new("Two")];
        assert_eq!(formatter.format(&slides), "Slide 1: One\n\nSlide 2: Two");
    }

    #[test]
    fn test_custom_indent() {
        let formatter = OutlineFormatter::new().with_indent(4);
        let mut slide = Slide::new("Intro");
        slide.bullets.push("Point".to_string());
        assert_eq!(formatter.format(&[slide]), "Slide 1: Intro\n    - Point");
    }

    #[test]
    fn test_format_with_trailing_newline() {
        let formatter = OutlineFormatter::new();
        let result = formatter.format_with_newline(&[Slide::new("Only")]);
        assert!(result.ends_with('\n'));
    }
}
