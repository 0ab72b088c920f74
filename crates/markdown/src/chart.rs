//! Decoding of ```` ```chart ```` block bodies.
//!
//! A chart body is a list of `key: value` lines. `Type:` and `Title:` set the
//! chart kind and dataset label; every other pair is a data point whose value
//! must be numeric (a trailing `%` is allowed).

use deck_core::ChartData;

/// Decoder turning a chart block body into [`ChartData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartBlockDecoder;

impl ChartBlockDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a chart body. Never fails; lines that don't fit are skipped.
    pub fn decode(&self, body: &str) -> ChartData {
        let mut chart = ChartData::new();

        for line in body.lines() {
            let line = strip_list_marker(line.trim());
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("type") {
                if !value.is_empty() {
                    chart.chart_type = value.to_string();
                }
            } else if key.eq_ignore_ascii_case("title") {
                if !value.is_empty() {
                    chart.label = value.to_string();
                }
            } else if key.is_empty() {
                log::debug!("Skipping chart line without a label: {:?}", line);
            } else if let Some(number) = parse_value(value) {
                chart.push_point(key, number);
            } else {
                log::debug!("Skipping non-numeric chart value {:?} for {:?}", value, key);
            }
        }

        chart
    }
}

fn strip_list_marker(line: &str) -> &str {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line)
}

/// Parse a finite number, allowing one trailing percent sign.
fn parse_value(value: &str) -> Option<f64> {
    let value = value.strip_suffix('%').unwrap_or(value).trim();
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
