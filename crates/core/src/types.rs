//! Domain types for representing a parsed slide deck.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Display colors assigned to chart series entries, cycled by index.
pub const PALETTE: [&str; 8] = [
    "#8BC34A", "#7E57C2", "#4FC3F7", "#FFA726", "#F06292", "#26A69A", "#FFD54F", "#EF5350",
];

/// Chart type used when a chart block does not name one.
pub const DEFAULT_CHART_TYPE: &str = "bar";

/// Dataset label used when a chart block has no title.
pub const DEFAULT_CHART_LABEL: &str = "Dataset";

/// A single slide recovered from generated text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide title from the "Slide N: Title" marker line.
    pub title: String,

    /// Bullet points, in reading order.
    #[serde(default)]
    pub bullets: Vec<String>,

    /// Markdown tables, each one kept as its raw newline-joined rows.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Multi-column layout buckets, keyed by column heading.
    #[serde(default)]
    pub columns: Columns,

    /// Decoded chart blocks.
    #[serde(default)]
    pub charts: Vec<ChartData>,

    /// Shape and icon hints.
    #[serde(default)]
    pub shapes: Vec<String>,
}

impl Slide {
    /// Create an empty slide with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Title used when a marker line carries no text.
    pub fn default_title(index: usize) -> String {
        format!("Slide {}", index + 1)
    }

    /// True if nothing besides the title was recovered.
    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
            && self.tables.is_empty()
            && self.columns.is_empty()
            && self.charts.is_empty()
            && self.shapes.is_empty()
    }
}

/// One named column of a multi-column layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBucket {
    /// Column heading, without bold markers or trailing colon.
    pub title: String,

    /// Items listed under the heading.
    pub items: Vec<String>,
}

/// Insertion-ordered mapping from column heading to its items.
///
/// Serializes as a JSON object whose keys keep the order the headings
/// appeared in. Headings are unique: opening a heading twice reuses the
/// existing bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    buckets: Vec<ColumnBucket>,
}

impl Columns {
    /// Create an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of the bucket named `title`, creating it if needed.
    pub fn open(&mut self, title: impl Into<String>) -> usize {
        let title = title.into();
        if let Some(idx) = self.buckets.iter().position(|b| b.title == title) {
            return idx;
        }
        self.buckets.push(ColumnBucket {
            title,
            items: Vec::new(),
        });
        self.buckets.len() - 1
    }

    /// Append an item to the bucket at `index`. Out-of-range indices are ignored.
    pub fn push_item(&mut self, index: usize, item: impl Into<String>) {
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.items.push(item.into());
        }
    }

    /// Look up a bucket's items by heading.
    pub fn get(&self, title: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|b| b.title == title)
            .map(|b| b.items.as_slice())
    }

    /// Headings in insertion order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.title.as_str())
    }

    /// Iterate over the buckets in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnBucket;
    type IntoIter = std::slice::Iter<'a, ColumnBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Columns
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut columns = Columns::new();
        for (title, items) in iter {
            let idx = columns.open(title);
            for item in items {
                columns.push_item(idx, item);
            }
        }
        columns
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.title, &bucket.items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = Columns;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column headings to item lists")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Columns, A::Error> {
                let mut columns = Columns::new();
                while let Some((title, items)) = access.next_entry::<String, Vec<String>>()? {
                    let idx = columns.open(title);
                    for item in items {
                        columns.push_item(idx, item);
                    }
                }
                Ok(columns)
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

/// One labeled numeric point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Normalized chart data decoded from a chart block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Free-form chart kind ("bar", "pie", "line", ...).
    pub chart_type: String,

    /// Dataset or chart title.
    pub label: String,

    /// Points in order of appearance.
    pub series: Vec<SeriesPoint>,

    /// One palette color per series point, aligned by index.
    pub display_colors: Vec<String>,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            chart_type: DEFAULT_CHART_TYPE.to_string(),
            label: DEFAULT_CHART_LABEL.to_string(),
            series: Vec::new(),
            display_colors: Vec::new(),
        }
    }
}

impl ChartData {
    /// Create empty chart data with the default type and label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point and its palette color.
    ///
    /// This is the only way points are added, so `display_colors` always has
    /// the same length as `series`.
    pub fn push_point(&mut self, label: impl Into<String>, value: f64) {
        let color = PALETTE[self.series.len() % PALETTE.len()];
        self.series.push(SeriesPoint {
            label: label.into(),
            value,
        });
        self.display_colors.push(color.to_string());
    }
}
