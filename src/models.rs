// ABOUTME: Shared data models for Sakila Charts
// ABOUTME: Report definitions, result cells, pivoted series and render options

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Caller-supplied parameter values, keyed by placeholder name
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// Kind of chart a report is drawn as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Histogram,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Histogram,
        ChartKind::Pie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown chart kind: {}", s))
    }
}

/// A named report: query template plus how to chart its result
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefinition {
    pub name: String,
    /// Section number of the exercise packet; not unique
    pub section: u32,
    pub template: String,
    /// Number of columns the query should return (informational)
    pub expected_columns: usize,
    pub x_label: String,
    pub y_label: String,
    pub chart_kind: ChartKind,
    pub requires_parameters: bool,
    pub default_parameters: BTreeMap<String, String>,
}

impl QueryDefinition {
    pub fn new(
        section: u32,
        name: impl Into<String>,
        template: impl Into<String>,
        expected_columns: usize,
        chart_kind: ChartKind,
    ) -> Self {
        Self {
            name: name.into(),
            section,
            template: template.into(),
            expected_columns,
            x_label: String::new(),
            y_label: String::new(),
            chart_kind,
            requires_parameters: false,
            default_parameters: BTreeMap::new(),
        }
    }

    pub fn labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Mark the template as parameterized, with the given defaults
    pub fn parameters(mut self, defaults: &[(&str, &str)]) -> Self {
        self.requires_parameters = true;
        self.default_parameters = defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }
}

/// A single value returned by a query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell; text counts when it parses as a finite number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

/// Rows returned by a query runner, with their column names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }
}

/// Column-oriented view of a result set, ready for charting
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBundle {
    /// Column 0 of every row
    pub categories: Vec<Cell>,
    /// Columns 1..N, in query order
    pub values: Vec<Vec<Cell>>,
    /// Upper y-axis bound; `None` means the renderer should auto-scale
    pub y_bound: Option<f64>,
    /// Indices into `values` left out of the bound because they are not numeric
    pub skipped: Vec<usize>,
}

impl SeriesBundle {
    pub fn series_count(&self) -> usize {
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Values of one series as numbers, or `None` if any of them is not numeric
    pub fn numeric_series(&self, index: usize) -> Option<Vec<f64>> {
        self.values
            .get(index)?
            .iter()
            .map(Cell::as_f64)
            .collect()
    }
}

/// Everything a renderer needs besides the data itself
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_bounds: Option<(f64, f64)>,
    pub series_names: Vec<String>,
    /// Width and height in pixels
    pub figure_size: Option<(u32, u32)>,
}
