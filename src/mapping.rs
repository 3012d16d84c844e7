use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-chosen assignment of table columns to chart roles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Column holding the label (x-axis / category) dimension
    pub labels: Option<usize>,
    /// Value columns; order decides series and color order
    pub values: Vec<usize>,
    /// Series columns; non-empty switches to long-format pivoting
    pub series: Vec<usize>,
    /// Columns carried through without aggregation
    pub categories: Vec<usize>,
}

impl ColumnMapping {
    pub fn new(labels: usize, values: Vec<usize>) -> Self {
        Self {
            labels: Some(labels),
            values,
            ..Default::default()
        }
    }

    pub fn with_series(mut self, series: Vec<usize>) -> Self {
        self.series = series;
        self
    }

    pub fn with_categories(mut self, categories: Vec<usize>) -> Self {
        self.categories = categories;
        self
    }

    /// A label column and at least one value column are required
    pub fn is_complete(&self) -> bool {
        self.labels.is_some() && !self.values.is_empty()
    }
}

/// Reduction applied to rows sharing a label in wide format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    #[default]
    None,
    Sum,
    Average,
    Count,
}

impl FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AggregationMode::None),
            "sum" => Ok(AggregationMode::Sum),
            "average" | "avg" | "mean" => Ok(AggregationMode::Average),
            "count" => Ok(AggregationMode::Count),
            other => Err(format!("unknown aggregation mode '{}'", other)),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationMode::None => "none",
            AggregationMode::Sum => "sum",
            AggregationMode::Average => "average",
            AggregationMode::Count => "count",
        };
        f.write_str(name)
    }
}
