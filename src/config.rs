use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::GridSettings;
use crate::layout::LayoutConfig;
use crate::mapping::{AggregationMode, ColumnMapping};
use crate::parser::MappingSpec;

/// Everything the pipeline reads from the configuration store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub mapping: ColumnMapping,
    pub aggregation: AggregationMode,
    pub grid: GridSettings,
    pub layout: LayoutConfig,
}

impl ChartConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Invalid chart configuration JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))
    }

    /// Overlay the settings named in a mapping pipeline
    pub fn apply(&mut self, spec: MappingSpec) {
        if let Some(col) = spec.labels {
            self.mapping.labels = Some(col);
        }
        if let Some(cols) = spec.values {
            self.mapping.values = cols;
        }
        if let Some(cols) = spec.series {
            self.mapping.series = cols;
        }
        if let Some(cols) = spec.categories {
            self.mapping.categories = cols;
        }
        if let Some(mode) = spec.aggregation {
            self.aggregation = mode;
        }
        if let Some(grid) = spec.grid {
            self.grid = GridSettings {
                enabled: true,
                split_by: grid.by,
                columns: grid.ncol,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SplitBy;
    use crate::parser::parse_mapping;

    #[test]
    fn test_config_from_json() {
        let config = ChartConfig::from_json_str(
            r#"{
                "mapping": {"labels": 0, "values": [1]},
                "aggregation": "average",
                "grid": {"enabled": true, "splitBy": "value", "columns": 3},
                "layout": {"edgePadding": 10, "yAxis": {"stacked": true}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.mapping, ColumnMapping::new(0, vec![1]));
        assert_eq!(config.aggregation, AggregationMode::Average);
        assert_eq!(config.grid.split_by, SplitBy::Value);
        assert_eq!(config.grid.columns, Some(3));
        assert_eq!(config.layout.edge_padding, 10.0);
        assert!(config.layout.y_axis.stacked);
        assert_eq!(config.layout.width, 800.0);
    }

    #[test]
    fn test_config_empty_object() {
        let config = ChartConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn test_config_rejects_bad_mode() {
        let err = ChartConfig::from_json_str(r#"{"aggregation": "median"}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid chart configuration"));
    }

    #[test]
    fn test_apply_mapping_spec() {
        let mut config = ChartConfig::default();
        config.mapping.categories = vec![5];
        config.apply(parse_mapping("labels(0) | values(2, 1) | aggregate(count) | grid(by: label)").unwrap());
        assert_eq!(config.mapping.labels, Some(0));
        assert_eq!(config.mapping.values, vec![2, 1]);
        // Untouched fields survive
        assert_eq!(config.mapping.categories, vec![5]);
        assert_eq!(config.aggregation, AggregationMode::Count);
        assert!(config.grid.enabled);
        assert_eq!(config.grid.split_by, SplitBy::Label);
    }
}
