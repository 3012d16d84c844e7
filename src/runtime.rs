// Pipeline executor: table + configuration -> renderer-ready output

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::debug;
use serde::Serialize;

use crate::config::ChartConfig;
use crate::data::RawTable;
use crate::grid::{self, GridDimensions};
use crate::ir::{ChartData, ChartGroup};
use crate::layout::{calculate_layout, ChartLayout, LayoutConfig};
use crate::scale::{value_domain, ValueDomain};
use crate::transform::transform;

/// Everything the renderer needs for one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOutput {
    pub data: ChartData,
    /// Present in grid mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ChartGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridDimensions>,
    /// In grid mode this is the geometry of a single grid cell
    pub layout: ChartLayout,
    pub domain: ValueDomain,
}

/// Run the full pipeline for one table snapshot
pub fn build_chart(table: &RawTable, config: &ChartConfig) -> ChartOutput {
    let data = transform(table, &config.mapping, config.aggregation);
    let domain = value_domain(&data, &config.layout.y_axis);

    if !config.grid.enabled {
        return ChartOutput {
            layout: calculate_layout(&config.layout),
            data,
            groups: None,
            grid: None,
            domain,
        };
    }

    let groups = grid::split(&data, config.grid.split_by);
    let dims = grid::grid_dimensions(groups.len(), config.grid.columns);
    debug!("split into {} charts on a {}x{} grid", groups.len(), dims.rows, dims.cols);

    ChartOutput {
        layout: calculate_layout(&cell_layout_config(&config.layout, dims)),
        data,
        groups: Some(groups),
        grid: Some(dims),
        domain,
    }
}

/// Layout config for one grid cell: the total area divided evenly
fn cell_layout_config(layout: &LayoutConfig, dims: GridDimensions) -> LayoutConfig {
    let mut cell = layout.clone();
    if dims.cols > 0 && dims.rows > 0 {
        cell.width = layout.width / dims.cols as f64;
        cell.height = layout.height / dims.rows as f64;
    }
    cell
}

/// Content hash of the pipeline inputs
pub fn input_hash(table: &RawTable, config: &ChartConfig) -> Option<u64> {
    let config_bytes = serde_json::to_vec(config).ok()?;
    let mut hasher = DefaultHasher::new();
    table.hash(&mut hasher);
    config_bytes.hash(&mut hasher);
    Some(hasher.finish())
}

/// Memoizes the last pipeline result, recomputing only when the content
/// hash of the table and configuration changes.
#[derive(Debug, Default)]
pub struct ChartCache {
    key: Option<u64>,
    output: Option<ChartOutput>,
    builds: usize,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, table: &RawTable, config: &ChartConfig) -> &ChartOutput {
        let key = input_hash(table, config);
        let fresh = key.is_some() && key == self.key;

        if !fresh {
            debug!("chart inputs changed; rebuilding");
            self.builds += 1;
            self.key = key;
            self.output = Some(build_chart(table, config));
        }

        // The key is only ever set together with the output
        self.output.get_or_insert_with(|| build_chart(table, config))
    }

    /// Number of times the pipeline actually ran
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.output = None;
    }
}
