// Library exports for chartshape

pub mod config;
pub mod data;
pub mod grid;
pub mod ir;
pub mod layout;
pub mod mapping;
pub mod parser;
pub mod resolve;
pub mod runtime;
pub mod scale;
pub mod transform;

pub use config::ChartConfig;
pub use data::{Cell, RawTable};
pub use grid::{split, GridSettings, SplitBy};
pub use ir::{ChartData, ChartGroup, FieldValue, TransformedRow};
pub use layout::{calculate_layout, ChartLayout, LayoutConfig};
pub use mapping::{AggregationMode, ColumnMapping};
pub use runtime::{build_chart, ChartCache, ChartOutput};
pub use scale::value_domain;
pub use transform::transform;

use serde::Deserialize;

/// Encoding of tabular input read by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum InputFormat {
    #[serde(rename = "csv")]
    #[default]
    Csv,
    #[serde(rename = "json")]
    Json,
}

/// Load a table from a reader in the given format
pub fn read_table<R: std::io::Read>(reader: R, format: InputFormat) -> anyhow::Result<RawTable> {
    use anyhow::Context;

    match format {
        InputFormat::Csv => RawTable::from_csv_reader(reader),
        InputFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_reader(reader).context("Input is not valid JSON")?;
            RawTable::from_json(&value)
        }
    }
}
