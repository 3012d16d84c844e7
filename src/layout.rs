//! Chart geometry: margins and inner drawing area.
//!
//! The calculation is driven only by configuration. Each visible element
//! reserves a band on the side it occupies:
//!
//! ```text
//! base margin    top 20, right 30, bottom 40, left 50
//! legend         +120 on its side
//! x axis         +title_padding + label_spacing on top or bottom
//! y axis         +title_padding + label_spacing on left or right
//! edge padding   +edge_padding on top and bottom
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

/// Band reserved for the legend on whichever side it sits
pub const LEGEND_BAND: f64 = 120.0;

pub const BASE_MARGIN: Margin = Margin {
    top: 20.0,
    right: 30.0,
    bottom: 40.0,
    left: 50.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAxisPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxisPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub show: bool,
    pub position: LegendPosition,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self { show: true, position: LegendPosition::Right }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XAxisConfig {
    pub show: bool,
    pub position: XAxisPosition,
    pub title_padding: f64,
    pub label_spacing: f64,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            position: XAxisPosition::Bottom,
            title_padding: default_title_padding(),
            label_spacing: default_label_spacing(),
        }
    }
}

/// Value-axis configuration. The domain overrides are read by
/// [`crate::scale::value_domain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YAxisConfig {
    pub show: bool,
    pub position: YAxisPosition,
    pub title_padding: f64,
    pub label_spacing: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub include_zero: bool,
    /// Domain covers per-label sums of all value keys
    pub stacked: bool,
}

impl Default for YAxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            position: YAxisPosition::Left,
            title_padding: default_title_padding(),
            label_spacing: default_label_spacing(),
            min: None,
            max: None,
            include_zero: true,
            stacked: false,
        }
    }
}

fn default_width() -> f64 { 800.0 }
fn default_height() -> f64 { 600.0 }
fn default_title_padding() -> f64 { 20.0 }
fn default_label_spacing() -> f64 { 10.0 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub legend: LegendConfig,
    #[serde(default)]
    pub x_axis: XAxisConfig,
    #[serde(default)]
    pub y_axis: YAxisConfig,
    #[serde(default)]
    pub edge_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            legend: LegendConfig::default(),
            x_axis: XAxisConfig::default(),
            y_axis: YAxisConfig::default(),
            edge_padding: 0.0,
        }
    }
}

/// Geometry handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub margin: Margin,
}

/// Compute margins and the inner drawing area.
///
/// Inner dimensions never go below zero; margins are reported unclamped.
pub fn calculate_layout(config: &LayoutConfig) -> ChartLayout {
    let mut margin = BASE_MARGIN;

    if config.legend.show {
        match config.legend.position {
            LegendPosition::Top => margin.top += LEGEND_BAND,
            LegendPosition::Right => margin.right += LEGEND_BAND,
            LegendPosition::Bottom => margin.bottom += LEGEND_BAND,
            LegendPosition::Left => margin.left += LEGEND_BAND,
        }
    }

    let x = &config.x_axis;
    if x.show {
        let band = x.title_padding + x.label_spacing;
        match x.position {
            XAxisPosition::Top => margin.top += band,
            XAxisPosition::Bottom => margin.bottom += band,
        }
    }

    let y = &config.y_axis;
    if y.show {
        let band = y.title_padding + y.label_spacing;
        match y.position {
            YAxisPosition::Left => margin.left += band,
            YAxisPosition::Right => margin.right += band,
        }
    }

    margin.top += config.edge_padding;
    margin.bottom += config.edge_padding;

    let raw_width = config.width - margin.left - margin.right;
    let raw_height = config.height - margin.top - margin.bottom;
    if raw_width < 0.0 || raw_height < 0.0 {
        debug!(
            "margins exceed chart size {}x{}; clamping inner area {}x{} to zero",
            config.width, config.height, raw_width, raw_height
        );
    }

    ChartLayout {
        width: config.width,
        height: config.height,
        inner_width: raw_width.max(0.0),
        inner_height: raw_height.max(0.0),
        margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> LayoutConfig {
        LayoutConfig {
            width: 800.0,
            height: 600.0,
            legend: LegendConfig { show: false, ..Default::default() },
            x_axis: XAxisConfig { show: false, ..Default::default() },
            y_axis: YAxisConfig { show: false, ..Default::default() },
            edge_padding: 0.0,
        }
    }

    #[test]
    fn test_base_margins() {
        let layout = calculate_layout(&bare_config());
        assert_eq!(layout.margin, BASE_MARGIN);
        assert_eq!(layout.inner_width, 720.0);
        assert_eq!(layout.inner_height, 540.0);
    }

    #[test]
    fn test_legend_band_per_side() {
        let mut config = bare_config();
        config.legend.show = true;

        config.legend.position = LegendPosition::Right;
        assert_eq!(calculate_layout(&config).margin.right, 150.0);
        config.legend.position = LegendPosition::Left;
        assert_eq!(calculate_layout(&config).margin.left, 170.0);
        config.legend.position = LegendPosition::Top;
        assert_eq!(calculate_layout(&config).margin.top, 140.0);
        config.legend.position = LegendPosition::Bottom;
        let layout = calculate_layout(&config);
        assert_eq!(layout.margin.bottom, 160.0);
        assert_eq!(layout.inner_height, 600.0 - 20.0 - 160.0);
    }

    #[test]
    fn test_axes_and_edge_padding() {
        let mut config = bare_config();
        config.x_axis = XAxisConfig { show: true, position: XAxisPosition::Top, title_padding: 15.0, label_spacing: 5.0 };
        config.y_axis.show = true;
        config.y_axis.position = YAxisPosition::Right;
        config.y_axis.title_padding = 8.0;
        config.y_axis.label_spacing = 2.0;
        config.edge_padding = 4.0;

        let layout = calculate_layout(&config);
        assert_eq!(layout.margin, Margin { top: 44.0, right: 40.0, bottom: 44.0, left: 50.0 });
        assert_eq!(layout.inner_width, 800.0 - 90.0);
        assert_eq!(layout.inner_height, 600.0 - 88.0);
    }

    #[test]
    fn test_inner_area_clamped() {
        let mut config = bare_config();
        config.width = 60.0;
        config.height = 40.0;
        let layout = calculate_layout(&config);
        assert_eq!(layout.inner_width, 0.0);
        assert_eq!(layout.inner_height, 0.0);
        assert_eq!(layout.margin.left, 50.0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let config = LayoutConfig::default();
        assert_eq!(calculate_layout(&config), calculate_layout(&config));
    }

    #[test]
    fn test_defaults_from_json() {
        let config: LayoutConfig = serde_json::from_str(r#"{"width": 400, "legend": {"position": "bottom"}}"#).unwrap();
        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, 600.0);
        assert!(config.legend.show);
        assert_eq!(config.legend.position, LegendPosition::Bottom);
        assert_eq!(config.x_axis.title_padding, 20.0);
    }
}
