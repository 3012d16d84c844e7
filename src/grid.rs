use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ir::{ChartData, ChartGroup, TransformedRow};

/// How a dataset is divided into small multiples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBy {
    /// One chart per unique label value
    #[default]
    Label,
    /// One chart per value key, each with its own palette index
    Value,
}

/// Grid-mode settings from the chart configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    pub enabled: bool,
    pub split_by: SplitBy,
    /// Fixed column count; `None` picks a square-ish layout
    pub columns: Option<usize>,
}

/// Rows and columns of the chart grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
}

/// Split already-shaped data into independent chart groups.
/// No aggregation happens here.
pub fn split(data: &ChartData, split_by: SplitBy) -> Vec<ChartGroup> {
    match split_by {
        SplitBy::Label => split_by_label(data),
        SplitBy::Value => split_by_value(data),
    }
}

fn split_by_label(data: &ChartData) -> Vec<ChartGroup> {
    let mut groups: Vec<ChartGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &data.chart_data {
        let title = row
            .get(&data.label_key)
            .map(|v| v.to_text())
            .unwrap_or_default();

        let idx = *index.entry(title.clone()).or_insert_with(|| {
            groups.push(ChartGroup {
                title,
                data: Vec::new(),
                label_key: data.label_key.clone(),
                value_keys: data.value_keys.clone(),
                color_index: None,
            });
            groups.len() - 1
        });
        groups[idx].data.push(row.clone());
    }

    groups
}

fn split_by_value(data: &ChartData) -> Vec<ChartGroup> {
    data.value_keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let rows = data
                .chart_data
                .iter()
                .map(|row| {
                    let mut out = TransformedRow::new();
                    if let Some(label) = row.get(&data.label_key) {
                        out.insert(data.label_key.clone(), label.clone());
                    }
                    if let Some(value) = row.get(key) {
                        out.insert(key.clone(), value.clone());
                    }
                    out
                })
                .collect();

            ChartGroup {
                title: key.clone(),
                data: rows,
                label_key: data.label_key.clone(),
                value_keys: vec![key.clone()],
                color_index: Some(i),
            }
        })
        .collect()
}

/// Grid shape for `n_charts` charts
pub fn grid_dimensions(n_charts: usize, columns: Option<usize>) -> GridDimensions {
    if n_charts == 0 {
        return GridDimensions { rows: 0, cols: 0 };
    }
    let cols = match columns {
        Some(c) if c > 0 => c.min(n_charts),
        // Default: square-ish
        _ => (n_charts as f64).sqrt().ceil() as usize,
    };
    let rows = (n_charts as f64 / cols as f64).ceil() as usize;
    GridDimensions { rows, cols }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FieldValue;

    fn make_data() -> ChartData {
        let rows = vec![
            ("NYC", 1.0, 2.0),
            ("LA", 3.0, 4.0),
            ("NYC", 5.0, 6.0),
        ];
        ChartData {
            chart_data: rows
                .into_iter()
                .map(|(city, a, b)| {
                    vec![
                        ("city", FieldValue::from(city)),
                        ("a", FieldValue::from(a)),
                        ("b", FieldValue::from(b)),
                    ]
                    .into_iter()
                    .collect()
                })
                .collect(),
            label_key: "city".to_string(),
            value_keys: vec!["a".to_string(), "b".to_string()],
            category_keys: vec![],
            collisions: vec![],
        }
    }

    #[test]
    fn test_split_by_label() {
        let groups = split(&make_data(), SplitBy::Label);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "NYC");
        assert_eq!(groups[0].data.len(), 2);
        assert_eq!(groups[1].title, "LA");
        assert_eq!(groups[1].value_keys, vec!["a", "b"]);
        assert!(groups.iter().all(|g| g.color_index.is_none()));
    }

    #[test]
    fn test_split_by_value() {
        let data = make_data();
        let groups = split(&data, SplitBy::Value);
        assert_eq!(groups.len(), data.value_keys.len());

        let mut indices: Vec<usize> = groups.iter().filter_map(|g| g.color_index).collect();
        indices.sort();
        indices.dedup();
        assert_eq!(indices, vec![0, 1]);

        let b = &groups[1];
        assert_eq!(b.title, "b");
        assert_eq!(b.value_keys, vec!["b"]);
        assert_eq!(b.data.len(), data.chart_data.len());
        assert!(!b.data[0].contains_key("a"));
        assert_eq!(b.data[2].get("b"), Some(&FieldValue::Number(6.0)));
    }

    #[test]
    fn test_split_empty() {
        assert!(split(&ChartData::empty(), SplitBy::Label).is_empty());
        assert!(split(&ChartData::empty(), SplitBy::Value).is_empty());
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0, None), GridDimensions { rows: 0, cols: 0 });
        assert_eq!(grid_dimensions(4, None), GridDimensions { rows: 2, cols: 2 });
        assert_eq!(grid_dimensions(5, None), GridDimensions { rows: 2, cols: 3 });
        assert_eq!(grid_dimensions(5, Some(2)), GridDimensions { rows: 3, cols: 2 });
        assert_eq!(grid_dimensions(2, Some(4)), GridDimensions { rows: 1, cols: 2 });
        assert_eq!(grid_dimensions(3, Some(0)), GridDimensions { rows: 2, cols: 2 });
    }
}
