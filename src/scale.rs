use std::collections::HashMap;

use serde::Serialize;

use crate::ir::ChartData;
use crate::layout::YAxisConfig;

/// Value-axis domain for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

/// Compute the value-axis domain over every value key of `data`.
///
/// Non-numeric and non-finite fields are ignored. Explicit `min`/`max`
/// overrides in the axis config win over the computed bounds.
pub fn value_domain(data: &ChartData, axis: &YAxisConfig) -> ValueDomain {
    let mm = if axis.stacked {
        stacked_min_max(data)
    } else {
        plain_min_max(data)
    };

    let (mut min, mut max) = match mm {
        Some((min, max)) => (min, max),
        // Handle empty case
        None => (0.0, 1.0),
    };

    if mm.is_some() {
        if axis.include_zero {
            if min > 0.0 { min = 0.0; }
            if max < 0.0 { max = 0.0; }
        }
        (min, max) = pad_range(min, max);
    }

    ValueDomain {
        min: axis.min.unwrap_or(min),
        max: axis.max.unwrap_or(max),
    }
}

fn numeric_values<'a>(data: &'a ChartData) -> impl Iterator<Item = (usize, f64)> + 'a {
    data.chart_data.iter().enumerate().flat_map(move |(i, row)| {
        data.value_keys
            .iter()
            .filter_map(move |key| row.get(key).and_then(|v| v.as_number()))
            .filter(|v| v.is_finite())
            .map(move |v| (i, v))
    })
}

fn plain_min_max(data: &ChartData) -> Option<(f64, f64)> {
    numeric_values(data).fold(None, |acc, (_, v)| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
    })
}

/// Positive and negative parts stack separately, per label
fn stacked_min_max(data: &ChartData) -> Option<(f64, f64)> {
    let mut stacks: HashMap<String, (f64, f64)> = HashMap::new();
    for (i, v) in numeric_values(data) {
        let label = data.chart_data[i]
            .get(&data.label_key)
            .map(|l| l.to_text())
            .unwrap_or_default();
        let entry = stacks.entry(label).or_insert((0.0, 0.0));
        if v < 0.0 { entry.0 += v } else { entry.1 += v }
    }

    stacks.values().fold(None, |acc, &(neg, pos)| match acc {
        None => Some((neg, pos)),
        Some((min, max)) => Some((f64::min(min, neg), f64::max(max, pos))),
    })
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FieldValue, TransformedRow};

    fn make_data(rows: Vec<(&str, f64, f64)>) -> ChartData {
        ChartData {
            chart_data: rows
                .into_iter()
                .map(|(label, a, b)| {
                    let mut row = TransformedRow::new();
                    row.insert("k", FieldValue::from(label));
                    row.insert("a", FieldValue::Number(a));
                    row.insert("b", FieldValue::Number(b));
                    row
                })
                .collect(),
            label_key: "k".to_string(),
            value_keys: vec!["a".to_string(), "b".to_string()],
            category_keys: vec![],
            collisions: vec![],
        }
    }

    fn no_zero() -> YAxisConfig {
        YAxisConfig { include_zero: false, ..Default::default() }
    }

    #[test]
    fn test_domain_padding() {
        let data = make_data(vec![("x", 10.0, 20.0), ("y", 30.0, 110.0)]);
        let domain = value_domain(&data, &no_zero());
        assert_eq!(domain, ValueDomain { min: 5.0, max: 115.0 });
    }

    #[test]
    fn test_domain_includes_zero() {
        let data = make_data(vec![("x", 10.0, 20.0)]);
        let domain = value_domain(&data, &YAxisConfig::default());
        assert_eq!(domain, ValueDomain { min: -1.0, max: 21.0 });
    }

    #[test]
    fn test_domain_single_value() {
        let data = make_data(vec![("x", 5.0, 5.0)]);
        assert_eq!(value_domain(&data, &no_zero()), ValueDomain { min: 4.0, max: 6.0 });
    }

    #[test]
    fn test_domain_stacked() {
        let data = make_data(vec![("x", 10.0, 30.0), ("y", -20.0, 5.0)]);
        let axis = YAxisConfig { stacked: true, ..no_zero() };
        let domain = value_domain(&data, &axis);
        // Stacks: x -> (0, 40), y -> (-20, 5)
        assert_eq!(domain, ValueDomain { min: -23.0, max: 43.0 });
    }

    #[test]
    fn test_domain_overrides() {
        let data = make_data(vec![("x", 10.0, 20.0)]);
        let axis = YAxisConfig { min: Some(0.0), max: Some(100.0), ..Default::default() };
        assert_eq!(value_domain(&data, &axis), ValueDomain { min: 0.0, max: 100.0 });
    }

    #[test]
    fn test_domain_empty() {
        let domain = value_domain(&ChartData::empty(), &YAxisConfig::default());
        assert_eq!(domain, ValueDomain { min: 0.0, max: 1.0 });
    }
}
