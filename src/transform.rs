use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::data::{Cell, RawTable};
use crate::ir::{ChartData, FieldValue, PivotCollision, TransformedRow};
use crate::mapping::{AggregationMode, ColumnMapping};
use crate::parser::number::parse_cell;
use crate::resolve::{resolve_keys, ResolvedKeys};

/// How the mapped table is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Long format: series column values become output keys
    Pivot,
    /// Wide format: one output key per value column
    Wide(AggregationMode),
}

/// Series columns take precedence over any aggregation mode
pub fn classify(mapping: &ColumnMapping, aggregation: AggregationMode) -> DataFormat {
    if mapping.series.is_empty() {
        DataFormat::Wide(aggregation)
    } else {
        DataFormat::Pivot
    }
}

/// Main entry point: turn raw rows and a column mapping into plotting data.
///
/// Never fails. An incomplete mapping yields [`ChartData::empty`], malformed
/// numbers become 0 (identity and pivot) or are left out of the reduction
/// (aggregation), and unknown columns read as empty cells.
pub fn transform(table: &RawTable, mapping: &ColumnMapping, aggregation: AggregationMode) -> ChartData {
    let label_col = match mapping.labels {
        Some(col) if mapping.is_complete() => col,
        _ => return ChartData::empty(),
    };

    let keys = resolve_keys(table.headers(), mapping);

    let data = match classify(mapping, aggregation) {
        DataFormat::Pivot => pivot_rows(table, mapping, label_col, keys),
        DataFormat::Wide(AggregationMode::None) => identity_rows(table, mapping, label_col, keys),
        DataFormat::Wide(mode) => aggregate_rows(table, mapping, label_col, keys, mode),
    };

    debug!(
        "transformed {} input rows into {} rows with {} value keys",
        table.data_rows().len(),
        data.chart_data.len(),
        data.value_keys.len()
    );

    data
}

/// Lenient numeric value with NaN mapped to 0
fn number_or_zero(cell: &Cell) -> f64 {
    let v = parse_cell(cell);
    if v.is_nan() { 0.0 } else { v }
}

fn label_value(cell: &Cell) -> FieldValue {
    match cell {
        Cell::Number(n) => FieldValue::Number(*n),
        other => FieldValue::Text(other.to_text()),
    }
}

fn insert_categories(out: &mut TransformedRow, row: &[Cell], mapping: &ColumnMapping, keys: &ResolvedKeys) {
    for (&col, key) in mapping.categories.iter().zip(&keys.category_keys) {
        out.insert(key.clone(), FieldValue::Text(RawTable::cell(row, col).to_text()));
    }
}

/// One output row per input row
fn identity_rows(table: &RawTable, mapping: &ColumnMapping, label_col: usize, keys: ResolvedKeys) -> ChartData {
    let chart_data = table
        .data_rows()
        .iter()
        .map(|row| {
            let mut out = TransformedRow::new();
            out.insert(keys.label_key.clone(), label_value(RawTable::cell(row, label_col)));
            for (&col, key) in mapping.values.iter().zip(&keys.value_keys) {
                out.insert(key.clone(), FieldValue::Number(number_or_zero(RawTable::cell(row, col))));
            }
            insert_categories(&mut out, row, mapping, &keys);
            out
        })
        .collect();

    ChartData {
        chart_data,
        label_key: keys.label_key,
        value_keys: keys.value_keys,
        category_keys: keys.category_keys,
        collisions: Vec::new(),
    }
}

/// Rows sharing a label, in first-seen label order
struct LabelGroup {
    label: String,
    first_row: usize,
    /// Successfully parsed numbers, one list per value column
    values: Vec<Vec<f64>>,
}

fn aggregate_rows(
    table: &RawTable,
    mapping: &ColumnMapping,
    label_col: usize,
    keys: ResolvedKeys,
    mode: AggregationMode,
) -> ChartData {
    let rows = table.data_rows();
    let mut groups: Vec<LabelGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let label = RawTable::cell(row, label_col).to_text();
        let group_idx = *index.entry(label.clone()).or_insert_with(|| {
            groups.push(LabelGroup {
                label,
                first_row: row_idx,
                values: vec![Vec::new(); mapping.values.len()],
            });
            groups.len() - 1
        });

        let group = &mut groups[group_idx];
        for (slot, &col) in group.values.iter_mut().zip(&mapping.values) {
            let v = parse_cell(RawTable::cell(row, col));
            // Unparseable cells are dropped, not counted as zero
            if !v.is_nan() {
                slot.push(v);
            }
        }
    }

    let chart_data = groups
        .iter()
        .map(|group| {
            let mut out = TransformedRow::new();
            out.insert(keys.label_key.clone(), FieldValue::Text(group.label.clone()));
            for (values, key) in group.values.iter().zip(&keys.value_keys) {
                out.insert(key.clone(), FieldValue::Number(reduce(mode, values)));
            }
            // Categories come from the first row carrying this label
            insert_categories(&mut out, &rows[group.first_row], mapping, &keys);
            out
        })
        .collect();

    ChartData {
        chart_data,
        label_key: keys.label_key,
        value_keys: keys.value_keys,
        category_keys: keys.category_keys,
        collisions: Vec::new(),
    }
}

/// Reduce the parsed values of one group. Empty input yields 0 for every mode.
pub fn reduce(mode: AggregationMode, values: &[f64]) -> f64 {
    match mode {
        AggregationMode::Sum => values.iter().sum(),
        // Identity rows hold a single value, so there is nothing to combine
        AggregationMode::None => values.first().copied().unwrap_or(0.0),
        AggregationMode::Average => {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
        AggregationMode::Count => values.len() as f64,
    }
}

/// Long-format pivot: every series cell becomes a `"<series header>: <value>"` key.
/// Only the first value column is read.
fn pivot_rows(table: &RawTable, mapping: &ColumnMapping, label_col: usize, keys: ResolvedKeys) -> ChartData {
    let value_col = mapping.values[0];
    let mut rows_out: Vec<TransformedRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut all_keys: BTreeSet<String> = BTreeSet::new();
    let mut collisions = Vec::new();

    for row in table.data_rows() {
        let label = RawTable::cell(row, label_col).to_text();
        let out_idx = *index.entry(label.clone()).or_insert_with(|| {
            let mut out = TransformedRow::new();
            out.insert(keys.label_key.clone(), FieldValue::Text(label.clone()));
            insert_categories(&mut out, row, mapping, &keys);
            rows_out.push(out);
            rows_out.len() - 1
        });

        let value = number_or_zero(RawTable::cell(row, value_col));
        for (&series_col, series_key) in mapping.series.iter().zip(&keys.series_keys) {
            let key = format!("{}: {}", series_key, RawTable::cell(row, series_col).to_text());
            all_keys.insert(key.clone());

            // Last write wins; the overwrite is reported rather than prevented
            if rows_out[out_idx].insert(key.clone(), FieldValue::Number(value)).is_some() {
                warn!("pivot key '{}' written more than once for label '{}'; keeping the last value", key, label);
                collisions.push(PivotCollision { label: label.clone(), key });
            }
        }
    }

    ChartData {
        chart_data: rows_out,
        label_key: keys.label_key,
        value_keys: all_keys.into_iter().collect(),
        category_keys: keys.category_keys,
        collisions,
    }
}
