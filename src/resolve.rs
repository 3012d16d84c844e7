use crate::data::Cell;
use crate::mapping::ColumnMapping;

/// Output field names derived from the header row and the column mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeys {
    pub label_key: String,
    pub value_keys: Vec<String>,
    pub category_keys: Vec<String>,
    /// Header names of series columns, used as composite-key prefixes
    pub series_keys: Vec<String>,
}

/// Resolve all key names for a mapping. Blank or missing headers fall back
/// to names synthesized from the column index, so this never fails.
pub fn resolve_keys(headers: &[Cell], mapping: &ColumnMapping) -> ResolvedKeys {
    let label_key = mapping
        .labels
        .and_then(|col| header_name(headers, col))
        .unwrap_or_else(|| "label".to_string());

    ResolvedKeys {
        label_key,
        value_keys: resolve_columns(headers, &mapping.values, "value"),
        category_keys: resolve_columns(headers, &mapping.categories, "category"),
        series_keys: resolve_columns(headers, &mapping.series, "series"),
    }
}

fn resolve_columns(headers: &[Cell], cols: &[usize], prefix: &str) -> Vec<String> {
    cols.iter()
        .map(|&col| header_name(headers, col).unwrap_or_else(|| format!("{}{}", prefix, col)))
        .collect()
}

/// Header text at `col`, or `None` if out of range or blank
fn header_name(headers: &[Cell], col: usize) -> Option<String> {
    headers
        .get(col)
        .filter(|cell| !cell.is_blank())
        .map(Cell::to_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<Cell> {
        names.iter().map(|&n| Cell::from(n)).collect()
    }

    #[test]
    fn test_resolve_simple() {
        let h = headers(&["city", "pop", "area"]);
        let mapping = ColumnMapping::new(0, vec![2, 1]);
        let keys = resolve_keys(&h, &mapping);
        assert_eq!(keys.label_key, "city");
        // Order follows the mapping, not the header
        assert_eq!(keys.value_keys, vec!["area", "pop"]);
        assert!(keys.category_keys.is_empty());
    }

    #[test]
    fn test_resolve_missing_label() {
        let h = headers(&["city", "pop"]);
        let mapping = ColumnMapping {
            labels: None,
            values: vec![1],
            ..Default::default()
        };
        assert_eq!(resolve_keys(&h, &mapping).label_key, "label");
    }

    #[test]
    fn test_resolve_blank_and_out_of_range() {
        let h = vec![Cell::from("city"), Cell::from("  "), Cell::Empty];
        let mapping = ColumnMapping::new(7, vec![1, 2, 9]).with_categories(vec![4]);
        let keys = resolve_keys(&h, &mapping);
        assert_eq!(keys.label_key, "label");
        assert_eq!(keys.value_keys, vec!["value1", "value2", "value9"]);
        assert_eq!(keys.category_keys, vec!["category4"]);
    }

    #[test]
    fn test_resolve_numeric_header() {
        let h = vec![Cell::from("year"), Cell::Number(2024.0)];
        let keys = resolve_keys(&h, &ColumnMapping::new(0, vec![1]));
        assert_eq!(keys.value_keys, vec!["2024"]);
    }

    #[test]
    fn test_resolve_series() {
        let h = headers(&["month", "region", "sales"]);
        let mapping = ColumnMapping::new(0, vec![2]).with_series(vec![1, 5]);
        let keys = resolve_keys(&h, &mapping);
        assert_eq!(keys.series_keys, vec!["region", "series5"]);
    }
}
