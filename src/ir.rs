use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

// =============================================================================
// Row Values
// =============================================================================

/// A value stored under one key of a transformed row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Text used when a value acts as a grouping key or title
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => crate::data::format_number(*n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            // Integral values are emitted as JSON integers (30 rather than 30.0)
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            FieldValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

/// One output data point: an insertion-ordered map from key to value.
///
/// Keys are data dependent (pivot mode synthesizes them), so this is a map
/// rather than a fixed struct. Inserting an existing key overwrites the value
/// in place and keeps the original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformedRow {
    fields: Vec<(String, FieldValue)>,
}

impl TransformedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one if the key was present
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.fields.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for TransformedRow {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut row = TransformedRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for TransformedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// =============================================================================
// Transformation Output
// =============================================================================

/// A pivot write that replaced an earlier value for the same label and key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCollision {
    pub label: String,
    pub key: String,
}

/// Plotting data for a single chart
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_data: Vec<TransformedRow>,
    pub label_key: String,
    pub value_keys: Vec<String>,
    pub category_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<PivotCollision>,
}

impl ChartData {
    /// The result produced when the mapping is incomplete
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chart_data.is_empty() && self.value_keys.is_empty() && self.category_keys.is_empty()
    }
}

/// One chart instance in grid mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGroup {
    pub title: String,
    pub data: Vec<TransformedRow>,
    pub label_key: String,
    pub value_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_index: Option<usize>,
}
