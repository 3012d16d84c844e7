use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::io::Read;

/// A single untyped table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

impl Cell {
    /// Stringified form used for grouping, composite keys and lenient parsing.
    /// Integral numbers print without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
            Cell::Empty => true,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) => s.hash(state),
            Cell::Number(n) => n.to_bits().hash(state),
            Cell::Empty => {}
        }
    }
}

/// Format a number the way a script engine stringifies it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == n.trunc() && n.abs() < 1e21 {
        // -0 prints as "0"
        format!("{}", n as i128)
    } else if n != 0.0 && (n.abs() < 1e-6 || n.abs() >= 1e21) {
        // Exponent form with an explicit sign, as in "1e-7" and "1e+21"
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => s,
        }
    } else {
        format!("{}", n)
    }
}

/// Raw tabular input. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq, Default, Hash)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a table from string rows, header first
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| Cell::Text(c.into())).collect())
            .collect();
        Self { rows }
    }

    /// Total row count including the header
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[Cell] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Header name at `col`, or `None` when the column is out of range
    pub fn header(&self, col: usize) -> Option<String> {
        self.headers().get(col).map(Cell::to_text)
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        if self.rows.len() > 1 { &self.rows[1..] } else { &[] }
    }

    /// Cell lookup that treats short rows as padded with empty cells
    pub fn cell<'a>(row: &'a [Cell], col: usize) -> &'a Cell {
        const EMPTY: &Cell = &Cell::Empty;
        row.get(col).unwrap_or(EMPTY)
    }

    /// Parse CSV text. The first record becomes the header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
            rows.push(
                record
                    .iter()
                    .map(|field| if field.is_empty() { Cell::Empty } else { Cell::Text(field.to_string()) })
                    .collect(),
            );
        }

        if rows.is_empty() {
            return Err(anyhow!("CSV input has no header row"));
        }

        Ok(Self { rows })
    }

    pub fn from_csv_str(input: &str) -> Result<Self> {
        Self::from_csv_reader(input.as_bytes())
    }

    /// Create a table from JSON: either an array of arrays (header first)
    /// or an array of objects (keys of the first object become the header).
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(||
            anyhow!("Input data must be a JSON array")
        )?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        if array[0].is_array() {
            let mut rows = Vec::with_capacity(array.len());
            for (idx, item) in array.iter().enumerate() {
                let items = item.as_array().ok_or_else(||
                    anyhow!("Row {} must be an array", idx)
                )?;
                let row = items
                    .iter()
                    .map(|v| json_to_cell(v).with_context(|| format!("Invalid cell in row {}", idx)))
                    .collect::<Result<Vec<_>>>()?;
                rows.push(row);
            }
            return Ok(Self { rows });
        }

        // Extract headers from the first object
        let first_obj = array[0].as_object().ok_or_else(||
            anyhow!("Items in array must be arrays or objects")
        )?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len() + 1);
        rows.push(headers.iter().map(|h| Cell::Text(h.clone())).collect());
        for item in array {
            let obj = item.as_object().ok_or_else(||
                anyhow!("Items in array must be objects")
            )?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(v) => json_to_cell(v).with_context(|| format!("Invalid value for field '{}'", header))?,
                    None => Cell::Empty,
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }
}

fn json_to_cell(value: &Value) -> Result<Cell> {
    Ok(match value {
        Value::String(s) => Cell::Text(s.clone()),
        Value::Number(n) => Cell::Number(n.as_f64().ok_or_else(|| anyhow!("Number {} out of range", n))?),
        Value::Bool(b) => Cell::Text(b.to_string()),
        Value::Null => Cell::Empty,
        _ => return Err(anyhow!("Unsupported nested value")),
    })
}
