//! A minimal dynamic-column table used for writing integrated output.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::PrepError;

/// A single output value. `Null` means "explicitly absent", never zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Infers a typed cell from a raw CSV field: integer, then float, then text.
    /// Blank fields become `Null`.
    pub fn infer(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return Cell::Null;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::Text(text.to_string()),
        }
    }

    pub fn text(raw: Option<&str>) -> Self {
        match raw {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// CSV rendering: nulls are empty; integral floats keep a `.0`.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format_float(*f),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Flattens serde records into a table through their CSV form, so column
    /// names and order match what the CSV writer would produce.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self, PrepError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PrepError::Io(e.into_error()))?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::with_capacity(records.len());
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|field| Cell::infer(Some(field))).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of non-null values in the named column.
    pub fn non_null_count(&self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => self
                .rows
                .iter()
                .filter(|row| row.get(idx).is_some_and(|c| !c.is_null()))
                .count(),
            None => 0,
        }
    }
}

/// Serializes as a JSON array of objects whose keys follow column order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRef {
                columns: &self.columns,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (i, column) in self.columns.iter().enumerate() {
            let value = self.cells.get(i).map(Cell::to_json).unwrap_or(Value::Null);
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_types() {
        assert_eq!(Cell::infer(Some("16")), Cell::Int(16));
        assert_eq!(Cell::infer(Some("0.75")), Cell::Float(0.75));
        assert_eq!(Cell::infer(Some("Tokyo")), Cell::Text("Tokyo".to_string()));
        assert_eq!(Cell::infer(Some("   ")), Cell::Null);
        assert_eq!(Cell::infer(None), Cell::Null);
    }

    #[test]
    fn test_infer_keeps_nan_as_text() {
        assert_eq!(Cell::infer(Some("NaN")), Cell::Text("NaN".to_string()));
    }

    #[test]
    fn test_float_field_keeps_decimal_point() {
        assert_eq!(Cell::Float(95000.0).to_field(), "95000.0");
        assert_eq!(Cell::Float(0.75).to_field(), "0.75");
        assert_eq!(Cell::Null.to_field(), "");
    }

    #[test]
    fn test_json_preserves_column_order_and_nulls() {
        let table = Table {
            columns: vec!["z".to_string(), "a".to_string()],
            rows: vec![vec![Cell::Int(1), Cell::Null]],
        };
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"z":1,"a":null}]"#);
    }

    #[test]
    fn test_from_records_infers_cells_in_field_order() {
        #[derive(Serialize)]
        struct Event {
            user_id: i64,
            action: &'static str,
            duration_ms: Option<u32>,
            confidence: f64,
        }
        let events = [
            Event { user_id: 1, action: "like", duration_ms: Some(2500), confidence: 0.8 },
            Event { user_id: 2, action: "dislike", duration_ms: None, confidence: 1.0 },
        ];
        let table = Table::from_records(&events).unwrap();
        assert_eq!(table.columns, vec!["user_id", "action", "duration_ms", "confidence"]);
        assert_eq!(
            table.rows[0],
            vec![
                Cell::Int(1),
                Cell::Text("like".to_string()),
                Cell::Int(2500),
                Cell::Float(0.8),
            ]
        );
        assert_eq!(table.rows[1][2], Cell::Null);
        assert_eq!(table.rows[1][3], Cell::Float(1.0));
    }

    #[test]
    fn test_from_records_without_records_has_no_columns() {
        let empty: [(i64, i64); 0] = [];
        let table = Table::from_records(&empty).unwrap();
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_non_null_count() {
        let table = Table {
            columns: vec!["job_title".to_string()],
            rows: vec![
                vec![Cell::Text("Data Scientist".to_string())],
                vec![Cell::Null],
                vec![Cell::Text("AI Engineer".to_string())],
            ],
        };
        assert_eq!(table.non_null_count("job_title"), 2);
        assert_eq!(table.non_null_count("missing"), 0);
    }
}
