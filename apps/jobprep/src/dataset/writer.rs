use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use clap::ValueEnum;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use tracing::info;

use crate::dataset::table::{Cell, Table};
use crate::errors::PrepError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    /// Record-oriented, indented JSON array.
    Json,
    /// Columnar Parquet file; column types are inferred from the values.
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, PrepError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Writes serde records as CSV (header from field names), JSON or Parquet.
pub fn write_records<T: Serialize>(
    path: &Path,
    format: OutputFormat,
    records: &[T],
) -> Result<(), PrepError> {
    let out = create(path)?;
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(out, records)?,
        OutputFormat::Parquet => write_parquet(out, &Table::from_records(records)?)?,
    }
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Writes a dynamic-column table. Null cells are empty in CSV and `null` in JSON.
pub fn write_table(path: &Path, format: OutputFormat, table: &Table) -> Result<(), PrepError> {
    let out = create(path)?;
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(&table.columns)?;
            for row in &table.rows {
                writer.write_record(row.iter().map(|cell| cell.to_field()))?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(out, table)?,
        OutputFormat::Parquet => write_parquet(out, table)?,
    }
    info!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Writes a single value as indented JSON.
pub fn write_report<T: Serialize + ?Sized>(path: &Path, report: &T) -> Result<(), PrepError> {
    write_json(create(path)?, report)?;
    info!("Report saved to {}", path.display());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(mut out: BufWriter<File>, value: &T) -> Result<(), PrepError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

// ──────────────────────────────────────────────
// Parquet
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Int,
    Float,
    Text,
}

/// Narrowest kind holding every non-null cell: ints widen to float, anything
/// next to text becomes text. An all-null column is written as text.
fn column_kind(table: &Table, idx: usize) -> ColumnKind {
    table.rows.iter().fold(ColumnKind::Empty, |kind, row| {
        match (kind, row.get(idx).unwrap_or(&Cell::Null)) {
            (kind, Cell::Null) => kind,
            (ColumnKind::Text, _) | (_, Cell::Text(_)) => ColumnKind::Text,
            (ColumnKind::Empty | ColumnKind::Int, Cell::Int(_)) => ColumnKind::Int,
            _ => ColumnKind::Float,
        }
    })
}

fn column_array(table: &Table, idx: usize, kind: ColumnKind) -> (DataType, ArrayRef) {
    let cells = table.rows.iter().map(|row| row.get(idx).unwrap_or(&Cell::Null));
    match kind {
        ColumnKind::Int => {
            let values: Vec<Option<i64>> = cells
                .map(|cell| match cell {
                    Cell::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)))
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = cells
                .map(|cell| match cell {
                    Cell::Int(i) => Some(*i as f64),
                    Cell::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)))
        }
        ColumnKind::Text | ColumnKind::Empty => {
            let values: Vec<Option<String>> = cells
                .map(|cell| (!cell.is_null()).then(|| cell.to_field()))
                .collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)))
        }
    }
}

fn record_batch(table: &Table) -> Result<RecordBatch, PrepError> {
    if table.columns.is_empty() {
        return Err(PrepError::InvalidParameter(
            "a Parquet file needs at least one column".to_string(),
        ));
    }
    let mut fields = Vec::with_capacity(table.columns.len());
    let mut arrays = Vec::with_capacity(table.columns.len());
    for (idx, name) in table.columns.iter().enumerate() {
        let (data_type, array) = column_array(table, idx, column_kind(table, idx));
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn write_parquet(out: BufWriter<File>, table: &Table) -> Result<(), PrepError> {
    let batch = record_batch(table)?;
    let mut writer = ArrowWriter::try_new(out, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        name: Option<String>,
    }

    fn sample_table() -> Table {
        Table {
            columns: vec!["Job_ID".to_string(), "avg_salary_usd".to_string()],
            rows: vec![
                vec![Cell::Int(16), Cell::Float(95000.0)],
                vec![Cell::Int(157), Cell::Null],
            ],
        }
    }

    #[test]
    fn test_write_records_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![
            Row { id: 1, name: Some("a".to_string()) },
            Row { id: 2, name: None },
        ];
        write_records(&path, OutputFormat::Csv, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id,name\n1,a\n2,\n");
    }

    #[test]
    fn test_write_records_json_is_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        write_records(&path, OutputFormat::Json, &[Row { id: 7, name: None }]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["id"], 7);
        assert!(value[0]["name"].is_null());
    }

    #[test]
    fn test_write_table_csv_leaves_nulls_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.csv");
        write_table(&path, OutputFormat::Csv, &sample_table()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Job_ID,avg_salary_usd\n16,95000.0\n157,\n");
    }

    #[test]
    fn test_write_table_json_uses_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        write_table(&path, OutputFormat::Json, &sample_table()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["avg_salary_usd"], 95000.0);
        assert!(value[1]["avg_salary_usd"].is_null());
    }

    fn read_parquet(path: &Path) -> RecordBatch {
        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(batches.len(), 1);
        batches.into_iter().next().unwrap()
    }

    #[test]
    fn test_write_table_parquet_keeps_types_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.parquet");
        let mut table = sample_table();
        table.columns.push("job_title".to_string());
        table.rows[0].push(Cell::Text("Data Scientist".to_string()));
        table.rows[1].push(Cell::Null);
        write_table(&path, OutputFormat::Parquet, &table).unwrap();

        let batch = read_parquet(&path);
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["Job_ID", "avg_salary_usd", "job_title"]);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);

        let ids = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.values().to_vec(), vec![16, 157]);
        let salary = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(salary.value(0), 95000.0);
        assert!(salary.is_null(1));
        let titles = batch.column(2).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(titles.value(0), "Data Scientist");
        assert!(titles.is_null(1));
    }

    #[test]
    fn test_write_records_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.parquet");
        let rows = vec![
            Row { id: 1, name: Some("a".to_string()) },
            Row { id: 2, name: None },
        ];
        write_records(&path, OutputFormat::Parquet, &rows).unwrap();

        let batch = read_parquet(&path);
        assert_eq!(batch.num_rows(), 2);
        let ids = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.value(1), 2);
        let names = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(0), "a");
        assert!(names.is_null(1));
    }

    #[test]
    fn test_column_kind_widens_mixed_values() {
        let table = Table {
            columns: vec!["mixed".to_string(), "texty".to_string(), "empty".to_string()],
            rows: vec![
                vec![Cell::Int(1), Cell::Int(3), Cell::Null],
                vec![Cell::Float(0.5), Cell::Text("x".to_string()), Cell::Null],
            ],
        };
        assert_eq!(column_kind(&table, 0), ColumnKind::Float);
        assert_eq!(column_kind(&table, 1), ColumnKind::Text);
        assert_eq!(column_kind(&table, 2), ColumnKind::Empty);

        let (data_type, array) = column_array(&table, 0, ColumnKind::Float);
        assert_eq!(data_type, DataType::Float64);
        let values = array.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(values.value(0), 1.0);

        let (_, array) = column_array(&table, 1, ColumnKind::Text);
        let values = array.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(values.value(0), "3");
    }

    #[test]
    fn test_parquet_without_columns_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        let err = write_table(&path, OutputFormat::Parquet, &Table::default()).unwrap_err();
        assert!(matches!(err, PrepError::InvalidParameter(_)));
    }

    #[test]
    fn test_extension_matches_format() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Parquet.extension(), "parquet");
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }
}
