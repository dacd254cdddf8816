use std::path::PathBuf;

use thiserror::Error;

/// Domain-level error type for loading, synthesis, and integration.
/// The CLI driver wraps these in `anyhow` with file/step context.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Missing required column '{column}' in {dataset} dataset")]
    MissingColumn {
        dataset: &'static str,
        column: String,
    },

    #[error("The {0} dataset contains no users")]
    EmptyDataset(&'static str),

    #[error("The {0} dataset has not been loaded")]
    NotLoaded(&'static str),

    #[error("No base dataset: the recommendation table is required for integration")]
    NoBaseDataset,

    #[error("Invalid value '{value}' in column '{column}' of {dataset} dataset (row {row})")]
    InvalidValue {
        dataset: &'static str,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
