use serde::{Deserialize, Serialize};

use crate::integration::pipeline::IntegratedTable;

/// Read-only summary of an integration run, written as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub total_rows: usize,
    pub unique_users: usize,
    pub unique_jobs: usize,
    pub posting_matched: usize,
    pub salary_matched: usize,
    pub columns: Vec<String>,
}

impl IntegrationReport {
    pub fn from_table(table: &IntegratedTable<'_>) -> Self {
        Self {
            total_rows: table.len(),
            unique_users: table.unique_users(),
            unique_jobs: table.unique_jobs(),
            posting_matched: table.posting_matched(),
            salary_matched: table.salary_matched(),
            columns: table.columns(),
        }
    }
}
