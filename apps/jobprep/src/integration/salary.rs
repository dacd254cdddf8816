use std::collections::HashMap;

use crate::models::salary::SalaryTable;

/// Output column names for the aggregated salary block.
pub const SALARY_COLUMNS: &[&str] = &[
    "job_title_normalized",
    "avg_salary_usd",
    "median_salary_usd",
    "min_salary_usd",
    "max_salary_usd",
    "salary_data_count",
];

/// Salary statistics for one normalized job title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryAggregate {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl SalaryAggregate {
    /// Returns `None` for an empty slice; never a zeroed aggregate.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
            min: sorted[0],
            max: sorted[count - 1],
            count,
        })
    }
}

/// Groups salaries by normalized title and summarizes each group.
pub fn aggregate_salaries(table: &SalaryTable) -> HashMap<String, SalaryAggregate> {
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in &table.records {
        groups
            .entry(record.job_title_normalized.as_str())
            .or_default()
            .push(record.salary_in_usd);
    }

    groups
        .into_iter()
        .filter_map(|(title, values)| {
            SalaryAggregate::from_values(&values).map(|agg| (title.to_string(), agg))
        })
        .collect()
}
