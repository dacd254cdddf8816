pub const SALARY_TITLE: &str = "job_title";
pub const SALARY_USD: &str = "salary_in_usd";

/// Lowercases and trims a job title so titles from different sources compare equal.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// A single salary observation. Only ever consumed in aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub job_title_normalized: String,
    pub salary_in_usd: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryTable {
    pub records: Vec<SalaryRecord>,
    /// Rows dropped at load time for a missing title or non-numeric salary.
    pub skipped_rows: usize,
}

impl SalaryTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_lowercases_and_trims() {
        assert_eq!(normalize_title("  Data Scientist "), "data scientist");
        assert_eq!(normalize_title("AI Engineer"), "ai engineer");
    }
}
