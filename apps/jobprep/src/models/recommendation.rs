use std::collections::HashSet;

use crate::integration::skills::{parse_skill_set, SkillSet};

/// Column names of the primary (labeled recommendation) dataset.
pub const USER_ID: &str = "User_ID";
pub const JOB_ID: &str = "Job_ID";
pub const MATCH_SCORE: &str = "Match_Score";
pub const RECOMMENDED: &str = "Recommended";
pub const USER_SKILLS: &str = "User_Skills";
pub const JOB_REQUIREMENTS: &str = "Job_Requirements";

pub const REQUIRED_COLUMNS: &[&str] = &[
    USER_ID,
    JOB_ID,
    MATCH_SCORE,
    RECOMMENDED,
    USER_SKILLS,
    JOB_REQUIREMENTS,
];

/// One labeled (user, job) pair from the primary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRecord {
    pub user_id: i64,
    pub job_id: i64,
    pub match_score: f64,
    pub recommended: bool,
    /// Raw comma-separated skills, as found in the source file.
    pub user_skills: Option<String>,
    pub job_requirements: Option<String>,
    /// Values of any columns beyond the required six, aligned with
    /// `RecommendationTable::extra_columns`.
    pub extra: Vec<Option<String>>,
}

impl RecommendationRecord {
    pub fn requirement_set(&self) -> SkillSet {
        parse_skill_set(self.job_requirements.as_deref())
    }
}

/// The loaded primary dataset. Rows keep their file order; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<RecommendationRecord>,
}

impl RecommendationTable {
    #[cfg(test)]
    pub fn new(records: Vec<RecommendationRecord>) -> Self {
        Self {
            extra_columns: Vec::new(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn unique_users(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn unique_jobs(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.job_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// All column names in output order: the required six, then extras.
    pub fn columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: i64, job_id: i64) -> RecommendationRecord {
        RecommendationRecord {
            user_id,
            job_id,
            match_score: 0.5,
            recommended: false,
            user_skills: Some("Python, SQL".to_string()),
            job_requirements: None,
            extra: vec![],
        }
    }

    #[test]
    fn test_unique_counts_ignore_duplicates() {
        let table = RecommendationTable::new(vec![
            record(3, 1),
            record(1, 2),
            record(3, 4),
            record(2, 1),
        ]);
        assert_eq!(table.unique_users(), 3);
        assert_eq!(table.unique_jobs(), 3);
    }

    #[test]
    fn test_missing_requirements_normalize_to_empty_set() {
        let r = record(1, 1);
        assert!(r.requirement_set().is_empty());
    }

    #[test]
    fn test_columns_append_extras() {
        let mut table = RecommendationTable::new(vec![]);
        table.extra_columns.push("Source".to_string());
        let cols = table.columns();
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0], USER_ID);
        assert_eq!(cols[6], "Source");
    }
}
