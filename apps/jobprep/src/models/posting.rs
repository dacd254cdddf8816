use std::collections::HashMap;

use crate::integration::skills::SkillSet;

/// Canonical column names in the postings dataset after aliasing.
pub const POSTING_ID: &str = "job_id";
pub const POSTING_TITLE: &str = "job_title";

/// Accepted header spellings, first match wins.
pub const ID_ALIASES: &[&str] = &["job_id", "Job_ID"];
pub const TITLE_ALIASES: &[&str] = &["job_title", "title"];
pub const REQUIREMENT_ALIASES: &[&str] = &["job_requirements", "requirements"];

/// A row of the secondary (job postings) dataset.
///
/// The id, title and requirement set are extracted for matching; `values`
/// keeps every cell of the row for passthrough into the integrated table.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingRecord {
    pub job_id: i64,
    pub job_title: Option<String>,
    pub requirements: SkillSet,
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingsTable {
    /// Header in file order, with the id/title columns renamed to canonical names.
    pub columns: Vec<String>,
    pub has_title: bool,
    pub has_requirements: bool,
    pub records: Vec<PostingRecord>,
}

impl PostingsTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn unique_jobs(&self) -> usize {
        self.first_index_by_id().len()
    }

    /// Maps each posting id to the index of its first row.
    pub fn first_index_by_id(&self) -> HashMap<i64, usize> {
        let mut index = HashMap::new();
        for (i, record) in self.records.iter().enumerate() {
            index.entry(record.job_id).or_insert(i);
        }
        index
    }
}
