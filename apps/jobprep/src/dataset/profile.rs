use std::collections::BTreeSet;

use crate::models::recommendation::RecommendationTable;

const SAMPLE_SKILLS: usize = 10;

/// Quick feasibility summary of the primary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub total_rows: usize,
    pub unique_users: usize,
    pub unique_jobs: usize,
    pub job_id_min: Option<i64>,
    pub job_id_max: Option<i64>,
    pub unique_skills: usize,
    /// First few distinct requirement skills in sorted order.
    pub sample_skills: Vec<String>,
}

impl DatasetProfile {
    pub fn from_table(table: &RecommendationTable) -> Self {
        let skills: BTreeSet<String> = table
            .records
            .iter()
            .flat_map(|r| r.requirement_set())
            .collect();

        Self {
            total_rows: table.len(),
            unique_users: table.unique_users(),
            unique_jobs: table.unique_jobs(),
            job_id_min: table.records.iter().map(|r| r.job_id).min(),
            job_id_max: table.records.iter().map(|r| r.job_id).max(),
            unique_skills: skills.len(),
            sample_skills: skills.into_iter().take(SAMPLE_SKILLS).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recommendation::RecommendationRecord;

    fn record(user_id: i64, job_id: i64, reqs: Option<&str>) -> RecommendationRecord {
        RecommendationRecord {
            user_id,
            job_id,
            match_score: 0.5,
            recommended: false,
            user_skills: None,
            job_requirements: reqs.map(str::to_string),
            extra: vec![],
        }
    }

    #[test]
    fn test_profile_counts_and_range() {
        let table = RecommendationTable::new(vec![
            record(1, 30, Some("SQL, Python")),
            record(1, 16, Some("Python, AI")),
            record(2, 157, None),
        ]);
        let profile = DatasetProfile::from_table(&table);
        assert_eq!(profile.total_rows, 3);
        assert_eq!(profile.unique_users, 2);
        assert_eq!(profile.unique_jobs, 3);
        assert_eq!(profile.job_id_min, Some(16));
        assert_eq!(profile.job_id_max, Some(157));
        assert_eq!(profile.unique_skills, 3);
        assert_eq!(profile.sample_skills, vec!["AI", "Python", "SQL"]);
    }

    #[test]
    fn test_profile_samples_at_most_ten_skills() {
        let reqs = (0..15).map(|i| format!("S{i:02}")).collect::<Vec<_>>().join(", ");
        let table = RecommendationTable::new(vec![record(1, 1, Some(&reqs))]);
        let profile = DatasetProfile::from_table(&table);
        assert_eq!(profile.unique_skills, 15);
        assert_eq!(profile.sample_skills.len(), 10);
        assert_eq!(profile.sample_skills[0], "S00");
    }

    #[test]
    fn test_profile_of_empty_table() {
        let profile = DatasetProfile::from_table(&RecommendationTable::default());
        assert_eq!(profile.total_rows, 0);
        assert_eq!(profile.job_id_min, None);
        assert!(profile.sample_skills.is_empty());
    }
}
