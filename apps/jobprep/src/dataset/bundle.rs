use crate::errors::PrepError;
use crate::integration::matcher::{match_by_skills, posting_profiles, primary_profiles, SkillMatches};
use crate::integration::skills::SkillSimilarity;
use crate::models::posting::PostingsTable;
use crate::models::recommendation::RecommendationTable;
use crate::models::salary::SalaryTable;

/// The loaded inputs for one integration run. Immutable once built; the
/// primary table is always present.
#[derive(Debug, Clone)]
pub struct DatasetBundle {
    primary: RecommendationTable,
    postings: Option<PostingsTable>,
    salaries: Option<SalaryTable>,
}

impl DatasetBundle {
    pub fn builder() -> DatasetBundleBuilder {
        DatasetBundleBuilder::default()
    }

    pub fn primary(&self) -> &RecommendationTable {
        &self.primary
    }

    pub fn postings(&self) -> Option<&PostingsTable> {
        self.postings.as_ref()
    }

    pub fn salaries(&self) -> Option<&SalaryTable> {
        self.salaries.as_ref()
    }

    /// Skill-similarity candidates between the primary jobs and the postings.
    /// Fails with `NotLoaded` when the bundle carries no postings.
    pub fn skill_matches(
        &self,
        tolerance: f64,
        metric: &dyn SkillSimilarity,
    ) -> Result<SkillMatches, PrepError> {
        let postings = self.postings().ok_or(PrepError::NotLoaded("postings"))?;
        match_by_skills(
            &primary_profiles(&self.primary),
            &posting_profiles(postings),
            tolerance,
            metric,
        )
    }
}

#[derive(Debug, Default)]
pub struct DatasetBundleBuilder {
    primary: Option<RecommendationTable>,
    postings: Option<PostingsTable>,
    salaries: Option<SalaryTable>,
}

impl DatasetBundleBuilder {
    pub fn primary(mut self, table: RecommendationTable) -> Self {
        self.primary = Some(table);
        self
    }

    pub fn postings(mut self, table: Option<PostingsTable>) -> Self {
        self.postings = table;
        self
    }

    pub fn salaries(mut self, table: Option<SalaryTable>) -> Self {
        self.salaries = table;
        self
    }

    pub fn build(self) -> Result<DatasetBundle, PrepError> {
        Ok(DatasetBundle {
            primary: self.primary.ok_or(PrepError::NoBaseDataset)?,
            postings: self.postings,
            salaries: self.salaries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::skills::JaccardSimilarity;

    #[test]
    fn test_build_without_primary_fails() {
        let err = DatasetBundle::builder()
            .postings(Some(PostingsTable::default()))
            .build()
            .unwrap_err();
        assert!(matches!(err, PrepError::NoBaseDataset));
    }

    #[test]
    fn test_skill_matches_without_postings_is_not_loaded() {
        let bundle = DatasetBundle::builder()
            .primary(RecommendationTable::default())
            .build()
            .unwrap();
        let err = bundle.skill_matches(0.7, &JaccardSimilarity).unwrap_err();
        assert!(matches!(err, PrepError::NotLoaded("postings")));
    }

    #[test]
    fn test_optional_tables_default_to_absent() {
        let bundle = DatasetBundle::builder()
            .primary(RecommendationTable::default())
            .build()
            .unwrap();
        assert!(bundle.postings().is_none());
        assert!(bundle.salaries().is_none());
    }
}
