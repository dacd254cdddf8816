//! Join & aggregation pipeline: primary rows ⟕ best posting ⟕ salary aggregate.
//!
//! Every primary row yields exactly one integrated row. A row gets at most
//! one posting (best skill match, or first posting with the same id) and at
//! most one salary aggregate (by normalized title). Unmatched blocks are null.

use tracing::{info, warn};

use crate::dataset::bundle::DatasetBundle;
use crate::dataset::table::{Cell, Table};
use crate::errors::PrepError;
use crate::integration::salary::{aggregate_salaries, SalaryAggregate, SALARY_COLUMNS};
use crate::integration::skills::{JaccardSimilarity, SkillSimilarity};
use crate::models::posting::{PostingRecord, POSTING_TITLE};
use crate::models::recommendation::RecommendationRecord;
use crate::models::salary::normalize_title;

pub const SKILL_SIMILARITY: &str = "skill_similarity";
const COLLISION_SUFFIX: &str = "_posting";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationOptions {
    pub use_skill_matching: bool,
    pub fallback_to_id_match: bool,
    pub tolerance: f64,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            use_skill_matching: true,
            fallback_to_id_match: true,
            tolerance: 0.7,
        }
    }
}

/// How postings were attached to primary rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingJoin {
    SkillMatch,
    IdMatch,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchedPosting<'a> {
    pub posting: &'a PostingRecord,
    /// Present only for skill-matched postings.
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IntegratedRecord<'a> {
    pub recommendation: &'a RecommendationRecord,
    pub posting: Option<MatchedPosting<'a>>,
    pub title_normalized: Option<String>,
    pub salary: Option<SalaryAggregate>,
}

/// Result of one integration run, borrowing from the bundle it was built from.
#[derive(Debug, Clone)]
pub struct IntegratedTable<'a> {
    bundle: &'a DatasetBundle,
    posting_join: Option<PostingJoin>,
    salary_joined: bool,
    records: Vec<IntegratedRecord<'a>>,
}

/// Integrates the bundle using Jaccard similarity for skill matching.
pub fn integrate<'a>(
    bundle: &'a DatasetBundle,
    options: &IntegrationOptions,
) -> Result<IntegratedTable<'a>, PrepError> {
    integrate_with(bundle, options, &JaccardSimilarity)
}

pub fn integrate_with<'a>(
    bundle: &'a DatasetBundle,
    options: &IntegrationOptions,
    metric: &dyn SkillSimilarity,
) -> Result<IntegratedTable<'a>, PrepError> {
    info!("Integrating datasets");

    // Step 1: one row per primary record
    let mut records: Vec<IntegratedRecord<'a>> = bundle
        .primary()
        .records
        .iter()
        .map(|recommendation| IntegratedRecord {
            recommendation,
            posting: None,
            title_normalized: None,
            salary: None,
        })
        .collect();

    // Step 2: attach postings
    let mut posting_join = None;
    if let Some(postings) = bundle.postings() {
        if options.use_skill_matching {
            let best = bundle
                .skill_matches(options.tolerance, metric)?
                .best_matches();
            for record in &mut records {
                record.posting = best.get(&record.recommendation.job_id).map(|c| MatchedPosting {
                    posting: &postings.records[c.posting_index],
                    similarity: Some(c.similarity),
                });
            }
            posting_join = Some(PostingJoin::SkillMatch);
        } else if options.fallback_to_id_match {
            let by_id = postings.first_index_by_id();
            for record in &mut records {
                record.posting = by_id.get(&record.recommendation.job_id).map(|idx| MatchedPosting {
                    posting: &postings.records[*idx],
                    similarity: None,
                });
            }
            posting_join = Some(PostingJoin::IdMatch);
        }

        if posting_join.is_some() {
            let matched = records.iter().filter(|r| r.posting.is_some()).count();
            info!("Merged postings: {matched} of {} rows matched", records.len());
        }
    }

    // Step 3: salary aggregates by normalized title. The title comes from the
    // attached posting, else from a `job_title` column of the primary table.
    let posting_titles = posting_join.is_some() && bundle.postings().is_some_and(|p| p.has_title);
    let primary_title = bundle
        .primary()
        .extra_columns
        .iter()
        .position(|c| c == POSTING_TITLE);
    let mut salary_joined = false;
    if let Some(salaries) = bundle.salaries() {
        if posting_titles || primary_title.is_some() {
            let aggregates = aggregate_salaries(salaries);
            for record in &mut records {
                let posting_title = record.posting.and_then(|m| m.posting.job_title.as_deref());
                let own_title = primary_title
                    .and_then(|idx| record.recommendation.extra.get(idx))
                    .and_then(|v| v.as_deref());
                record.title_normalized = posting_title.or(own_title).map(normalize_title);
                record.salary = record
                    .title_normalized
                    .as_ref()
                    .and_then(|title| aggregates.get(title).copied());
            }
            salary_joined = true;
            let matched = records.iter().filter(|r| r.salary.is_some()).count();
            info!("Merged salary data: {matched} of {} rows matched", records.len());
        } else {
            warn!("No job_title column in the primary table or joined postings; skipping salary merge");
        }
    }

    info!("Integration complete: {} rows", records.len());
    Ok(IntegratedTable {
        bundle,
        posting_join,
        salary_joined,
        records,
    })
}

impl<'a> IntegratedTable<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn posting_join(&self) -> Option<PostingJoin> {
        self.posting_join
    }

    pub fn salary_joined(&self) -> bool {
        self.salary_joined
    }

    pub fn posting_matched(&self) -> usize {
        self.records.iter().filter(|r| r.posting.is_some()).count()
    }

    pub fn salary_matched(&self) -> usize {
        self.records.iter().filter(|r| r.salary.is_some()).count()
    }

    pub fn unique_users(&self) -> usize {
        self.bundle.primary().unique_users()
    }

    pub fn unique_jobs(&self) -> usize {
        self.bundle.primary().unique_jobs()
    }

    /// Posting column names, suffixed where they collide with a primary column.
    fn posting_columns(&self) -> Vec<String> {
        let Some(postings) = self.bundle.postings() else {
            return Vec::new();
        };
        let primary = self.bundle.primary().columns();
        postings
            .columns
            .iter()
            .map(|c| {
                if primary.contains(c) {
                    format!("{c}{COLLISION_SUFFIX}")
                } else {
                    c.clone()
                }
            })
            .collect()
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns = self.bundle.primary().columns();
        if let Some(join) = self.posting_join {
            if join == PostingJoin::SkillMatch {
                columns.push(SKILL_SIMILARITY.to_string());
            }
            columns.extend(self.posting_columns());
        }
        if self.salary_joined {
            columns.extend(SALARY_COLUMNS.iter().map(|c| c.to_string()));
        }
        columns
    }

    pub fn to_table(&self) -> Table {
        let posting_width = self.bundle.postings().map_or(0, |p| p.columns.len());
        let rows = self
            .records
            .iter()
            .map(|record| self.row(record, posting_width))
            .collect();
        Table {
            columns: self.columns(),
            rows,
        }
    }

    fn row(&self, record: &IntegratedRecord<'_>, posting_width: usize) -> Vec<Cell> {
        let r = record.recommendation;
        let mut cells = vec![
            Cell::Int(r.user_id),
            Cell::Int(r.job_id),
            Cell::Float(r.match_score),
            Cell::Int(i64::from(r.recommended)),
            Cell::text(r.user_skills.as_deref()),
            Cell::text(r.job_requirements.as_deref()),
        ];
        cells.extend(r.extra.iter().map(|v| Cell::infer(v.as_deref())));

        if let Some(join) = self.posting_join {
            if join == PostingJoin::SkillMatch {
                cells.push(
                    record
                        .posting
                        .and_then(|m| m.similarity)
                        .map_or(Cell::Null, Cell::Float),
                );
            }
            match record.posting {
                Some(m) => cells.extend(m.posting.values.iter().map(|v| Cell::infer(v.as_deref()))),
                None => cells.extend(std::iter::repeat(Cell::Null).take(posting_width)),
            }
        }

        if self.salary_joined {
            cells.push(Cell::text(record.title_normalized.as_deref()));
            match record.salary {
                Some(agg) => cells.extend([
                    Cell::Float(agg.mean),
                    Cell::Float(agg.median),
                    Cell::Float(agg.min),
                    Cell::Float(agg.max),
                    Cell::Int(agg.count as i64),
                ]),
                None => cells.extend(std::iter::repeat(Cell::Null).take(SALARY_COLUMNS.len() - 1)),
            }
        }
        cells
    }
}
