//! Skill-similarity record linkage between two datasets that share no key.
//!
//! Every primary job is compared against every posting (O(|A|·|B|)); all
//! postings at or above the tolerance are kept as candidates. No global
//! one-to-one assignment is attempted.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::errors::PrepError;
use crate::integration::skills::{SkillSet, SkillSimilarity};
use crate::models::posting::PostingsTable;
use crate::models::recommendation::RecommendationTable;

/// An id paired with its requirement set; one side of the comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillProfile {
    pub id: i64,
    pub skills: SkillSet,
}

/// A posting that cleared the tolerance for some primary job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub posting_id: i64,
    /// Position of the posting in the secondary collection.
    pub posting_index: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMatches {
    /// Primary job ids with at least one candidate, in primary order.
    order: Vec<i64>,
    candidates: HashMap<i64, Vec<Candidate>>,
}

impl SkillMatches {
    /// Candidates for one primary job, in secondary iteration order.
    pub fn candidates(&self, job_id: i64) -> &[Candidate] {
        self.candidates
            .get(&job_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates `(job_id, candidates)` in primary order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[Candidate])> + '_ {
        self.order
            .iter()
            .map(move |id| (*id, self.candidates(*id)))
    }

    /// Number of primary jobs with at least one candidate.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Reduces each candidate list to its highest-similarity entry.
    /// Ties go to the candidate encountered first.
    pub fn best_matches(&self) -> HashMap<i64, Candidate> {
        self.candidates
            .iter()
            .filter_map(|(job_id, list)| best_of(list).map(|best| (*job_id, best)))
            .collect()
    }
}

fn best_of(candidates: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.similarity <= current.similarity => {}
            _ => best = Some(*candidate),
        }
    }
    best
}

/// Computes every (primary, posting) pair with similarity ≥ `tolerance`.
pub fn match_by_skills(
    primary: &[SkillProfile],
    postings: &[SkillProfile],
    tolerance: f64,
    metric: &dyn SkillSimilarity,
) -> Result<SkillMatches, PrepError> {
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(PrepError::InvalidParameter(format!(
            "tolerance must be within [0, 1], got {tolerance}"
        )));
    }

    let mut matches = SkillMatches::default();

    for job in primary {
        let found: Vec<Candidate> = postings
            .iter()
            .enumerate()
            // a missing skill list never matches, whatever the tolerance
            .filter(|(_, posting)| !job.skills.is_empty() && !posting.skills.is_empty())
            .filter_map(|(posting_index, posting)| {
                let similarity = metric.similarity(&job.skills, &posting.skills);
                (similarity >= tolerance).then_some(Candidate {
                    posting_id: posting.id,
                    posting_index,
                    similarity,
                })
            })
            .collect();

        if found.is_empty() {
            continue;
        }
        if matches.candidates.insert(job.id, found).is_none() {
            matches.order.push(job.id);
        }
    }

    info!(
        "Skill matching ({}, tolerance {tolerance}): {} of {} jobs matched",
        metric.name(),
        matches.len(),
        primary.len()
    );
    Ok(matches)
}

/// Distinct primary jobs with their requirement sets; the first row wins for
/// a job id seen more than once.
pub fn primary_profiles(table: &RecommendationTable) -> Vec<SkillProfile> {
    let mut seen = HashSet::new();
    table
        .records
        .iter()
        .filter(|r| seen.insert(r.job_id))
        .map(|r| SkillProfile {
            id: r.job_id,
            skills: r.requirement_set(),
        })
        .collect()
}

/// One profile per posting row, in file order.
pub fn posting_profiles(table: &PostingsTable) -> Vec<SkillProfile> {
    table
        .records
        .iter()
        .map(|p| SkillProfile {
            id: p.job_id,
            skills: p.requirements.clone(),
        })
        .collect()
}
