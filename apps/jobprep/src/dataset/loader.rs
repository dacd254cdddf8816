//! CSV loaders for the three source datasets.
//!
//! Headers are checked before any row is read. Row-level gaps in optional
//! fields (skills, titles) degrade to "absent"; malformed ids and scores fail.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::errors::PrepError;
use crate::integration::skills::{parse_skill_set, SkillSet};
use crate::models::posting::{
    PostingRecord, PostingsTable, ID_ALIASES, POSTING_ID, POSTING_TITLE, REQUIREMENT_ALIASES,
    TITLE_ALIASES,
};
use crate::models::recommendation::{
    RecommendationRecord, RecommendationTable, JOB_ID, JOB_REQUIREMENTS, MATCH_SCORE,
    RECOMMENDED, REQUIRED_COLUMNS, USER_ID, USER_SKILLS,
};
use crate::models::salary::{normalize_title, SalaryRecord, SalaryTable, SALARY_TITLE, SALARY_USD};

const RECOMMENDATION: &str = "recommendation";
const POSTINGS: &str = "postings";
const SALARY: &str = "salary";

// ────────────────────────────────────────────────────────────────────────────
// Header lookup
// ────────────────────────────────────────────────────────────────────────────

struct Header {
    dataset: &'static str,
    names: Vec<String>,
}

impl Header {
    fn new(dataset: &'static str, record: &StringRecord) -> Self {
        Self {
            dataset,
            names: record.iter().map(|h| h.trim().to_string()).collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize, PrepError> {
        self.position(name).ok_or_else(|| PrepError::MissingColumn {
            dataset: self.dataset,
            column: name.to_string(),
        })
    }

    fn find_any(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| self.position(alias))
    }
}

/// A non-blank field, or `None` for an empty or missing cell.
fn field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|s| !s.trim().is_empty())
}

fn invalid(dataset: &'static str, column: &str, row: usize, value: Option<&str>) -> PrepError {
    PrepError::InvalidValue {
        dataset,
        column: column.to_string(),
        row,
        value: value.unwrap_or_default().to_string(),
    }
}

/// Parses an integer id; integral floats such as `16.0` are accepted.
fn parse_id(raw: Option<&str>) -> Option<i64> {
    let text = raw?.trim();
    if let Ok(id) = text.parse::<i64>() {
        return Some(id);
    }
    let f = text.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// A match score must lie in [0, 1]; it doubles as a like probability.
fn parse_score(raw: Option<&str>) -> Option<f64> {
    parse_float(raw).filter(|score| (0.0..=1.0).contains(score))
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

fn open(path: &Path) -> Result<File, PrepError> {
    if !path.exists() {
        return Err(PrepError::FileNotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendation (primary) dataset
// ────────────────────────────────────────────────────────────────────────────

pub fn load_recommendations(path: &Path) -> Result<RecommendationTable, PrepError> {
    info!("Loading recommendation dataset from {}", path.display());
    let table = read_recommendations(open(path)?)?;
    info!(
        "Loaded {} rows ({} users, {} jobs)",
        table.len(),
        table.unique_users(),
        table.unique_jobs()
    );
    Ok(table)
}

pub fn read_recommendations<R: Read>(source: R) -> Result<RecommendationTable, PrepError> {
    let mut reader = csv::Reader::from_reader(source);
    let header = Header::new(RECOMMENDATION, reader.headers()?);

    let user_idx = header.require(USER_ID)?;
    let job_idx = header.require(JOB_ID)?;
    let score_idx = header.require(MATCH_SCORE)?;
    let rec_idx = header.require(RECOMMENDED)?;
    let skills_idx = header.require(USER_SKILLS)?;
    let reqs_idx = header.require(JOB_REQUIREMENTS)?;

    let extra_indices: Vec<usize> = (0..header.names.len())
        .filter(|i| !REQUIRED_COLUMNS.contains(&header.names[*i].as_str()))
        .collect();
    let extra_columns = extra_indices
        .iter()
        .map(|i| header.names[*i].clone())
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let user_raw = field(&record, user_idx);
        let job_raw = field(&record, job_idx);
        let score_raw = field(&record, score_idx);
        let rec_raw = field(&record, rec_idx);

        records.push(RecommendationRecord {
            user_id: parse_id(user_raw).ok_or_else(|| invalid(RECOMMENDATION, USER_ID, row, user_raw))?,
            job_id: parse_id(job_raw).ok_or_else(|| invalid(RECOMMENDATION, JOB_ID, row, job_raw))?,
            match_score: parse_score(score_raw)
                .ok_or_else(|| invalid(RECOMMENDATION, MATCH_SCORE, row, score_raw))?,
            recommended: parse_flag(rec_raw)
                .ok_or_else(|| invalid(RECOMMENDATION, RECOMMENDED, row, rec_raw))?,
            user_skills: field(&record, skills_idx).map(str::to_string),
            job_requirements: field(&record, reqs_idx).map(str::to_string),
            extra: extra_indices
                .iter()
                .map(|idx| field(&record, *idx).map(str::to_string))
                .collect(),
        });
    }

    Ok(RecommendationTable {
        extra_columns,
        records,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Postings (secondary) dataset
// ────────────────────────────────────────────────────────────────────────────

pub fn load_postings(path: &Path) -> Result<PostingsTable, PrepError> {
    info!("Loading job postings from {}", path.display());
    let table = read_postings(open(path)?)?;
    info!("Loaded {} postings ({} unique jobs)", table.len(), table.unique_jobs());
    if !table.has_requirements {
        warn!("Postings have no requirements column; skill matching will find nothing");
    }
    Ok(table)
}

pub fn read_postings<R: Read>(source: R) -> Result<PostingsTable, PrepError> {
    let mut reader = csv::Reader::from_reader(source);
    let header = Header::new(POSTINGS, reader.headers()?);

    let id_idx = header
        .find_any(ID_ALIASES)
        .ok_or_else(|| PrepError::MissingColumn {
            dataset: POSTINGS,
            column: POSTING_ID.to_string(),
        })?;
    let title_idx = header.find_any(TITLE_ALIASES);
    let reqs_idx = header.find_any(REQUIREMENT_ALIASES);

    let columns: Vec<String> = header
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == id_idx {
                POSTING_ID.to_string()
            } else if Some(i) == title_idx {
                POSTING_TITLE.to_string()
            } else {
                name.clone()
            }
        })
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let id_raw = field(&record, id_idx);

        records.push(PostingRecord {
            job_id: parse_id(id_raw).ok_or_else(|| invalid(POSTINGS, POSTING_ID, row, id_raw))?,
            job_title: title_idx
                .and_then(|idx| field(&record, idx))
                .map(str::to_string),
            requirements: reqs_idx
                .map(|idx| parse_skill_set(field(&record, idx)))
                .unwrap_or_else(SkillSet::new),
            values: (0..columns.len())
                .map(|idx| field(&record, idx).map(str::to_string))
                .collect(),
        });
    }

    Ok(PostingsTable {
        columns,
        has_title: title_idx.is_some(),
        has_requirements: reqs_idx.is_some(),
        records,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Salary dataset
// ────────────────────────────────────────────────────────────────────────────

pub fn load_salaries(path: &Path) -> Result<SalaryTable, PrepError> {
    info!("Loading salary data from {}", path.display());
    let table = read_salaries(open(path)?)?;
    info!("Loaded {} salary rows", table.len());
    if table.skipped_rows > 0 {
        warn!(
            "Skipped {} salary rows without a title or numeric salary",
            table.skipped_rows
        );
    }
    Ok(table)
}

pub fn read_salaries<R: Read>(source: R) -> Result<SalaryTable, PrepError> {
    let mut reader = csv::Reader::from_reader(source);
    let header = Header::new(SALARY, reader.headers()?);

    let title_idx = header.require(SALARY_TITLE)?;
    let usd_idx = header.require(SALARY_USD)?;

    let mut table = SalaryTable::default();
    for result in reader.records() {
        let record = result?;
        match (field(&record, title_idx), parse_float(field(&record, usd_idx))) {
            (Some(title), Some(salary_in_usd)) => table.records.push(SalaryRecord {
                job_title_normalized: normalize_title(title),
                salary_in_usd,
            }),
            _ => table.skipped_rows += 1,
        }
    }
    Ok(table)
}
