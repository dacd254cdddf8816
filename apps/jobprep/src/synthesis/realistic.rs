//! Realistic log synthesis: per user, view the best matches first and swipe
//! with a probability driven by match score.
//!
//! The RNG is supplied by the caller so runs are reproducible from a seed.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::info;

use crate::errors::PrepError;
use crate::models::interaction::{InteractionEvent, SwipeAction};
use crate::models::recommendation::{RecommendationRecord, RecommendationTable};

/// Timestamps fall within this many days before the synthesis run.
const LOOKBACK_DAYS: i64 = 30;

const LIKE_DURATION_MS: (u32, u32) = (2000, 10000);
const DISLIKE_DURATION_MS: (u32, u32) = (500, 2000);

const PROGRESS_EVERY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParams {
    pub views_min: usize,
    pub views_max: usize,
    /// Scales match score into a like probability for non-recommended jobs.
    pub like_multiplier: f64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            views_min: 5,
            views_max: 20,
            like_multiplier: 0.9,
        }
    }
}

impl SynthesisParams {
    pub fn validate(&self) -> Result<(), PrepError> {
        if self.views_min == 0 {
            return Err(PrepError::InvalidParameter(
                "views_min must be at least 1".to_string(),
            ));
        }
        if self.views_min > self.views_max {
            return Err(PrepError::InvalidParameter(format!(
                "views_min ({}) must not exceed views_max ({})",
                self.views_min, self.views_max
            )));
        }
        if !(self.like_multiplier > 0.0 && self.like_multiplier <= 1.0) {
            return Err(PrepError::InvalidParameter(format!(
                "like_multiplier must be within (0, 1], got {}",
                self.like_multiplier
            )));
        }
        Ok(())
    }
}

/// Groups records by user, preserving first-appearance order of users and
/// file order of each user's records.
fn group_by_user(table: &RecommendationTable) -> Vec<(i64, Vec<&RecommendationRecord>)> {
    let mut slot: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<(i64, Vec<&RecommendationRecord>)> = Vec::new();
    for record in &table.records {
        let idx = *slot.entry(record.user_id).or_insert_with(|| {
            groups.push((record.user_id, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(record);
    }
    groups
}

pub fn generate_realistic_logs<R: Rng + ?Sized>(
    table: &RecommendationTable,
    params: &SynthesisParams,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<InteractionEvent>, PrepError> {
    params.validate()?;
    let groups = group_by_user(table);
    if groups.is_empty() {
        return Err(PrepError::EmptyDataset("recommendation"));
    }

    info!("Generating realistic interaction logs for {} users", groups.len());
    let mut events = Vec::new();

    for (i, (user_id, mut candidates)) in groups.into_iter().enumerate() {
        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("Processing user {}", i + 1);
        }

        // stable: equal scores keep file order
        candidates.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        let views = rng.random_range(params.views_min..=params.views_max);
        for record in candidates.into_iter().take(views) {
            events.push(view_event(user_id, record, params, now, rng));
        }
    }

    let likes = events.iter().filter(|e| e.action == SwipeAction::Like).count();
    info!(
        "Generated {} interaction logs ({} likes, {} dislikes)",
        events.len(),
        likes,
        events.len() - likes
    );
    Ok(events)
}

fn view_event<R: Rng + ?Sized>(
    user_id: i64,
    record: &RecommendationRecord,
    params: &SynthesisParams,
    now: DateTime<Utc>,
    rng: &mut R,
) -> InteractionEvent {
    let timestamp = now
        - Duration::days(rng.random_range(0..LOOKBACK_DAYS))
        - Duration::hours(rng.random_range(0..24))
        - Duration::minutes(rng.random_range(0..60));

    let (action, confidence) = if record.recommended {
        (SwipeAction::Like, 1.0)
    } else {
        let like_probability = record.match_score * params.like_multiplier;
        let action = if rng.random::<f64>() < like_probability {
            SwipeAction::Like
        } else {
            SwipeAction::Dislike
        };
        (action, like_probability)
    };

    let (lo, hi) = match action {
        SwipeAction::Like => LIKE_DURATION_MS,
        SwipeAction::Dislike => DISLIKE_DURATION_MS,
    };

    InteractionEvent {
        user_id,
        job_id: record.job_id,
        action,
        timestamp,
        match_score: record.match_score,
        swipe_duration_ms: Some(rng.random_range(lo..=hi)),
        confidence: Some(confidence),
        user_skills: record.user_skills.clone(),
        job_requirements: record.job_requirements.clone(),
    }
}
