use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::PrepError;
use crate::models::interaction::{InteractionEvent, SwipeAction};
use crate::models::recommendation::RecommendationTable;

/// One event per input row: `Recommended` alone decides like/dislike, every
/// event is stamped with `now`, and no duration or confidence is produced.
pub fn generate_simple_logs(
    table: &RecommendationTable,
    now: DateTime<Utc>,
) -> Result<Vec<InteractionEvent>, PrepError> {
    if table.is_empty() {
        return Err(PrepError::EmptyDataset("recommendation"));
    }

    let events: Vec<InteractionEvent> = table
        .records
        .iter()
        .map(|r| InteractionEvent {
            user_id: r.user_id,
            job_id: r.job_id,
            action: if r.recommended {
                SwipeAction::Like
            } else {
                SwipeAction::Dislike
            },
            timestamp: now,
            match_score: r.match_score,
            swipe_duration_ms: None,
            confidence: None,
            user_skills: r.user_skills.clone(),
            job_requirements: r.job_requirements.clone(),
        })
        .collect();

    info!("Generated {} simple interaction logs", events.len());
    Ok(events)
}
