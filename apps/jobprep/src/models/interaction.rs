use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Dislike,
}

/// One synthetic view/swipe. Field order is the output column order.
///
/// `swipe_duration_ms` and `confidence` are only produced by the realistic
/// generator; the simple generator leaves them out of the output entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: i64,
    pub job_id: i64,
    pub action: SwipeAction,
    pub timestamp: DateTime<Utc>,
    pub match_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_duration_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub user_skills: Option<String>,
    pub job_requirements: Option<String>,
}
