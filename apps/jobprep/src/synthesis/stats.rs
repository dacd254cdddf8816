use std::collections::{HashMap, HashSet};

use crate::models::interaction::{InteractionEvent, SwipeAction};

/// Summary of a generated log, reported after saving.
#[derive(Debug, Clone, PartialEq)]
pub struct LogStats {
    pub total: usize,
    pub unique_users: usize,
    pub unique_jobs: usize,
    pub likes: usize,
    pub dislikes: usize,
    pub mean_per_user: f64,
    pub min_per_user: usize,
    pub max_per_user: usize,
}

impl LogStats {
    pub fn from_events(events: &[InteractionEvent]) -> Self {
        let mut per_user: HashMap<i64, usize> = HashMap::new();
        for e in events {
            *per_user.entry(e.user_id).or_default() += 1;
        }
        let likes = events
            .iter()
            .filter(|e| e.action == SwipeAction::Like)
            .count();

        Self {
            total: events.len(),
            unique_users: per_user.len(),
            unique_jobs: events.iter().map(|e| e.job_id).collect::<HashSet<_>>().len(),
            likes,
            dislikes: events.len() - likes,
            mean_per_user: if per_user.is_empty() {
                0.0
            } else {
                events.len() as f64 / per_user.len() as f64
            },
            min_per_user: per_user.values().copied().min().unwrap_or(0),
            max_per_user: per_user.values().copied().max().unwrap_or(0),
        }
    }

    /// Share of likes as a percentage, 0 for an empty log.
    pub fn like_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.likes as f64 / self.total as f64 * 100.0
        }
    }
}
