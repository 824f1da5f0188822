use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::rfc3339_millis;

pub const USER_ACTIVITY_COLLECTION: &str = "user_activities";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LessonCompleted,
    QuizCompleted,
    DiscussionParticipated,
}

/// Audit-trail entry. Appended, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub id: String,
    pub user_id: String,
    pub module: String,
    pub lesson: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(with = "rfc3339_millis")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}
