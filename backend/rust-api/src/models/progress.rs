use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::utils::time::rfc3339_millis;

pub const USER_PROGRESS_COLLECTION: &str = "user_progress";

/// A module counts as completed at this many lessons, whatever its real length.
pub const MODULE_COMPLETION_THRESHOLD: usize = 3;

/// Placeholder estimate, not measured time.
pub const MINUTES_PER_LESSON: u32 = 20;

/// Completion and quiz state for one (user, module) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub module_id: String,
    #[serde(default)]
    pub completed_lessons: BTreeSet<u32>,
    #[serde(default)]
    pub quiz_scores: BTreeMap<u32, u32>,
    #[serde(with = "rfc3339_millis")]
    pub last_accessed: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(user_id: &str, module_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            module_id: module_id.to_string(),
            completed_lessons: BTreeSet::new(),
            quiz_scores: BTreeMap::new(),
            last_accessed: now,
        }
    }

    /// Deterministic document key, one record per (user, module).
    pub fn key(user_id: &str, module_id: &str) -> String {
        format!("{}_{}", user_id, module_id)
    }

    pub fn is_module_completed(&self) -> bool {
        self.completed_lessons.len() >= MODULE_COMPLETION_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub modules_started: u32,
    pub modules_completed: u32,
    pub lessons_completed: u32,
    pub average_quiz_score: u32,
    pub time_spent_minutes: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonResponse {
    pub progress: UserProgress,
    pub newly_completed: bool,
    pub module_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress_key_is_composite() {
        assert_eq!(UserProgress::key("child1", "stoicism"), "child1_stoicism");
    }

    #[test]
    fn test_reads_original_document_shape() {
        let doc = json!({
            "userId": "child1",
            "moduleId": "ethics",
            "completedLessons": [1, 2, 2],
            "quizScores": { "3": 80 },
            "lastAccessed": "2024-02-19T08:30:00.000Z"
        });

        let progress: UserProgress = serde_json::from_value(doc).unwrap();
        assert_eq!(progress.completed_lessons.len(), 2);
        assert_eq!(progress.quiz_scores.get(&3), Some(&80));
        assert!(!progress.is_module_completed());
    }
}
