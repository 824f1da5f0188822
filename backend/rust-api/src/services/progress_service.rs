use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::DataAccessError;
use crate::metrics::LESSONS_COMPLETED_TOTAL;
use crate::models::activity::USER_ACTIVITY_COLLECTION;
use crate::models::progress::USER_PROGRESS_COLLECTION;
use crate::models::{
    Achievement, ActivityKind, ProgressSummary, UserActivity, UserProgress,
};
use crate::services::lesson_state::{self, CompletionOutcome, Transition};
use crate::services::store::{self, Direction, Document, DocumentStore, Query};
use crate::services::{achievement_evaluator, progress_aggregator};
use crate::utils::time::format_timestamp;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 5;
pub const MAX_ACTIVITY_LIMIT: usize = 50;

/// Labels for an activity entry.
pub struct ActivityLabels<'a> {
    pub module: &'a str,
    pub lesson: &'a str,
}

pub struct ProgressService {
    store: Arc<dyn DocumentStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_progress(
        &self,
        user_id: &str,
        module_id: &str,
    ) -> Result<Option<UserProgress>, DataAccessError> {
        store::load(
            self.store.as_ref(),
            USER_PROGRESS_COLLECTION,
            &UserProgress::key(user_id, module_id),
        )
        .await
    }

    /// Read-then-write of one progress record. No store write when the lesson
    /// was already completed.
    pub async fn complete_lesson(
        &self,
        user_id: &str,
        module_id: &str,
        lesson_id: u32,
    ) -> Result<CompletionOutcome, DataAccessError> {
        let key = UserProgress::key(user_id, module_id);
        let existing = self.get_progress(user_id, module_id).await?;
        let outcome = lesson_state::complete_lesson(existing, user_id, module_id, lesson_id, Utc::now());

        match outcome.transition {
            Transition::Created => {
                store::save(self.store.as_ref(), USER_PROGRESS_COLLECTION, &key, &outcome.progress)
                    .await?;
            }
            Transition::LessonAdded => {
                let partial = partial_document(json!({
                    "completedLessons": outcome.progress.completed_lessons,
                    "lastAccessed": format_timestamp(&outcome.progress.last_accessed),
                }));
                self.store
                    .update(USER_PROGRESS_COLLECTION, &key, partial)
                    .await?;
            }
            Transition::AlreadyCompleted => {
                tracing::debug!("Lesson {} already completed in {}", lesson_id, key);
            }
        }

        LESSONS_COMPLETED_TOTAL
            .with_label_values(&[outcome.transition.as_str()])
            .inc();
        tracing::info!(
            "Lesson {} completion for {}: {}",
            lesson_id,
            key,
            outcome.transition.as_str()
        );

        Ok(outcome)
    }

    /// Completion plus its `lesson_completed` log entry. The entry is written
    /// on every call, including repeats.
    pub async fn record_lesson_completion(
        &self,
        user_id: &str,
        module_id: &str,
        lesson_id: u32,
        labels: ActivityLabels<'_>,
    ) -> Result<CompletionOutcome, DataAccessError> {
        let outcome = self.complete_lesson(user_id, module_id, lesson_id).await?;
        self.log_activity(user_id, labels, ActivityKind::LessonCompleted, None)
            .await?;
        Ok(outcome)
    }

    /// Stores the latest quiz score for a lesson. Completion is untouched.
    pub async fn record_quiz_score(
        &self,
        user_id: &str,
        module_id: &str,
        lesson_id: u32,
        score: u32,
    ) -> Result<UserProgress, DataAccessError> {
        let key = UserProgress::key(user_id, module_id);
        let now = Utc::now();

        match self.get_progress(user_id, module_id).await? {
            Some(mut progress) => {
                progress.quiz_scores.insert(lesson_id, score);
                progress.last_accessed = now;
                let partial = partial_document(json!({
                    "quizScores": progress.quiz_scores,
                    "lastAccessed": format_timestamp(&progress.last_accessed),
                }));
                self.store
                    .update(USER_PROGRESS_COLLECTION, &key, partial)
                    .await?;
                Ok(progress)
            }
            None => {
                let mut progress = UserProgress::new(user_id, module_id, now);
                progress.quiz_scores.insert(lesson_id, score);
                store::save(self.store.as_ref(), USER_PROGRESS_COLLECTION, &key, &progress)
                    .await?;
                Ok(progress)
            }
        }
    }

    pub async fn log_activity(
        &self,
        user_id: &str,
        labels: ActivityLabels<'_>,
        kind: ActivityKind,
        score: Option<u32>,
    ) -> Result<UserActivity, DataAccessError> {
        let activity = UserActivity {
            // v7 ids sort in creation order within a millisecond
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            module: labels.module.to_string(),
            lesson: labels.lesson.to_string(),
            kind,
            date: Utc::now(),
            score,
        };
        store::save(
            self.store.as_ref(),
            USER_ACTIVITY_COLLECTION,
            &activity.id,
            &activity,
        )
        .await?;
        Ok(activity)
    }

    pub async fn progress_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserProgress>, DataAccessError> {
        let query = Query::new()
            .filter("userId", user_id)
            .order_by("moduleId", Direction::Ascending);
        store::load_all(self.store.as_ref(), USER_PROGRESS_COLLECTION, &query).await
    }

    /// Newest first. `limit` defaults to 5 and is capped at 50.
    pub async fn recent_activity(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserActivity>, DataAccessError> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let query = Query::new()
            .filter("userId", user_id)
            .order_by("date", Direction::Descending)
            .order_by("id", Direction::Descending)
            .limit(limit);
        store::load_all(self.store.as_ref(), USER_ACTIVITY_COLLECTION, &query).await
    }

    pub async fn summary_for(&self, user_id: &str) -> Result<ProgressSummary, DataAccessError> {
        let records = self.progress_for_user(user_id).await?;
        Ok(progress_aggregator::aggregate(&records))
    }

    pub async fn achievements_for(
        &self,
        user_id: &str,
        rules: &[Achievement],
    ) -> Result<Vec<Achievement>, DataAccessError> {
        let records = self.progress_for_user(user_id).await?;
        Ok(achievement_evaluator::evaluate(&records, rules))
    }
}

fn partial_document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
