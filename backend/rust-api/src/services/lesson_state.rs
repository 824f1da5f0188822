//! Per-lesson completion transition for a single progress record.

use chrono::{DateTime, Utc};

use crate::models::UserProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No record existed; one was created holding this lesson.
    Created,
    /// The record existed and gained this lesson.
    LessonAdded,
    /// The lesson was already completed. Nothing changed.
    AlreadyCompleted,
}

impl Transition {
    pub fn changed(&self) -> bool {
        !matches!(self, Transition::AlreadyCompleted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Created => "created",
            Transition::LessonAdded => "lesson_added",
            Transition::AlreadyCompleted => "already_completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub progress: UserProgress,
    pub transition: Transition,
}

/// Marks `lesson_id` completed. Idempotent, and never removes a lesson.
pub fn complete_lesson(
    existing: Option<UserProgress>,
    user_id: &str,
    module_id: &str,
    lesson_id: u32,
    now: DateTime<Utc>,
) -> CompletionOutcome {
    match existing {
        None => {
            let mut progress = UserProgress::new(user_id, module_id, now);
            progress.completed_lessons.insert(lesson_id);
            CompletionOutcome {
                progress,
                transition: Transition::Created,
            }
        }
        Some(progress) if progress.completed_lessons.contains(&lesson_id) => CompletionOutcome {
            progress,
            transition: Transition::AlreadyCompleted,
        },
        Some(mut progress) => {
            progress.completed_lessons.insert(lesson_id);
            progress.last_accessed = now;
            CompletionOutcome {
                progress,
                transition: Transition::LessonAdded,
            }
        }
    }
}
