//! Decides which authored achievements a learner's progress satisfies.

use crate::models::{Achievement, AchievementCondition, UserProgress};
use crate::services::progress_aggregator::{average_quiz_score, total_lessons_completed};

/// Satisfied rules, in the order given.
pub fn evaluate(records: &[UserProgress], rules: &[Achievement]) -> Vec<Achievement> {
    let lessons = total_lessons_completed(records);
    let average = average_quiz_score(records);

    rules
        .iter()
        .filter(|rule| is_satisfied(&rule.condition, lessons, average))
        .cloned()
        .collect()
}

fn is_satisfied(condition: &AchievementCondition, lessons: u32, average: u32) -> bool {
    match condition {
        AchievementCondition::LessonsCompleted { threshold } => lessons >= *threshold,
        AchievementCondition::QuizScore { threshold } => average >= *threshold,
        // No participation data is recorded yet.
        AchievementCondition::DiscussionParticipated { .. } => false,
        AchievementCondition::Unknown => false,
    }
}
