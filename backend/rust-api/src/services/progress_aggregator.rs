//! Summary statistics over a learner's progress records.

use std::collections::HashSet;

use crate::models::progress::{ProgressSummary, UserProgress, MINUTES_PER_LESSON};

pub fn total_lessons_completed(records: &[UserProgress]) -> u32 {
    records
        .iter()
        .map(|record| record.completed_lessons.len() as u32)
        .sum()
}

/// Mean of every quiz score across all records, rounded; 0 without scores.
pub fn average_quiz_score(records: &[UserProgress]) -> u32 {
    let (sum, count) = records
        .iter()
        .flat_map(|record| record.quiz_scores.values())
        .fold((0u64, 0u64), |(sum, count), score| {
            (sum + u64::from(*score), count + 1)
        });

    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u32
    }
}

pub fn aggregate(records: &[UserProgress]) -> ProgressSummary {
    let started: HashSet<&str> = records
        .iter()
        .filter(|record| !record.completed_lessons.is_empty())
        .map(|record| record.module_id.as_str())
        .collect();
    let completed: HashSet<&str> = records
        .iter()
        .filter(|record| record.is_module_completed())
        .map(|record| record.module_id.as_str())
        .collect();
    let lessons_completed = total_lessons_completed(records);

    ProgressSummary {
        modules_started: started.len() as u32,
        modules_completed: completed.len() as u32,
        lessons_completed,
        average_quiz_score: average_quiz_score(records),
        time_spent_minutes: lessons_completed * MINUTES_PER_LESSON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(module_id: &str, lessons: &[u32], scores: &[(u32, u32)]) -> UserProgress {
        let mut progress = UserProgress::new("child1", module_id, Utc::now());
        progress.completed_lessons.extend(lessons.iter().copied());
        progress.quiz_scores.extend(scores.iter().copied());
        progress
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(aggregate(&[]), ProgressSummary::default());
    }

    #[test]
    fn test_lessons_completed_is_sum_of_sets() {
        let records = vec![
            record("stoicism", &[1, 2], &[]),
            record("ethics", &[1], &[]),
            record("logic", &[], &[]),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.lessons_completed, 3);
        assert_eq!(summary.time_spent_minutes, 60);
    }

    #[test]
    fn test_average_across_records() {
        let records = vec![
            record("stoicism", &[1], &[(4, 80)]),
            record("ethics", &[1], &[(2, 90), (3, 100)]),
        ];
        assert_eq!(aggregate(&records).average_quiz_score, 90);
    }

    #[test]
    fn test_average_rounds_to_nearest() {
        let records = vec![record("logic", &[], &[(1, 66), (2, 67)])];
        // 66.5 rounds half away from zero
        assert_eq!(average_quiz_score(&records), 67);
    }

    #[test]
    fn test_module_completion_threshold_boundary() {
        let two = vec![record("ethics", &[1, 2], &[])];
        assert_eq!(aggregate(&two).modules_completed, 0);
        assert_eq!(aggregate(&two).modules_started, 1);

        let three = vec![record("ethics", &[1, 2, 3], &[])];
        assert_eq!(aggregate(&three).modules_completed, 1);
    }

    #[test]
    fn test_modules_without_completed_lessons_are_not_started() {
        let records = vec![
            record("stoicism", &[], &[(4, 50)]),
            record("ethics", &[2], &[]),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.modules_started, 1);
        assert_eq!(summary.average_quiz_score, 50);
    }
}
