use std::collections::BTreeMap;

use crate::errors::ApiError;
use crate::metrics::QUIZZES_GRADED_TOTAL;
use crate::models::quiz::{QuestionFeedback, QuizResult};
use crate::models::{ActivityKind, Lesson, Module, QuizQuestion};
use crate::services::progress_service::{ActivityLabels, ProgressService};

/// Scores an answer sheet. Unanswered questions count as wrong and an empty
/// quiz scores 0.
pub fn grade(questions: &[QuizQuestion], answers: &BTreeMap<u32, usize>) -> QuizResult {
    let feedback: Vec<QuestionFeedback> = questions
        .iter()
        .map(|q| QuestionFeedback {
            question_id: q.id,
            correct: answers.get(&q.id) == Some(&q.correct_answer),
            correct_answer: q.correct_answer,
            explanation: q.explanation.clone(),
        })
        .collect();

    let correct_count = feedback.iter().filter(|f| f.correct).count();
    let total_questions = questions.len();
    let score = if total_questions == 0 {
        0
    } else {
        ((correct_count as f64 / total_questions as f64) * 100.0).round() as u32
    };

    QuizResult {
        score,
        correct_count,
        total_questions,
        feedback,
    }
}

/// Grades a quiz lesson and records the score plus a `quiz_completed` entry.
pub async fn submit_quiz(
    progress: &ProgressService,
    user_id: &str,
    module: &Module,
    lesson: &Lesson,
    answers: &BTreeMap<u32, usize>,
) -> Result<QuizResult, ApiError> {
    let questions = lesson.quiz_questions().ok_or_else(|| {
        ApiError::bad_request(format!("Lesson {} in {} is not a quiz", lesson.id, module.id))
    })?;

    let result = grade(questions, answers);

    progress
        .record_quiz_score(user_id, &module.id, lesson.id, result.score)
        .await?;
    progress
        .log_activity(
            user_id,
            ActivityLabels {
                module: &module.title,
                lesson: &lesson.title,
            },
            ActivityKind::QuizCompleted,
            Some(result.score),
        )
        .await?;

    QUIZZES_GRADED_TOTAL.inc();
    tracing::info!(
        "Quiz {}/{} graded for {}: {} ({}/{})",
        module.id,
        lesson.id,
        user_id,
        result.score,
        result.correct_count,
        result.total_questions
    );

    Ok(result)
}
