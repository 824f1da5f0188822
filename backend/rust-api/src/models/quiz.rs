use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer sheet: question id -> chosen option index.
#[derive(Debug, Deserialize)]
pub struct QuizSubmission {
    pub answers: BTreeMap<u32, usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedback {
    pub question_id: u32,
    pub correct: bool,
    pub correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub correct_count: usize,
    pub total_questions: usize,
    pub feedback: Vec<QuestionFeedback>,
}
