use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: ModuleLevel,
    pub duration: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Module {
    pub fn lesson(&self, lesson_id: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == lesson_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: String,
    #[serde(flatten)]
    pub content: LessonContent,
}

/// Lesson body, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonContent {
    Video {
        #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
    },
    Interactive {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Activity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Discussion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Quiz {
        #[serde(rename = "quizQuestions", default)]
        questions: Vec<QuizQuestion>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Interactive,
    Activity,
    Discussion,
    Quiz,
}

impl Lesson {
    pub fn kind(&self) -> LessonKind {
        match self.content {
            LessonContent::Video { .. } => LessonKind::Video,
            LessonContent::Interactive { .. } => LessonKind::Interactive,
            LessonContent::Activity { .. } => LessonKind::Activity,
            LessonContent::Discussion { .. } => LessonKind::Discussion,
            LessonContent::Quiz { .. } => LessonKind::Quiz,
        }
    }

    pub fn quiz_questions(&self) -> Option<&[QuizQuestion]> {
        match &self.content {
            LessonContent::Quiz { questions } => Some(questions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Listing entry for `GET /api/v1/modules`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: ModuleLevel,
    pub duration: String,
    pub lessons: usize,
}

impl From<&Module> for ModuleSummary {
    fn from(module: &Module) -> Self {
        ModuleSummary {
            id: module.id.clone(),
            title: module.title.clone(),
            description: module.description.clone(),
            level: module.level,
            duration: module.duration.clone(),
            lessons: module.lessons.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lesson_type_tag_round_trips_through_json() {
        let raw = json!({
            "id": 4,
            "title": "Big Questions Quiz",
            "duration": "10 mins",
            "type": "quiz",
            "quizQuestions": [{
                "id": 1,
                "question": "Who said 'know thyself'?",
                "options": ["Socrates", "Mozart"],
                "correctAnswer": 0
            }]
        });

        let lesson: Lesson = serde_json::from_value(raw).unwrap();
        assert_eq!(lesson.kind(), LessonKind::Quiz);
        assert_eq!(lesson.quiz_questions().map(|q| q.len()), Some(1));

        let back = serde_json::to_value(&lesson).unwrap();
        assert_eq!(back["type"], "quiz");
        assert_eq!(back["quizQuestions"][0]["correctAnswer"], 0);
    }

    #[test]
    fn test_unknown_lesson_type_is_rejected() {
        let raw = json!({
            "id": 1,
            "title": "Dance",
            "duration": "5 mins",
            "type": "dance"
        });
        assert!(serde_json::from_value::<Lesson>(raw).is_err());
    }

    #[test]
    fn test_video_lesson_reads_video_url() {
        let raw = json!({
            "id": 1,
            "title": "Introduction to Stoicism",
            "duration": "20 mins",
            "type": "video",
            "videoUrl": "https://videos.example/stoa"
        });
        let lesson: Lesson = serde_json::from_value(raw).unwrap();
        assert_eq!(
            lesson.content,
            LessonContent::Video {
                video_url: Some("https://videos.example/stoa".into())
            }
        );
        assert!(lesson.quiz_questions().is_none());
    }
}
