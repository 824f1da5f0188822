use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub condition: AchievementCondition,
}

/// Award rule, tagged by `type` on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementCondition {
    LessonsCompleted { threshold: u32 },
    QuizScore { threshold: u32 },
    DiscussionParticipated { threshold: u32 },
    /// Condition kinds authored after this build.
    #[serde(other)]
    Unknown,
}

pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: 1,
            title: "First Step".to_string(),
            description: "Completed your first lesson".to_string(),
            icon: "🎯".to_string(),
            condition: AchievementCondition::LessonsCompleted { threshold: 1 },
        },
        Achievement {
            id: 2,
            title: "Quick Learner".to_string(),
            description: "Completed 5 lessons".to_string(),
            icon: "🚀".to_string(),
            condition: AchievementCondition::LessonsCompleted { threshold: 5 },
        },
        Achievement {
            id: 3,
            title: "Deep Thinker".to_string(),
            description: "Participated in 3 discussions".to_string(),
            icon: "🤔".to_string(),
            condition: AchievementCondition::DiscussionParticipated { threshold: 3 },
        },
        Achievement {
            id: 4,
            title: "Sharp Mind".to_string(),
            description: "Average quiz score of 80 or more".to_string(),
            icon: "🧠".to_string(),
            condition: AchievementCondition::QuizScore { threshold: 80 },
        },
    ]
}
