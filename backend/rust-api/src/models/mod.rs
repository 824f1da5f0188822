pub mod achievement;
pub mod activity;
pub mod content;
pub mod dashboard;
pub mod progress;
pub mod quiz;
pub mod settings;
pub mod user;

pub use achievement::{default_achievements, Achievement, AchievementCondition};
pub use activity::{ActivityKind, UserActivity};
pub use content::{Lesson, LessonContent, LessonKind, Module, ModuleLevel, QuizQuestion};
pub use progress::{ProgressSummary, UserProgress};
pub use settings::UserSettings;
pub use user::{SessionContext, UserIdentity};
