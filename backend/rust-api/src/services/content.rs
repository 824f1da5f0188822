use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::DataAccessError;
use crate::models::dashboard::{ChildAccount, ROSTERS_COLLECTION};
use crate::models::{Lesson, LessonContent, Module, ModuleLevel, QuizQuestion};
use crate::services::store::{self, Direction, DocumentStore, Query};

pub const MODULES_COLLECTION: &str = "modules";

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list_modules(&self) -> Result<Vec<Module>, DataAccessError>;

    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, DataAccessError>;
}

#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Children linked to a parent account, in roster order.
    async fn children_of(&self, parent_id: &str) -> Result<Vec<ChildAccount>, DataAccessError>;
}

/// Fixed catalogue, used by tests and the `memory` backend.
pub struct StaticContentRepository {
    modules: Vec<Module>,
}

impl StaticContentRepository {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn seeded() -> Self {
        Self::new(seed_modules())
    }
}

#[async_trait]
impl ContentRepository for StaticContentRepository {
    async fn list_modules(&self) -> Result<Vec<Module>, DataAccessError> {
        Ok(self.modules.clone())
    }

    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, DataAccessError> {
        Ok(self.modules.iter().find(|m| m.id == module_id).cloned())
    }
}

/// Modules read from the "modules" collection, keyed by module id.
pub struct StoreContentRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreContentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContentRepository for StoreContentRepository {
    async fn list_modules(&self) -> Result<Vec<Module>, DataAccessError> {
        let query = Query::new().order_by("id", Direction::Ascending);
        store::load_all(self.store.as_ref(), MODULES_COLLECTION, &query).await
    }

    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, DataAccessError> {
        store::load(self.store.as_ref(), MODULES_COLLECTION, module_id).await
    }
}

#[derive(Default)]
pub struct StaticRosterRepository {
    rosters: HashMap<String, Vec<ChildAccount>>,
}

impl StaticRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, parent_id: &str, children: Vec<ChildAccount>) -> Self {
        self.rosters.insert(parent_id.to_string(), children);
        self
    }
}

#[async_trait]
impl RosterRepository for StaticRosterRepository {
    async fn children_of(&self, parent_id: &str) -> Result<Vec<ChildAccount>, DataAccessError> {
        Ok(self.rosters.get(parent_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RosterDocument {
    #[serde(default)]
    children: Vec<ChildAccount>,
}

/// Rosters read from the "rosters" collection, keyed by parent id.
pub struct StoreRosterRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreRosterRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RosterRepository for StoreRosterRepository {
    async fn children_of(&self, parent_id: &str) -> Result<Vec<ChildAccount>, DataAccessError> {
        let roster: Option<RosterDocument> =
            store::load(self.store.as_ref(), ROSTERS_COLLECTION, parent_id).await?;
        Ok(roster.map(|r| r.children).unwrap_or_default())
    }
}

fn lesson(id: u32, title: &str, duration: &str, content: LessonContent) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        description: None,
        duration: duration.to_string(),
        content,
    }
}

fn question(id: u32, text: &str, options: &[&str], correct_answer: usize) -> QuizQuestion {
    QuizQuestion {
        id,
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
        explanation: None,
    }
}

pub fn seed_modules() -> Vec<Module> {
    vec![
        Module {
            id: "stoicism".to_string(),
            title: "Stoicism".to_string(),
            description: "Learn about inner peace and self-control".to_string(),
            level: ModuleLevel::Beginner,
            duration: "4 weeks".to_string(),
            lessons: vec![
                lesson(
                    1,
                    "Introduction to Stoicism",
                    "20 mins",
                    LessonContent::Video { video_url: None },
                ),
                lesson(
                    2,
                    "Understanding Emotions",
                    "25 mins",
                    LessonContent::Interactive { content: None },
                ),
                lesson(
                    3,
                    "Control What You Can",
                    "30 mins",
                    LessonContent::Activity { content: None },
                ),
                lesson(
                    4,
                    "Stoic Check-in",
                    "10 mins",
                    LessonContent::Quiz {
                        questions: vec![
                            question(
                                1,
                                "What can we always control?",
                                &["The weather", "Our own choices", "Other people"],
                                1,
                            ),
                            question(
                                2,
                                "Which philosopher was also a Roman emperor?",
                                &["Marcus Aurelius", "Plato", "Confucius"],
                                0,
                            ),
                            question(
                                3,
                                "Feeling angry is...",
                                &["Never allowed", "Something we can notice and calm", "Always right"],
                                1,
                            ),
                        ],
                    },
                ),
            ],
            image_url: None,
        },
        Module {
            id: "ethics".to_string(),
            title: "Ethics".to_string(),
            description: "Explore right and wrong through fun activities".to_string(),
            level: ModuleLevel::Beginner,
            duration: "3 weeks".to_string(),
            lessons: vec![
                lesson(
                    1,
                    "What is Right and Wrong?",
                    "20 mins",
                    LessonContent::Discussion { content: None },
                ),
                lesson(
                    2,
                    "Making Good Choices",
                    "25 mins",
                    LessonContent::Interactive { content: None },
                ),
                lesson(
                    3,
                    "Helping Others",
                    "30 mins",
                    LessonContent::Activity { content: None },
                ),
            ],
            image_url: None,
        },
        Module {
            id: "logic".to_string(),
            title: "Logic".to_string(),
            description: "Discover how to think clearly and solve puzzles".to_string(),
            level: ModuleLevel::Intermediate,
            duration: "5 weeks".to_string(),
            lessons: vec![
                lesson(
                    1,
                    "What is an Argument?",
                    "20 mins",
                    LessonContent::Video { video_url: None },
                ),
                lesson(
                    2,
                    "Spot the Mistake",
                    "25 mins",
                    LessonContent::Interactive { content: None },
                ),
                lesson(
                    3,
                    "Puzzle Time",
                    "15 mins",
                    LessonContent::Quiz {
                        questions: vec![
                            question(
                                1,
                                "All cats are animals. Tom is a cat. So Tom is...",
                                &["A dog", "An animal", "A plant"],
                                1,
                            ),
                            question(
                                2,
                                "If it rains, the grass gets wet. The grass is dry. Did it rain?",
                                &["Yes", "No", "Maybe"],
                                1,
                            ),
                        ],
                    },
                ),
            ],
            image_url: None,
        },
        Module {
            id: "eastern-philosophy".to_string(),
            title: "Eastern Philosophy".to_string(),
            description: "Journey through ancient wisdom from the East".to_string(),
            level: ModuleLevel::Intermediate,
            duration: "6 weeks".to_string(),
            lessons: vec![
                lesson(
                    1,
                    "The Story of Confucius",
                    "20 mins",
                    LessonContent::Video { video_url: None },
                ),
                lesson(
                    2,
                    "Balance and the Tao",
                    "25 mins",
                    LessonContent::Discussion { content: None },
                ),
                lesson(
                    3,
                    "Mindful Breathing",
                    "15 mins",
                    LessonContent::Activity { content: None },
                ),
            ],
            image_url: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LessonKind;
    use crate::services::store::InMemoryDocumentStore;

    #[tokio::test]
    async fn test_seeded_catalogue() {
        let repo = StaticContentRepository::seeded();
        let modules = repo.list_modules().await.unwrap();
        assert_eq!(modules.len(), 4);

        let stoicism = repo.get_module("stoicism").await.unwrap().unwrap();
        assert_eq!(stoicism.lesson(4).map(|l| l.kind()), Some(LessonKind::Quiz));
        assert!(repo.get_module("alchemy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_repository_reads_saved_modules() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        for module in seed_modules() {
            store::save(store.as_ref(), MODULES_COLLECTION, &module.id, &module)
                .await
                .unwrap();
        }

        let repo = StoreContentRepository::new(store);
        let ids: Vec<String> = repo
            .list_modules()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["eastern-philosophy", "ethics", "logic", "stoicism"]);

        let ethics = repo.get_module("ethics").await.unwrap().unwrap();
        assert_eq!(ethics.lessons.len(), 3);
    }

    #[tokio::test]
    async fn test_rosters() {
        let child = ChildAccount {
            user_id: "child1".into(),
            display_name: "Alice".into(),
        };
        let repo = StaticRosterRepository::new().with_children("parent1", vec![child.clone()]);
        assert_eq!(repo.children_of("parent1").await.unwrap(), vec![child]);
        assert!(repo.children_of("stranger").await.unwrap().is_empty());
    }
}
