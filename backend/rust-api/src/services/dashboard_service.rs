use crate::errors::DataAccessError;
use crate::models::dashboard::{ChildProgress, ParentDashboard};
use crate::services::content::RosterRepository;
use crate::services::progress_service::ProgressService;

/// Progress summary for every child on the parent's roster, in roster order.
pub async fn parent_dashboard(
    roster: &dyn RosterRepository,
    progress: &ProgressService,
    parent_id: &str,
) -> Result<ParentDashboard, DataAccessError> {
    let children = roster.children_of(parent_id).await?;
    tracing::debug!("Building dashboard for {} ({} children)", parent_id, children.len());

    let mut rows = Vec::with_capacity(children.len());
    for child in children {
        let summary = progress.summary_for(&child.user_id).await?;
        rows.push(ChildProgress {
            user_id: child.user_id,
            display_name: child.display_name,
            progress: summary,
        });
    }

    Ok(ParentDashboard {
        parent_id: parent_id.to_string(),
        children: rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::ChildAccount;
    use crate::services::content::StaticRosterRepository;
    use crate::services::store::InMemoryDocumentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dashboard_summarises_each_child() {
        let progress = ProgressService::new(Arc::new(InMemoryDocumentStore::new()));
        progress.complete_lesson("kid-a", "ethics", 1).await.unwrap();
        progress.complete_lesson("kid-a", "ethics", 2).await.unwrap();

        let roster = StaticRosterRepository::new().with_children(
            "parent1",
            vec![
                ChildAccount {
                    user_id: "kid-a".into(),
                    display_name: "Ada".into(),
                },
                ChildAccount {
                    user_id: "kid-b".into(),
                    display_name: "Ben".into(),
                },
            ],
        );

        let dashboard = parent_dashboard(&roster, &progress, "parent1").await.unwrap();
        assert_eq!(dashboard.children.len(), 2);
        assert_eq!(dashboard.children[0].progress.lessons_completed, 2);
        assert_eq!(dashboard.children[1].progress.lessons_completed, 0);

        let empty = parent_dashboard(&roster, &progress, "nobody").await.unwrap();
        assert!(empty.children.is_empty());
    }
}
