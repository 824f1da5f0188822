use serde::{Deserialize, Serialize};

use super::progress::ProgressSummary;

pub const ROSTERS_COLLECTION: &str = "rosters";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChildAccount {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildProgress {
    pub user_id: String,
    pub display_name: String,
    pub progress: ProgressSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentDashboard {
    pub parent_id: String,
    pub children: Vec<ChildProgress>,
}
