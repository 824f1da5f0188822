use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

pub const USER_SETTINGS_COLLECTION: &str = "user_settings";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub user_id: String,
    pub email_notifications: bool,
    pub progress_updates: bool,
    pub language: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parental_controls: Option<ParentalControls>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentalControls {
    /// Minutes per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_time: Option<u32>,
    #[serde(default)]
    pub restricted_modules: Vec<String>,
}

impl UserSettings {
    pub fn defaults_for(user_id: &str, language: Locale) -> Self {
        Self {
            user_id: user_id.to_string(),
            email_notifications: true,
            progress_updates: true,
            language,
            parental_controls: None,
        }
    }
}
