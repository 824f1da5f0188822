use std::sync::Arc;

use crate::errors::DataAccessError;
use crate::i18n::Locale;
use crate::models::settings::USER_SETTINGS_COLLECTION;
use crate::models::UserSettings;
use crate::services::store::{self, DocumentStore};

pub struct SettingsService {
    store: Arc<dyn DocumentStore>,
    default_locale: Locale,
}

impl SettingsService {
    pub fn new(store: Arc<dyn DocumentStore>, default_locale: Locale) -> Self {
        Self {
            store,
            default_locale,
        }
    }

    /// Stored settings, or defaults when the user has never saved any.
    pub async fn get(&self, user_id: &str) -> Result<UserSettings, DataAccessError> {
        let stored: Option<UserSettings> =
            store::load(self.store.as_ref(), USER_SETTINGS_COLLECTION, user_id).await?;
        Ok(stored.unwrap_or_else(|| UserSettings::defaults_for(user_id, self.default_locale)))
    }

    /// Replaces the whole settings document. The owner always comes from the
    /// session, never from the body.
    pub async fn upsert(
        &self,
        user_id: &str,
        mut settings: UserSettings,
    ) -> Result<UserSettings, DataAccessError> {
        settings.user_id = user_id.to_string();
        store::save(self.store.as_ref(), USER_SETTINGS_COLLECTION, user_id, &settings).await?;
        tracing::info!("Settings saved for {}", user_id);
        Ok(settings)
    }
}
