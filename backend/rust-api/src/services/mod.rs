use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::i18n::Translations;

use self::blob_store::{BlobStore, InMemoryBlobStore, S3BlobStore};
use self::content::{
    ContentRepository, RosterRepository, StaticContentRepository, StaticRosterRepository,
    StoreContentRepository, StoreRosterRepository,
};
use self::identity::{IdentityProvider, StoreIdentityProvider};
use self::progress_service::ProgressService;
use self::settings_service::SettingsService;
use self::store::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};

pub mod achievement_evaluator;
pub mod blob_store;
pub mod content;
pub mod dashboard_service;
pub mod identity;
pub mod lesson_state;
pub mod progress_aggregator;
pub mod progress_service;
pub mod quiz_service;
pub mod settings_service;
pub mod store;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub content: Arc<dyn ContentRepository>,
    pub roster: Arc<dyn RosterRepository>,
    pub translations: Translations,
}

impl AppState {
    /// Builds collaborators for the configured backend.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let state = match config.store_backend {
            StoreBackend::Mongo => {
                let uri = config
                    .mongo_uri
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("database.mongo_uri is not set"))?;

                tracing::info!("Connecting to MongoDB...");
                let client = mongodb::Client::with_uri_str(&uri).await?;
                let store: Arc<dyn DocumentStore> = Arc::new(MongoDocumentStore::new(
                    client.database(&config.mongo_database),
                ));
                store
                    .ping()
                    .await
                    .map_err(|e| anyhow::anyhow!("MongoDB ping failed: {}", e))?;
                tracing::info!("MongoDB connection established successfully");

                let content: Arc<dyn ContentRepository> =
                    Arc::new(StoreContentRepository::new(store.clone()));
                let roster: Arc<dyn RosterRepository> =
                    Arc::new(StoreRosterRepository::new(store.clone()));
                let blobs = Self::blob_store(&config)?;
                Self::from_parts(config, store, blobs, content, roster)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                let blobs = Self::blob_store(&config)?;
                let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
                Self::from_parts(
                    config,
                    store,
                    blobs,
                    Arc::new(StaticContentRepository::seeded()),
                    Arc::new(StaticRosterRepository::new()),
                )
            }
        };

        Ok(state)
    }

    /// Everything in memory, with the seeded catalogue.
    pub fn in_memory(config: Config) -> Self {
        Self::from_parts(
            config,
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(StaticContentRepository::seeded()),
            Arc::new(StaticRosterRepository::new()),
        )
    }

    pub fn from_parts(
        config: Config,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        content: Arc<dyn ContentRepository>,
        roster: Arc<dyn RosterRepository>,
    ) -> Self {
        let identity: Arc<dyn IdentityProvider> = Arc::new(StoreIdentityProvider::new(
            store.clone(),
            &config.jwt_secret,
            config.session_ttl_seconds,
        ));
        Self::with_identity(config, store, blobs, identity, content, roster)
    }

    pub fn with_identity(
        config: Config,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
        content: Arc<dyn ContentRepository>,
        roster: Arc<dyn RosterRepository>,
    ) -> Self {
        let translations = Translations::new(config.default_locale);
        Self {
            config,
            store,
            blobs,
            identity,
            content,
            roster,
            translations,
        }
    }

    pub fn progress(&self) -> ProgressService {
        ProgressService::new(self.store.clone())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.store.clone(), self.translations.default_locale())
    }

    fn blob_store(config: &Config) -> anyhow::Result<Arc<dyn BlobStore>> {
        match &config.storage {
            Some(settings) => {
                let store = S3BlobStore::new(settings.clone(), &config.app_env)?;
                tracing::info!("Object storage configured for bucket {}", settings.bucket);
                Ok(Arc::new(store))
            }
            None => {
                tracing::warn!("Object storage not configured; avatars are kept in memory");
                Ok(Arc::new(InMemoryBlobStore::new()))
            }
        }
    }
}
