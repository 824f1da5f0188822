use serde::Deserialize;
use std::env;

use crate::errors::ConfigurationError;
use crate::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStorageSettings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: String,
    pub store_backend: StoreBackend,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub jwt_secret: String,
    pub session_ttl_seconds: i64,
    pub storage: Option<ObjectStorageSettings>,
    pub default_locale: Locale,
    pub bind_addr: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigurationError> {
        dotenvy::dotenv().ok();

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
        let is_prod = app_env == "prod";

        // config/{env}.toml, then APP__SECTION__KEY overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let store_backend = match settings
            .get_string("store.backend")
            .or_else(|_| env::var("STORE_BACKEND"))
            .unwrap_or_else(|_| {
                if is_prod {
                    "mongo".to_string()
                } else {
                    "memory".to_string()
                }
            })
            .to_ascii_lowercase()
            .as_str()
        {
            "mongo" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigurationError::Invalid {
                    key: "store.backend",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .ok();
        if store_backend == StoreBackend::Mongo && mongo_uri.is_none() {
            return Err(ConfigurationError::Missing("database.mongo_uri"));
        }

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "philokids".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) if !secret.is_empty() => secret,
            _ if is_prod => return Err(ConfigurationError::Missing("auth.jwt_secret")),
            _ => {
                eprintln!("WARNING: Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let session_ttl_seconds = settings
            .get_int("auth.session_ttl_seconds")
            .ok()
            .or_else(|| {
                env::var("SESSION_TTL_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
            })
            .filter(|v| *v > 0)
            .unwrap_or(86_400);

        let storage = match settings.get::<ObjectStorageSettings>("storage") {
            Ok(storage) => Some(storage),
            Err(_) if is_prod => return Err(ConfigurationError::Missing("storage")),
            Err(_) => None,
        };

        let default_locale = match settings.get_string("i18n.default_locale") {
            Ok(code) => code.parse().map_err(|_| ConfigurationError::Invalid {
                key: "i18n.default_locale",
                reason: format!("unsupported locale '{}'", code),
            })?,
            Err(_) => Locale::default(),
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        Ok(Config {
            app_env,
            store_backend,
            mongo_uri,
            mongo_database,
            jwt_secret,
            session_ttl_seconds,
            storage,
            default_locale,
            bind_addr,
        })
    }

    /// In-memory configuration for tests and local experiments.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Config {
            app_env: "test".to_string(),
            store_backend: StoreBackend::Memory,
            mongo_uri: None,
            mongo_database: "philokids".to_string(),
            jwt_secret: jwt_secret.to_string(),
            session_ttl_seconds: 3600,
            storage: None,
            default_locale: Locale::En,
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
