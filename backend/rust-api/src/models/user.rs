use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::i18n::Locale;
use crate::utils::time::rfc3339_millis;

pub const USERS_COLLECTION: &str = "users";
pub const SESSIONS_COLLECTION: &str = "sessions";

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

/// Account document stored in the "users" collection, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserIdentity {
    fn from(user: StoredUser) -> Self {
        UserIdentity {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
        }
    }
}

/// Live sign-in, keyed by session id. Deleting it ends the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub user: UserIdentity,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Display name must be between 1 and 100 characters"
    ))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Returned by sign-in and sign-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: UserIdentity,
    #[serde(with = "rfc3339_millis")]
    pub expires_at: DateTime<Utc>,
}

/// Per-request context built by the auth middleware from a valid token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: UserIdentity,
    pub session_id: String,
    pub token: String,
    pub locale: Locale,
}
