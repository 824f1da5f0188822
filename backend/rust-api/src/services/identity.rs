use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::metrics::SIGN_INS_TOTAL;
use crate::middlewares::auth::{JwtService, SessionClaims};
use crate::models::user::{
    AuthSession, SessionRecord, StoredUser, UserIdentity, SESSIONS_COLLECTION, USERS_COLLECTION,
};
use crate::services::store::{self, DocumentStore};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Ends the session named by `token`.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// `Ok(None)` when the token is well-formed but its session has ended.
    async fn session(&self, token: &str) -> Result<Option<SessionRecord>, AuthError>;

    async fn current_user(&self, token: &str) -> Result<Option<UserIdentity>, AuthError> {
        Ok(self.session(token).await?.map(|session| session.user))
    }
}

/// Accounts and sessions kept in the document store.
pub struct StoreIdentityProvider {
    store: Arc<dyn DocumentStore>,
    jwt: JwtService,
    session_ttl_seconds: i64,
    hash_cost: u32,
}

impl StoreIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: &str, session_ttl_seconds: i64) -> Self {
        Self {
            store,
            jwt: JwtService::new(jwt_secret),
            session_ttl_seconds,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Lower bcrypt cost, for tests.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn account_key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    async fn open_session(&self, user: UserIdentity) -> Result<AuthSession, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.session_ttl_seconds);
        let session_id = Uuid::new_v4().to_string();

        let record = SessionRecord {
            session_id: session_id.clone(),
            user: user.clone(),
            created_at: now,
            expires_at,
        };
        store::save(self.store.as_ref(), SESSIONS_COLLECTION, &session_id, &record).await?;

        let token = self.jwt.generate_token(&SessionClaims {
            sub: user.id.clone(),
            sid: session_id.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        })?;

        tracing::info!("Session {} opened for user {}", session_id, user.id);

        Ok(AuthSession {
            token,
            user,
            expires_at,
        })
    }
}

#[async_trait]
impl IdentityProvider for StoreIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, AuthError> {
        let key = Self::account_key(email);
        let existing: Option<StoredUser> =
            store::load(self.store.as_ref(), USERS_COLLECTION, &key).await?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash(password, self.hash_cost).map_err(|_| AuthError::Hashing)?;
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: key.clone(),
            display_name: display_name.trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        store::save(self.store.as_ref(), USERS_COLLECTION, &key, &user).await?;

        tracing::info!("Registered user {}", user.id);
        self.open_session(user.into()).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let key = Self::account_key(email);
        let user: Option<StoredUser> =
            store::load(self.store.as_ref(), USERS_COLLECTION, &key).await?;

        let user = match user {
            Some(user) if verify(password, &user.password_hash).unwrap_or(false) => user,
            _ => {
                SIGN_INS_TOTAL.with_label_values(&["rejected"]).inc();
                tracing::warn!("Rejected sign-in for {}", key);
                return Err(AuthError::InvalidCredentials);
            }
        };

        SIGN_INS_TOTAL.with_label_values(&["success"]).inc();
        self.open_session(user.into()).await
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.jwt.validate_token(token)?;
        self.store.delete(SESSIONS_COLLECTION, &claims.sid).await?;
        tracing::info!("Session {} closed for user {}", claims.sid, claims.sub);
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        let claims = self.jwt.validate_token(token)?;
        let record: Option<SessionRecord> =
            store::load(self.store.as_ref(), SESSIONS_COLLECTION, &claims.sid).await?;

        match record {
            Some(record) if record.user.id != claims.sub => Err(AuthError::InvalidToken),
            Some(record) if record.expires_at <= Utc::now() => {
                self.store.delete(SESSIONS_COLLECTION, &claims.sid).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::InMemoryDocumentStore;

    fn provider() -> StoreIdentityProvider {
        StoreIdentityProvider::new(Arc::new(InMemoryDocumentStore::new()), "test-secret", 3600)
            .with_hash_cost(4)
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let identity = provider();
        let created = identity
            .sign_up("Alice@Example.com", "Wisdom123", "Alice")
            .await
            .unwrap();
        assert_eq!(created.user.email, "alice@example.com");

        let session = identity
            .sign_in("alice@example.com", "Wisdom123")
            .await
            .unwrap();
        assert_eq!(session.user.id, created.user.id);

        let current = identity.current_user(&session.token).await.unwrap();
        assert_eq!(current.map(|u| u.display_name), Some("Alice".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let identity = provider();
        identity.sign_up("bob@example.com", "Wisdom123", "Bob").await.unwrap();
        let err = identity
            .sign_up("BOB@example.com", "Other1234", "Bobby")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let identity = provider();
        identity.sign_up("cat@example.com", "Wisdom123", "Cat").await.unwrap();
        let err = identity.sign_in("cat@example.com", "nope-nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let identity = provider();
        let session = identity.sign_up("dan@example.com", "Wisdom123", "Dan").await.unwrap();

        identity.sign_out(&session.token).await.unwrap();
        assert!(identity.current_user(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let identity = provider();
        assert!(matches!(
            identity.session("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
