use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{ApiError, AuthError};
use crate::i18n::Locale;
use crate::models::{settings::USER_SETTINGS_COLLECTION, SessionContext, UserSettings};
use crate::services::{store, AppState};

pub const LOCALE_HEADER: &str = "x-locale";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String, // user id
    pub sid: String, // session record key
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolves the bearer token into a `SessionContext` request extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization token".to_string()))?;

    let session = state
        .identity
        .session(token)
        .await
        .map_err(|e| {
            tracing::warn!("Session validation failed: {}", e);
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::from(AuthError::SessionExpired))?;

    let locale = resolve_locale(&state, &headers, &session.user.id).await;

    tracing::debug!(
        "Authenticated user: {} (session: {}, locale: {})",
        session.user.id,
        session.session_id,
        locale.as_str()
    );

    request.extensions_mut().insert(SessionContext {
        user: session.user,
        session_id: session.session_id,
        token: token.to_string(),
        locale,
    });

    Ok(next.run(request).await)
}

/// `x-locale` header, then the stored language preference, then the default.
async fn resolve_locale(state: &AppState, headers: &HeaderMap, user_id: &str) -> Locale {
    if let Some(locale) = headers
        .get(LOCALE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Locale>().ok())
    {
        return locale;
    }

    match store::load::<UserSettings>(state.store.as_ref(), USER_SETTINGS_COLLECTION, user_id)
        .await
    {
        Ok(Some(settings)) => settings.language,
        Ok(None) => state.translations.default_locale(),
        Err(e) => {
            tracing::warn!("Failed to load settings for locale: {}", e);
            state.translations.default_locale()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset: i64) -> SessionClaims {
        let now = chrono::Utc::now().timestamp();
        SessionClaims {
            sub: "user123".to_string(),
            sid: "session-1".to_string(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = JwtService::new("test-secret");
        let token = service.generate_token(&claims(3600)).unwrap();
        let validated = service.validate_token(&token).unwrap();

        assert_eq!(validated.sub, "user123");
        assert_eq!(validated.sid, "session-1");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtService::new("one").generate_token(&claims(3600)).unwrap();
        let err = JwtService::new("two").validate_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_token_reports_session_expired() {
        let service = JwtService::new("test-secret");
        let token = service.generate_token(&claims(-3600)).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::SessionExpired)
        ));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        headers.insert("authorization", "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
