//! Refresh token lifecycle: issue, lookup, validate, revoke

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::refresh_token::{generate_token, hash_token, REFRESH_TOKEN_TTL_DAYS},
    error::AppError,
    models::refresh_token::RefreshToken,
    repository::RefreshTokenStore,
};

/// A freshly issued token: the value handed to the client and the stored record
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub record: RefreshToken,
}

pub struct RefreshTokenService {
    store: Arc<dyn RefreshTokenStore>,
}

impl RefreshTokenService {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self { store }
    }

    /// Create and persist a new refresh token for `user_id` (60-day lifetime).
    /// Only the digest reaches the store.
    pub async fn issue(&self, user_id: Uuid) -> Result<IssuedRefreshToken, AppError> {
        let now = Utc::now();
        let token = generate_token();
        let record = RefreshToken {
            token_hash: hash_token(&token),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revoked_at: None,
        };

        self.store.insert(&record).await?;
        tracing::debug!(user_id = %user_id, "Refresh token issued");

        Ok(IssuedRefreshToken { token, record })
    }

    /// Look up the record for a presented token
    pub async fn lookup(&self, token: &str) -> Result<RefreshToken, AppError> {
        self.store
            .find(&hash_token(token))
            .await?
            .ok_or_else(|| AppError::not_found("refresh token"))
    }

    pub fn is_valid(&self, record: &RefreshToken) -> bool {
        record.is_valid()
    }

    /// Revoke a token. Repeated calls succeed and keep the first `revoked_at`.
    pub async fn revoke(&self, token: &str) -> Result<RefreshToken, AppError> {
        let record = self
            .store
            .revoke(&hash_token(token), Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("refresh token"))?;

        tracing::debug!(user_id = %record.user_id, "Refresh token revoked");

        Ok(record)
    }
}
