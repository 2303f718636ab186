//! Refresh token repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RefreshTokenStore;
use crate::{error::AppError, models::refresh_token::RefreshToken};

pub struct RefreshTokenRepository {
    db: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenStore for RefreshTokenRepository {
    /// 存储刷新令牌
    async fn insert(&self, token: &RefreshToken) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.updated_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        let record =
            sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
                .bind(token_hash)
                .fetch_optional(&self.db)
                .await?;

        Ok(record)
    }

    /// 撤销刷新令牌（单条语句，COALESCE 保留首次撤销时间）
    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<Option<RefreshToken>, AppError> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            UPDATE refresh_tokens
            SET
                revoked_at = COALESCE(revoked_at, $2),
                updated_at = $2
            WHERE token_hash = $1
            RETURNING *
            "#,
        )
        .bind(token_hash)
        .bind(at)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }
}
