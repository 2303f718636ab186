//! Chirp repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ChirpStore;
use crate::{
    error::AppError,
    models::chirp::{Chirp, SortOrder},
};

pub struct ChirpRepository {
    db: PgPool,
}

impl ChirpRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChirpStore for ChirpRepository {
    async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError> {
        let chirp = sqlx::query_as::<_, Chirp>(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(chirp)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let chirp = sqlx::query_as::<_, Chirp>("SELECT * FROM chirps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(chirp)
    }

    /// 列出 chirps
    async fn list(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, AppError> {
        // 排序方向只来自枚举，不接受外部字符串
        let sql = format!(
            "SELECT * FROM chirps WHERE ($1::uuid IS NULL OR user_id = $1) ORDER BY created_at {}, id {}",
            sort.as_sql(),
            sort.as_sql()
        );

        let chirps = sqlx::query_as::<_, Chirp>(&sql)
            .bind(author_id)
            .fetch_all(&self.db)
            .await?;

        Ok(chirps)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
