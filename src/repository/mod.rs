//! 数据访问层
//! 存储 trait 及其 PostgreSQL / 内存实现

pub mod chirp_repo;
pub mod memory;
pub mod refresh_token_repo;
pub mod user_repo;

pub use chirp_repo::ChirpRepository;
pub use memory::MemoryStore;
pub use refresh_token_repo::RefreshTokenRepository;
pub use user_repo::UserRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{chirp::Chirp, chirp::SortOrder, refresh_token::RefreshToken, user::User},
};

/// 用户存储
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 创建用户；邮箱重复返回 BadRequest
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// 更新邮箱和密码哈希；用户不存在返回 None
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError>;

    /// 标记为 Chirpy Red 会员；用户不存在返回 false
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, AppError>;

    /// 删除所有用户（级联删除 chirps 与刷新令牌）
    async fn delete_all(&self) -> Result<u64, AppError>;
}

/// Chirp 存储
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;

    /// 按 created_at 排序，可按作者过滤
    async fn list(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// 刷新令牌存储，按令牌摘要索引
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, token: &RefreshToken) -> Result<(), AppError>;

    async fn find(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError>;

    /// 原子撤销：revoked_at 仅在首次撤销时写入，重复撤销保留原时间戳。
    /// 令牌不存在返回 None。
    async fn revoke(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AppError>;
}

/// 所有存储的集合
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl Stores {
    /// PostgreSQL 实现
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            chirps: Arc::new(ChirpRepository::new(pool.clone())),
            refresh_tokens: Arc::new(RefreshTokenRepository::new(pool)),
        }
    }

    /// 进程内实现（测试使用）
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }
}

/// 唯一约束冲突（PostgreSQL 23505）
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
