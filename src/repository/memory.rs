//! 进程内存储
//! 基于 DashMap，行为与 PostgreSQL 实现一致（唯一邮箱、级联删除、原子撤销）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, UserStore};
use crate::{
    error::AppError,
    models::{
        chirp::{Chirp, SortOrder},
        refresh_token::RefreshToken,
        user::User,
    },
};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    // email -> user id
    emails: DashMap<String, Uuid>,
    // 插入序号用于同一时间戳内的稳定排序
    chirps: DashMap<Uuid, (u64, Chirp)>,
    chirp_seq: AtomicU64,
    refresh_tokens: DashMap<String, RefreshToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken() -> AppError {
        AppError::BadRequest("Email already registered".to_string())
    }

    fn ensure_user(&self, id: Uuid) -> Result<(), AppError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found("user"))
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let id = Uuid::new_v4();

        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(Self::email_taken()),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(current_email) = self.users.get(&id).map(|u| u.email.clone()) else {
            return Ok(None);
        };

        if current_email != email {
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(Self::email_taken()),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove(&current_email);
        }

        let updated = self.users.get_mut(&id).map(|mut user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        });

        Ok(updated)
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .users
            .get_mut(&id)
            .map(|mut user| {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let count = self.users.len() as u64;

        self.users.clear();
        self.emails.clear();
        self.chirps.clear();
        self.refresh_tokens.clear();

        Ok(count)
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError> {
        self.ensure_user(user_id)?;

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        let seq = self.chirp_seq.fetch_add(1, Ordering::Relaxed);
        self.chirps.insert(chirp.id, (seq, chirp.clone()));

        Ok(chirp)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        Ok(self.chirps.get(&id).map(|entry| entry.1.clone()))
    }

    async fn list(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, AppError> {
        let mut chirps: Vec<(u64, Chirp)> = self
            .chirps
            .iter()
            .filter(|entry| author_id.map_or(true, |author| entry.1.user_id == author))
            .map(|entry| entry.value().clone())
            .collect();

        chirps.sort_by_key(|(seq, chirp)| (chirp.created_at, *seq));
        if sort == SortOrder::Desc {
            chirps.reverse();
        }

        Ok(chirps.into_iter().map(|(_, chirp)| chirp).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.chirps.remove(&id).is_some())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert(&self, token: &RefreshToken) -> Result<(), AppError> {
        self.ensure_user(token.user_id)?;

        match self.refresh_tokens.entry(token.token_hash.clone()) {
            Entry::Occupied(_) => Err(AppError::internal_error("Duplicate refresh token")),
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        Ok(self.refresh_tokens.get(token_hash).map(|t| t.clone()))
    }

    async fn revoke(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AppError> {
        // get_mut 持有分片写锁，检查与写入在同一临界区内完成
        Ok(self.refresh_tokens.get_mut(token_hash).map(|mut record| {
            if record.revoked_at.is_none() {
                record.revoked_at = Some(at);
            }
            record.updated_at = at;
            record.clone()
        }))
    }
}
