//! 认证服务：登录、令牌刷新、撤销

use std::sync::Arc;

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::{auth::*, user::*},
    repository::UserStore,
    services::RefreshTokenService,
};

pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<RefreshTokenService>,
    jwt_service: Arc<JwtService>,
    hasher: Arc<PasswordHasher>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<RefreshTokenService>,
        jwt_service: Arc<JwtService>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt_service,
            hasher,
        }
    }

    /// 用户登录
    ///
    /// 邮箱不存在与密码错误返回同一个错误
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user: User = match self.users.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected: unknown email");
                // 与密码错误路径耗时一致
                return Err(self.hasher.reject_async(&req.password).await);
            }
        };

        // 验证密码
        if let Err(e) = self
            .hasher
            .verify_async(&req.password, &user.hashed_password)
            .await
        {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(e);
        }

        // 生成令牌
        let token = self.jwt_service.issue_access_token(user.id)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            user: UserResponse::from(user),
            token,
            refresh_token: refresh_token.token,
        })
    }

    /// 用刷新令牌换取新的访问令牌
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let record = match self.refresh_tokens.lookup(refresh_token).await {
            Ok(record) => record,
            Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        if !self.refresh_tokens.is_valid(&record) {
            tracing::debug!(user_id = %record.user_id, "Refresh rejected: token revoked or expired");
            return Err(AppError::Unauthorized);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let token = self.jwt_service.issue_access_token(user.id)?;

        Ok(TokenResponse { token })
    }

    /// 撤销刷新令牌（幂等）
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        match self.refresh_tokens.revoke(refresh_token).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}
