//! Per-request authentication and ownership checks

use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{extract::extract_bearer, jwt::JwtService, middleware::AuthContext, AuthError};

/// Turns a bearer access token into an [`AuthContext`] and checks resource ownership
#[derive(Clone)]
pub struct AuthorizationGuard {
    jwt: Arc<JwtService>,
}

impl AuthorizationGuard {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }

    /// Extract and validate the access token
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let token = extract_bearer(headers)?;
        let user_id = self.jwt.validate(&token)?;

        Ok(AuthContext { user_id })
    }

    /// Caller must own the resource
    pub fn authorize_owner(context: &AuthContext, owner_id: Uuid) -> Result<(), AuthError> {
        if context.user_id == owner_id {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %context.user_id,
                owner_id = %owner_id,
                "Ownership check failed"
            );
            Err(AuthError::Forbidden)
        }
    }
}
