//! Business logic services layer

pub mod auth_service;
pub mod refresh_token_service;

pub use auth_service::AuthService;
pub use refresh_token_service::{IssuedRefreshToken, RefreshTokenService};
