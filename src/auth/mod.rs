//! Authentication and authorization module

pub mod api_key;
pub mod extract;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh_token;

pub use api_key::ApiKeyVerifier;
pub use extract::{extract_api_key, extract_bearer};
pub use guard::AuthorizationGuard;
pub use jwt::{Claims, JwtService};
pub use middleware::{api_key_middleware, jwt_auth_middleware, AuthContext};
pub use password::PasswordHasher;

use thiserror::Error;

/// Failure kinds produced by the authentication subsystem.
///
/// Display strings name the failed check only; they never contain the
/// credential that was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authorization header absent, or carrying a different scheme
    #[error("authorization header missing")]
    MissingHeader,

    /// Authorization header present but unusable (empty value, repeated, not ASCII)
    #[error("authorization header malformed")]
    MalformedHeader,

    #[error("token malformed")]
    MalformedToken,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    /// Wrong email, wrong password or unusable stored hash
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authenticated caller does not own the resource
    #[error("caller does not own the resource")]
    Forbidden,
}
