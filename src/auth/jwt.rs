//! JWT access token issuing and validation
//!
//! Access tokens are stateless HS256 JWTs. They carry no server-side record,
//! so they cannot be revoked before `exp`; the lifetime is kept short.

use crate::{auth::AuthError, config::AppConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim written into every access token
pub const ISSUER: &str = "chirpy";

/// Access token lifetime (1 hour)
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Minimum HMAC key length for HS256
const MIN_SECRET_LEN: usize = 32;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (user ID)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create JWT service from a raw signing secret
    pub fn new(secret: &[u8]) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        // Expiry is checked by `validate` itself so it can be reported before the MAC.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(config.security.jwt_secret.expose_secret().as_bytes())
    }

    /// Issue a token for `user_id` that expires `ttl` from now
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::internal_error("Failed to encode access token")
        })
    }

    /// Issue a token with the standard one-hour lifetime
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue(user_id, Duration::seconds(ACCESS_TOKEN_TTL_SECS))
    }

    /// Validate a token and return its subject.
    ///
    /// Checks run in a fixed order: structure, expiry, signature, issuer and
    /// subject. An expired token reports [`AuthError::Expired`] whether or not
    /// its signature is intact.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let unverified = Self::read_claims(token)?;
        if Utc::now().timestamp() >= unverified.exp {
            return Err(AuthError::Expired);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::MalformedToken,
            })?
            .claims;

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedToken)
    }

    /// Decode claims without checking the MAC
    fn read_claims(token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::MalformedToken)
    }
}
