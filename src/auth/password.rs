//! Password hashing and verification using Argon2id

use crate::{auth::AuthError, config::SecurityConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with the argon2 crate's default cost
    /// (m=19MiB, t=2, p=1, the OWASP minimum for Argon2id)
    pub fn new() -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());

        Self { argon2 }
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::internal_error("Failed to hash password")
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// An unparseable hash and a wrong password produce the same
    /// [`AuthError::InvalidCredentials`].
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| {
            tracing::warn!("Stored password hash could not be parsed");
            AuthError::InvalidCredentials
        })?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|e| {
                if !matches!(e, password_hash::Error::Password) {
                    tracing::warn!("Password verification failed unexpectedly: {}", e);
                }
                AuthError::InvalidCredentials
            })
    }

    /// Spend the same Argon2 work as [`Self::verify`] when there is no stored
    /// hash to check against, then fail with [`AuthError::InvalidCredentials`].
    pub fn reject(&self, password: &str) -> AuthError {
        let salt = SaltString::generate(&mut OsRng);
        if let Err(e) = self.argon2.hash_password(password.as_bytes(), &salt) {
            tracing::warn!("Dummy password hash failed: {}", e);
        }
        AuthError::InvalidCredentials
    }

    /// [`Self::hash`] on the blocking thread pool
    pub async fn hash_async(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(join_error)?
    }

    /// [`Self::verify`] on the blocking thread pool
    pub async fn verify_async(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(join_error)?
            .map_err(AppError::from)
    }

    /// [`Self::reject`] on the blocking thread pool
    pub async fn reject_async(&self, password: &str) -> AppError {
        let hasher = self.clone();
        let password = password.to_owned();
        match tokio::task::spawn_blocking(move || hasher.reject(&password)).await {
            Ok(e) => e.into(),
            Err(e) => join_error(e),
        }
    }

    /// Validate password against policy
    pub fn validate_password_policy(
        password: &str,
        policy: &SecurityConfig,
    ) -> Result<(), AppError> {
        if password.chars().count() < policy.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                policy.password_min_length
            )));
        }

        Ok(())
    }
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    tracing::error!("Password hashing task failed: {}", e);
    AppError::internal_error("Password hashing task failed")
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "secret123";

        let hash = hasher.hash(password).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        hasher.verify(password, &hash).unwrap();
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("secret123").unwrap();
        assert_eq!(
            hasher.verify("secret124", &hash),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_malformed_hash_is_indistinguishable_from_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("secret123").unwrap();

        let wrong_password = hasher.verify("nope", &hash);
        let malformed_hash = hasher.verify("secret123", "not-a-phc-string");

        assert_eq!(wrong_password, malformed_hash);
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = PasswordHasher::new();
        let password = "secret123";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        assert_ne!(hash1, hash2);

        hasher.verify(password, &hash1).unwrap();
        hasher.verify(password, &hash2).unwrap();
    }

    #[test]
    fn test_reject_matches_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("secret123").unwrap();

        assert_eq!(hasher.reject("secret123"), AuthError::InvalidCredentials);
        assert_eq!(hasher.verify("nope", &hash), Err(hasher.reject("nope")));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash_async("secret123").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        hasher.verify_async("secret123", &hash).await.unwrap();

        let err = hasher.verify_async("secret124", &hash).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));

        let err = hasher.reject_async("secret123").await;
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_password_policy_validation() {
        let policy = SecurityConfig {
            jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
            polka_key: Secret::new("polka".to_string()),
            password_min_length: 8,
        };

        assert!(PasswordHasher::validate_password_policy("secret123", &policy).is_ok());
        assert!(PasswordHasher::validate_password_policy("short", &policy).is_err());
    }
}
