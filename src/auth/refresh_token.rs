//! Opaque refresh token generation

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Refresh token lifetime (60 days)
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Raw token size before hex encoding (256 bits)
const TOKEN_BYTES: usize = 32;

/// Generate a refresh token: 32 bytes from the OS RNG, hex-encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a refresh token, hex-encoded. Only the digest is persisted.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
