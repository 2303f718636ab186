//! Static API key verification for the payment provider webhook

use sha2::{Digest, Sha256};

/// Verifier holding the digest of the configured key
pub struct ApiKeyVerifier {
    expected: [u8; 32],
}

impl ApiKeyVerifier {
    pub fn new(key: &str) -> Self {
        Self {
            expected: Self::digest(key),
        }
    }

    /// Compare a presented key with the configured one.
    ///
    /// Both sides are hashed first so the comparison runs over fixed-length
    /// digests and does not leak the key length.
    pub fn verify(&self, presented: &str) -> bool {
        let presented = Self::digest(presented);

        self.expected
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    fn digest(key: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hasher.finalize().into()
    }
}
