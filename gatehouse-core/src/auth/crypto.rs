//! Password hashing with Argon2id.
//!
//! One-way salted hashing with a fixed work factor. Each call draws a fresh
//! salt from the OS RNG, so hashing the same plaintext twice yields
//! different PHC strings that both verify.

use argon2::{
    Algorithm, Argon2, ParamsBuilder, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;

/// Stateless Argon2id hasher with fixed parameters.
///
/// The parameters are a moderate work factor balancing brute-force
/// resistance against login latency; changing them does not invalidate
/// existing hashes since each PHC string carries its own parameters.
pub struct PasswordCrypto {
    argon2: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidParams(String),
    #[error("password hashing error: {0}")]
    Hash(String),
}

impl PasswordCrypto {
    const MEMORY_KIB: u32 = 19 * 1024;
    const ITERATIONS: u32 = 2;
    const PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = argon2::password_hash::Salt::RECOMMENDED_LENGTH;

    pub fn new() -> Result<Self, CryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Self::MEMORY_KIB)
            .t_cost(Self::ITERATIONS)
            .p_cost(Self::PARALLELISM)
            .output_len(32)
            .build()
            .map_err(|err| CryptoError::InvalidParams(err.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
        })
    }

    /// Hash a plaintext password with a fresh random salt. The returned PHC
    /// string is suitable for storage.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| CryptoError::Hash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CryptoError::Hash(err.to_string()))?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CryptoError::Hash(err.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// Comparison time depends on the hash parameters, not on where the
    /// inputs diverge. A malformed hash verifies as `false` rather than
    /// erroring.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(password_hash) else {
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl std::fmt::Debug for PasswordCrypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCrypto").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let crypto = PasswordCrypto::new().unwrap();
        let hash = crypto.hash("correct horse").unwrap();
        assert!(crypto.verify("correct horse", &hash));
        assert!(!crypto.verify("battery staple", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let crypto = PasswordCrypto::new().unwrap();
        let first = crypto.hash("secret1").unwrap();
        let second = crypto.hash("secret1").unwrap();
        assert_ne!(first, second);
        assert!(crypto.verify("secret1", &first));
        assert!(crypto.verify("secret1", &second));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        let crypto = PasswordCrypto::new().unwrap();
        assert!(!crypto.verify("anything", "not-a-phc-string"));
        assert!(!crypto.verify("anything", ""));
    }
}
