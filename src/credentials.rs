//! Credential hashing capability.
//!
//! The engine never stores plaintext passwords and never inspects hashes
//! itself; it consumes this capability the way it consumes the graph store.
//! [`BcryptHasher`] is the production implementation. [`PlainHasher`] exists
//! for tests and local development, where bcrypt's work factor would only
//! slow things down.

use thiserror::Error;

/// Errors from credential hashing.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Opaque hash/verify capability over plaintext credentials.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Check a plaintext password against a stored hash. Any internal
    /// failure reads as a mismatch; callers cannot distinguish "bad hash on
    /// record" from "wrong password".
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Bcrypt-backed hasher, the default for real deployments.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the bcrypt default cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

/// Reversible marker "hasher" for tests. Stores the password with a fixed
/// prefix so assertions stay readable. Never use outside tests or demos.
#[derive(Debug, Clone, Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_hasher_round_trip() {
        let hasher = PlainHasher;
        let hash = hasher.hash("dougspw").unwrap();
        assert!(hasher.verify("dougspw", &hash));
        assert!(!hasher.verify("bobspw", &hash));
    }

    #[test]
    fn test_plain_hasher_rejects_foreign_hash() {
        let hasher = PlainHasher;
        assert!(!hasher.verify("anything", "$2b$12$notaplainhash"));
    }

    #[test]
    fn test_bcrypt_round_trip() {
        // Minimum cost keeps this test quick.
        let hasher = BcryptHasher::with_cost(4);
        let hash = hasher.hash("hunter22").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("hunter22", &hash));
        assert!(!hasher.verify("hunter23", &hash));
    }
}
