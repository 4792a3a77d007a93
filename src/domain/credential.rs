//! Admin credentials and argon2id password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use uuid::Uuid;

/// A stored admin account. The password is held only as a PHC hash string.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Normalized (trimmed, lower-case) email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Failure to produce or parse a password hash.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Argon2id hasher with fixed cost parameters.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Creates a hasher with the given memory cost (KiB) and iteration count.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if argon2 rejects the parameters.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, HashError> {
        let params =
            Params::new(memory_kib, iterations, 1, None).map_err(|e| HashError(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    /// Checks `password` against a stored PHC string.
    ///
    /// A malformed stored hash never verifies.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("stored password hash is malformed");
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn light() -> CredentialHasher {
        let Ok(hasher) = CredentialHasher::new(1024, 1) else {
            panic!("valid params");
        };
        hasher
    }

    #[test]
    fn hash_then_verify() {
        let hasher = light();
        let Ok(hash) = hasher.hash("s3cret!") else {
            panic!("hashing failed");
        };
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("s3cret!", &hash));
        assert!(!hasher.verify("s3cret?", &hash));
    }

    #[test]
    fn salts_differ_per_hash() {
        let hasher = light();
        let (Ok(a), Ok(b)) = (hasher.hash("same"), hasher.hash("same")) else {
            panic!("hashing failed");
        };
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!light().verify("anything", "plaintext"));
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(CredentialHasher::new(1, 0).is_err());
    }

    #[test]
    fn debug_hides_hash() {
        let cred = AdminCredential {
            id: Uuid::nil(),
            email: "admin@event.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };
        assert!(!format!("{cred:?}").contains("secret"));
    }
}
