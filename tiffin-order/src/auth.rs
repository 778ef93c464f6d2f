//! Password hashing and verification (bcrypt).

/// Work factor used for stored password hashes.
pub const DEFAULT_COST: u32 = 14;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[source] bcrypt::BcryptError),

    #[error("stored password hash is unreadable: {0}")]
    CorruptHash(#[source] bcrypt::BcryptError),

    #[error("hashing task did not complete: {0}")]
    Task(String),
}

/// Salted, adaptive-cost password hashing.
///
/// A wrong password is `Ok(false)`; only a stored hash that cannot be parsed is an error.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(AuthError::Hash)
    }

    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, stored_hash).map_err(AuthError::CorruptHash)
    }

    /// [`hash`](Self::hash) on the blocking pool; bcrypt at cost 14 takes around a second.
    pub async fn hash_password(self, password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_password(
        self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || self.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_verifies_and_is_not_plaintext() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("pw1").unwrap();

        assert_ne!(hash, "pw1");
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("pw1", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert_ne!(hasher.hash("pw1").unwrap(), hasher.hash("pw1").unwrap());
    }

    #[test]
    fn test_wrong_password_is_negative_not_error() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("pw1").unwrap();
        assert!(!hasher.verify("pw2", &hash).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        let hasher = PasswordHasher::new(TEST_COST);
        let result = hasher.verify("pw1", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::CorruptHash(_))));
    }

    #[test]
    fn test_hash_records_configured_cost() {
        let hash = PasswordHasher::new(TEST_COST).hash("pw1").unwrap();
        assert!(hash.starts_with("$2b$04$"));
    }

    #[test]
    fn test_default_cost_is_fourteen() {
        let hash = PasswordHasher::default().hash("pw1").unwrap();
        assert!(hash.starts_with("$2b$14$"));
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash_password("s3cret".to_string()).await.unwrap();
        assert!(hasher.verify_password("s3cret".to_string(), hash).await.unwrap());
    }
}
