//! Password hashing and verification (bcrypt).

use bcrypt::{hash, verify};

use crate::errors::AppError;

#[cfg(not(feature = "test-utils"))]
const COST: u32 = bcrypt::DEFAULT_COST;

#[cfg(feature = "test-utils")]
const COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("password123").unwrap();
        assert_ne!(hashed, "password123");
        assert!(verify_password("password123", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("password123", "not-a-hash").is_err());
    }
}
