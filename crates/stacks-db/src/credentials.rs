//! Credential hashing. Stored values are argon2 PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::{DbError, DbResult};

/// Hash a credential for storage.
pub fn hash_credential(credential: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(credential.as_bytes(), &salt)
        .map_err(|e| DbError::Credential(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a credential against a stored hash. A malformed hash never verifies.
pub fn verify_credential(credential: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(credential.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_credential("open sesame").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_credential("open sesame", &hash));
        assert!(!verify_credential("open says me", &hash));
    }

    #[test]
    fn test_same_credential_gets_distinct_salts() {
        let a = hash_credential("pw").unwrap();
        let b = hash_credential("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_credential("pw", "not-a-phc-string"));
    }
}
