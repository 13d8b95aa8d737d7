//! Caregiver PIN hashing
//!
//! PINs are stored as Argon2id PHC strings with a random salt.
//! Verification parses the stored string so parameters travel with the hash.

use crate::config::{MAX_PIN_LENGTH, MIN_PIN_LENGTH};
use crate::error::{AppError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;

const SALT_SIZE: usize = 16; // 128 bits

/// Check PIN shape before hashing
pub fn validate_pin(pin: &str) -> Result<()> {
    let len = pin.chars().count();
    if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&len) {
        return Err(AppError::Validation(format!(
            "PIN must be {}-{} characters",
            MIN_PIN_LENGTH, MAX_PIN_LENGTH
        )));
    }
    if pin.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "PIN must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Hash a caregiver PIN into a PHC string
pub fn hash_pin(pin: &str) -> Result<String> {
    validate_pin(pin)?;

    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let salt_string = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::Generic(format!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(pin.as_bytes(), &salt_string)
        .map_err(|e| AppError::Generic(format!("PIN hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a PIN against a stored PHC string
pub fn verify_pin(pin: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Generic(format!("Stored PIN hash is malformed: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_pin("2468").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_pin("2468", &hash).unwrap());
        assert!(!verify_pin("1357", &hash).unwrap());
    }

    #[test]
    fn test_different_salts() {
        let first = hash_pin("same-pin").unwrap();
        let second = hash_pin("same-pin").unwrap();

        assert_ne!(first, second);
        assert!(verify_pin("same-pin", &first).unwrap());
        assert!(verify_pin("same-pin", &second).unwrap());
    }

    #[test]
    fn test_pin_length_bounds() {
        assert!(hash_pin("123").is_err());
        assert!(hash_pin(&"9".repeat(MAX_PIN_LENGTH + 1)).is_err());
        assert!(hash_pin("12 34").is_err());
    }

    #[test]
    fn test_malformed_stored_hash() {
        assert!(verify_pin("2468", "not-a-phc-string").is_err());
    }
}
