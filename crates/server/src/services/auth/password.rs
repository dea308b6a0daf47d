//! Password hashing with scrypt.
//!
//! Stored credentials use the `"<derivedHexKey>.<saltHex>"` encoding: a fresh
//! 128-bit salt per hash, hex-encoded, with a 64-byte scrypt-derived key.
//! Verification re-derives the key with the stored salt and compares the two
//! buffers in constant time. A malformed stored value verifies false - it
//! never grants access and never panics.

use rand::RngCore;
use scrypt::Params;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Salt length in bytes (128 bits, 32 hex chars on the wire).
const SALT_LEN: usize = 16;

/// Derived key length in bytes.
const KEY_LEN: usize = 64;

/// scrypt cost parameters: N = 2^14, r = 8, p = 1.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Key derivation failed.
#[derive(Debug, Error)]
#[error("password hashing error")]
pub struct PasswordHashError;

fn scrypt_params() -> Result<Params, PasswordHashError> {
    Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN).map_err(|_| PasswordHashError)
}

fn derive_key(password: &str, salt_hex: &str) -> Result<[u8; KEY_LEN], PasswordHashError> {
    let mut key = [0u8; KEY_LEN];
    // The hex string itself is the KDF salt input, matching the stored encoding.
    scrypt::scrypt(
        password.as_bytes(),
        salt_hex.as_bytes(),
        &scrypt_params()?,
        &mut key,
    )
    .map_err(|_| PasswordHashError)?;
    Ok(key)
}

/// Hash a password with a fresh random salt.
///
/// Two calls with the same password return different strings, both of which
/// verify against it.
///
/// # Errors
///
/// Returns [`PasswordHashError`] if key derivation fails.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);

    let key = derive_key(password, &salt_hex)?;
    Ok(format!("{}.{salt_hex}", hex::encode(key)))
}

/// Verify a supplied password against a stored `"<hash>.<salt>"` value.
///
/// Comparison is timing-safe: the full derived buffer is always compared,
/// never short-circuited on the first mismatching byte.
///
/// # Errors
///
/// Returns [`PasswordHashError`] only if key derivation itself fails; a
/// malformed stored value yields `Ok(false)`.
pub fn verify_password(supplied: &str, stored: &str) -> Result<bool, PasswordHashError> {
    let Some((key_hex, salt_hex)) = stored.split_once('.') else {
        return Ok(false);
    };

    let Ok(expected) = hex::decode(key_hex) else {
        return Ok(false);
    };
    if expected.len() != KEY_LEN {
        return Ok(false);
    }

    let derived = derive_key(supplied, salt_hex)?;
    Ok(bool::from(expected.as_slice().ct_eq(&derived)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(verify_password("Secret123!", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(!verify_password("secret123!", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_salt_randomization() {
        let first = hash_password("Secret123!").unwrap();
        let second = hash_password("Secret123!").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("Secret123!", &first).unwrap());
        assert!(verify_password("Secret123!", &second).unwrap());
    }

    #[test]
    fn test_encoding_shape() {
        let hash = hash_password("Secret123!").unwrap();
        let (key_hex, salt_hex) = hash.split_once('.').unwrap();
        assert_eq!(key_hex.len(), KEY_LEN * 2);
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() || c == '.'));
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        // No separator
        assert!(!verify_password("anything", "deadbeef").unwrap());
        // Empty value
        assert!(!verify_password("anything", "").unwrap());
        // Non-hex key part
        assert!(!verify_password("anything", "not-hex.0123456789abcdef").unwrap());
        // Key part of the wrong length
        assert!(!verify_password("anything", "deadbeef.0123456789abcdef").unwrap());
    }
}
