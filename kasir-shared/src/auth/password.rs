/// Password hashing module using Argon2id
///
/// Every password hash written by the kasir tooling is an Argon2id PHC
/// string with a fixed work factor:
///
/// - **Memory**: 64 MiB (65536 KiB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash, 16-byte random salt
///
/// Verification reads the parameters back out of the stored PHC string, so
/// raising the work factor later does not invalidate existing hashes.
///
/// # Example
///
/// ```
/// use kasir_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("admin123")?;
///
/// assert!(verify_password("admin123", &hash)?);
/// assert!(!verify_password("kasir123", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Argon2 memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 65536;

/// Argon2 time cost (passes over memory)
pub const TIME_COST: u32 = 3;

/// Argon2 parallelism (lanes)
pub const PARALLELISM: u32 = 4;

/// Length of the derived hash in bytes
pub const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with the fixed work factor
///
/// Returns a PHC string, for example:
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .output_len(OUTPUT_LEN)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// The comparison is constant-time.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// - `PasswordError::InvalidHash` if `hash` is not a PHC string this module
///   can read (for example a bcrypt hash left by an older installation)
/// - `PasswordError::VerifyError` for any other verifier failure
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    if !parsed_hash.algorithm.as_str().starts_with("argon2") {
        return Err(PasswordError::InvalidHash(format!(
            "Unsupported algorithm: {}",
            parsed_hash.algorithm
        )));
    }

    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash(
            "Missing salt or hash output".to_string(),
        ));
    }

    // Parameters come from the PHC string
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Names the scheme a stored hash appears to use
///
/// Only looks at the prefix; it does not validate the hash. Used for
/// diagnostics when [`verify_password`] rejects a hash as unreadable.
///
/// ```
/// use kasir_shared::auth::password::hash_scheme;
///
/// assert_eq!(hash_scheme("$2a$10$abcdefghijklmnopqrstuv"), "bcrypt");
/// assert_eq!(hash_scheme("admin123"), "unknown");
/// ```
pub fn hash_scheme(hash: &str) -> &'static str {
    if hash.starts_with("$argon2id$") {
        "argon2id"
    } else if hash.starts_with("$argon2i$") || hash.starts_with("$argon2d$") {
        "argon2"
    } else if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
        "bcrypt"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_uses_fixed_work_factor() {
        let hash = hash_password("admin123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("kasir123").expect("Hash 1 should succeed");
        let hash2 = hash_password("kasir123").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("admin123").expect("Hash should succeed");

        let result = verify_password("admin123", &hash).expect("Verify should succeed");
        assert!(result, "Correct password should verify");
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("admin123").expect("Hash should succeed");

        let result = verify_password("kasir123", &hash).expect("Verify should succeed");
        assert!(!result, "Wrong password should not verify");

        let result = verify_password("", &hash).expect("Verify should succeed");
        assert!(!result, "Empty password should not verify");
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("admin123", "admin123");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        let result = verify_password("admin123", "$argon2id$invalid");
        assert!(result.is_err(), "Malformed hash should return error");
    }

    #[test]
    fn test_verify_password_bcrypt_is_unreadable() {
        let bcrypt = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
        let result = verify_password("admin123", bcrypt);
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
        assert_eq!(hash_scheme(bcrypt), "bcrypt");
    }
}
