/// Password hashing with Argon2id
///
/// Hashes are PHC strings carrying the algorithm, parameters and a random
/// 16-byte salt, so verification needs nothing but the stored string.
///
/// # Parameters
///
/// - Memory: 19 MiB (19456 KiB)
/// - Iterations: 2
/// - Parallelism: 1
///
/// This is the OWASP minimum for Argon2id, in the same cost range as
/// bcrypt with 10 rounds.
///
/// These functions are CPU-bound. Async callers should run them on the
/// blocking pool (see [`crate::auth::credentials`]).
///
/// # Example
///
/// ```
/// use dailytask_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("pw123")?;
/// assert!(verify_password("pw123", &hash)?);
/// assert!(!verify_password("pw124", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params: Params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .output_len(OUTPUT_LEN)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// Hashing the same password twice yields two different strings.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password. The comparison of the derived
/// key is constant-time.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    // Parameters are read from the PHC string, not from the constants above.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hash = hash_password("pw123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
        assert!(!hash.contains("pw123"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same_password").unwrap();
        let second = hash_password("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("pw123").unwrap();
        assert!(verify_password("pw123", &hash).unwrap());
    }

    #[test]
    fn test_single_character_change_fails() {
        let password = "pw123";
        let hash = hash_password(password).unwrap();

        for (i, c) in password.char_indices() {
            let replacement = if c == 'x' { 'y' } else { 'x' };
            let mut altered = password.to_string();
            altered.replace_range(i..i + c.len_utf8(), &replacement.to_string());

            assert!(
                !verify_password(&altered, &hash).unwrap(),
                "altered password '{}' should not verify",
                altered
            );
        }
    }

    #[test]
    fn test_verify_empty_password() {
        let hash = hash_password("password").unwrap();
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(matches!(
            verify_password("password", "not-a-hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_unicode_password_roundtrip() {
        let hash = hash_password("密码-パスワード").unwrap();
        assert!(verify_password("密码-パスワード", &hash).unwrap());
    }
}
