/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: session token issuing and verification
/// - [`credentials`]: registration and login checks over a user store
/// - [`middleware`]: the authorization gate in front of task routes
///
/// # Example
///
/// ```
/// use dailytask_shared::auth::jwt::TokenIssuer;
/// use dailytask_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("pw123")?;
/// assert!(verify_password("pw123", &hash)?);
///
/// let issuer = TokenIssuer::with_default_ttl("a-secret-of-at-least-thirty-two-bytes");
/// let token = issuer.issue(1)?;
/// assert_eq!(issuer.verify(&token)?, 1);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod password;
