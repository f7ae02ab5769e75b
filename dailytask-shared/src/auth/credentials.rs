/// Credential store
///
/// Registers accounts and checks login credentials on top of an injected
/// [`UserStore`]. Passwords are hashed with Argon2id on the blocking thread
/// pool; the plaintext never leaves this module.
///
/// Each operation returns a tagged error so callers can match every failure
/// mode. Login deliberately distinguishes an unknown user from a wrong
/// password here; it is up to the HTTP layer to collapse them.

use std::sync::Arc;

use super::password::{self, PasswordError};
use crate::models::user::{CreateUser, PublicUser, User, MAX_EMAIL_LEN, MAX_USERNAME_LEN};
use crate::store::{StoreError, UserStore};

/// Error type for registration
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// Input rejected before touching storage
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Username or email already taken
    #[error("Username or email already exists")]
    DuplicateIdentity,

    /// Password could not be hashed
    #[error(transparent)]
    Hashing(#[from] PasswordError),

    /// Storage failure
    #[error(transparent)]
    Storage(StoreError),
}

/// Error type for credential verification
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// No user with that username
    #[error("User not found")]
    NotFound,

    /// Password does not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored hash could not be checked
    #[error(transparent)]
    Hashing(#[from] PasswordError),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StoreError),
}

const DUMMY_PASSWORD: &str = "dailytask-dummy-password";

/// Account registration and login checks
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,

    /// Verified against when the username does not exist
    dummy_hash: Arc<str>,
}

impl CredentialStore {
    /// Creates a credential store over `users`
    ///
    /// Hashes a throwaway password once here, so every unknown-user login
    /// costs exactly one verification.
    pub fn new(users: Arc<dyn UserStore>) -> Result<Self, PasswordError> {
        let dummy_hash = password::hash_password(DUMMY_PASSWORD)?;

        Ok(Self {
            users,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Registers a new account
    ///
    /// Fails with [`RegisterError::DuplicateIdentity`] if the username or
    /// the email is already in use. Returns public fields only.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, RegisterError> {
        check_field("username", username, MAX_USERNAME_LEN)?;
        check_field("email", email, MAX_EMAIL_LEN)?;
        if password.is_empty() {
            return Err(RegisterError::Validation {
                field: "password",
                message: "password is required".to_string(),
            });
        }

        if self
            .users
            .find_by_username_or_email(username, email)
            .await
            .map_err(RegisterError::Storage)?
            .is_some()
        {
            tracing::info!(username = %username, "Registration rejected: identity taken");
            return Err(RegisterError::DuplicateIdentity);
        }

        let password_hash = hash_blocking(password.to_string()).await?;

        let user = self
            .users
            .create_user(CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                StoreError::UniqueViolation(_) => RegisterError::DuplicateIdentity,
                other => RegisterError::Storage(other),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        Ok(PublicUser::from(user))
    }

    /// Checks a username and password
    ///
    /// Returns the full user record on success. An unknown username still
    /// costs one hash verification.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, LoginError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            verify_blocking(password.to_string(), self.dummy_hash.to_string()).await?;
            return Err(LoginError::NotFound);
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(LoginError::InvalidCredentials);
        }

        Ok(user)
    }
}

fn check_field(field: &'static str, value: &str, max_len: usize) -> Result<(), RegisterError> {
    if value.trim().is_empty() {
        return Err(RegisterError::Validation {
            field,
            message: format!("{} is required", field),
        });
    }
    if value.chars().count() > max_len {
        return Err(RegisterError::Validation {
            field,
            message: format!("{} must be at most {} characters", field, max_len),
        });
    }
    Ok(())
}

async fn hash_blocking(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| PasswordError::HashError(format!("hashing task failed: {}", e)))?
}

async fn verify_blocking(plain: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("verification task failed: {}", e)))?
}
