/// Session tokens
///
/// Tokens are JWTs signed with HS256 and embed the user ID and an expiry.
/// Nothing is stored server-side: a token is valid exactly when its
/// signature checks out under the process secret and it has not expired.
/// There is no revocation list.
///
/// # Example
///
/// ```
/// use dailytask_shared::auth::jwt::TokenIssuer;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = TokenIssuer::with_default_ttl("a-secret-of-at-least-thirty-two-bytes");
/// let token = issuer.issue(42)?;
/// assert_eq!(issuer.verify(&token)?, 42);
/// # Ok(())
/// # }
/// ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every token
pub const ISSUER: &str = "dailytask";

/// Default token lifetime in hours
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Error type for token operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signing failed
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Not a structurally valid JWT
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Well-formed and signed, but rejected for another reason
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID in decimal
    pub sub: String,

    /// Issuer, always [`ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id`, issued now and valid for `ttl`
    pub fn new(user_id: i32, ttl: Duration) -> Result<Self, TokenError> {
        Self::issued_at(user_id, Utc::now(), ttl)
    }

    /// Claims for `user_id` issued at a given instant
    ///
    /// Fails with [`TokenError::Create`] if the expiry is not a
    /// representable timestamp.
    pub fn issued_at(
        user_id: i32,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Create(format!("lifetime {} overflows expiry", ttl)))?;

        Ok(Self {
            sub: user_id.to_string(),
            iss: ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<i32, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::Invalid(format!("subject '{}' is not a user id", self.sub)))
    }
}

/// Issues and verifies session tokens with one process-wide secret
///
/// Build it once at startup and clone it into whatever needs it; clones
/// share nothing mutable.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer signing with `secret`, tokens valid for `ttl`
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Creates an issuer with the 24 hour default lifetime
    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user_id` expiring one TTL from now
    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        self.sign(&Claims::new(user_id, self.ttl)?)
    }

    /// Signs arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Create(e.to_string()))
    }

    /// Verifies a token and returns its claims
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Verifies a token and returns the user ID it was issued for
    ///
    /// Pure: no storage lookup happens here.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.decode(token)?.user_id()
    }
}
