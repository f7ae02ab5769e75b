/// Authorization gate for Axum
///
/// Every task route sits behind this gate. It reads the
/// `Authorization: Bearer <token>` header, verifies the token and attaches
/// the caller's identity to the request as an [`AuthContext`] extension.
/// Anything else is rejected with 401 before the handler runs.
///
/// The client never learns why a token was rejected: malformed, expired and
/// forged tokens all produce the same response. The detail is logged at
/// debug level.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use dailytask_shared::auth::jwt::TokenIssuer;
/// use dailytask_shared::auth::middleware::{require_auth, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
///
/// let issuer = TokenIssuer::with_default_ttl("a-secret-of-at-least-thirty-two-bytes");
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(issuer, require_auth));
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{TokenError, TokenIssuer};

/// Identity of the caller, added to request extensions by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Verified user ID
    pub user_id: i32,
}

/// Error type for the authorization gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// No `Authorization` header
    #[error("No token provided")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid token format")]
    MalformedHeader,

    /// Token failed verification
    #[error("Invalid or expired token")]
    InvalidToken(#[source] TokenError),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts and verifies the bearer token from request headers
pub fn authorize(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<AuthContext, GateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateError::MissingCredentials)?;

    let value = value.to_str().map_err(|_| GateError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(GateError::MalformedHeader)?;

    let user_id = issuer.verify(token).map_err(GateError::InvalidToken)?;

    Ok(AuthContext { user_id })
}

/// Middleware wrapping [`authorize`]
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_auth(
    State(issuer): State<TokenIssuer>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let context = authorize(req.headers(), &issuer).map_err(|e| {
        tracing::debug!(
            error = %e,
            detail = ?e,
            path = %req.uri().path(),
            "Request rejected by authorization gate"
        );
        e
    })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn issuer() -> TokenIssuer {
        TokenIssuer::with_default_ttl("test-secret-key-at-least-32-bytes-long")
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_token() {
        let issuer = issuer();
        let token = issuer.issue(12).unwrap();

        let context = authorize(&headers_with(&format!("Bearer {}", token)), &issuer).unwrap();
        assert_eq!(context, AuthContext { user_id: 12 });
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authorize(&HeaderMap::new(), &issuer()),
            Err(GateError::MissingCredentials)
        );
    }

    #[test]
    fn test_missing_token_after_scheme() {
        let issuer = issuer();

        assert_eq!(authorize(&headers_with("Bearer"), &issuer), Err(GateError::MalformedHeader));
        assert_eq!(authorize(&headers_with("Bearer "), &issuer), Err(GateError::MalformedHeader));
    }

    #[test]
    fn test_other_scheme_is_malformed() {
        let issuer = issuer();
        let token = issuer.issue(1).unwrap();

        assert_eq!(
            authorize(&headers_with(&format!("Basic {}", token)), &issuer),
            Err(GateError::MalformedHeader)
        );
        assert_eq!(authorize(&headers_with(&token), &issuer), Err(GateError::MalformedHeader));
    }

    #[test]
    fn test_bad_tokens_are_invalid() {
        let issuer = issuer();
        let foreign = TokenIssuer::with_default_ttl("another-secret-key-at-least-32-bytes")
            .issue(1)
            .unwrap();

        assert_eq!(
            authorize(&headers_with("Bearer garbage"), &issuer),
            Err(GateError::InvalidToken(TokenError::Malformed))
        );
        assert_eq!(
            authorize(&headers_with(&format!("Bearer {}", foreign)), &issuer),
            Err(GateError::InvalidToken(TokenError::InvalidSignature))
        );
    }

    #[test]
    fn test_every_rejection_is_401() {
        for err in [
            GateError::MissingCredentials,
            GateError::MalformedHeader,
            GateError::InvalidToken(TokenError::Expired),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_token_detail_not_in_message() {
        let err = GateError::InvalidToken(TokenError::InvalidSignature);
        assert_eq!(err.to_string(), "Invalid or expired token");
    }
}
