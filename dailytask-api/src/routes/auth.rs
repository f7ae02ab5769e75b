/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a session token

use axum::{extract::State, http::StatusCode, Json};
use dailytask_shared::models::user::PublicUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiJson, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1 to 50 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Email must be 1 to 100 characters"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,

    /// Bearer token for the task endpoints
    pub token: String,

    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "email": "a@x.com", "password": "pw123" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "User registered successfully",
///   "user": { "id": 1, "username": "alice", "email": "a@x.com" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field or username/email taken
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let user = state
        .credentials
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// Login with username and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field
/// - `401 Unauthorized`: unknown user or wrong password (same message for both)
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = state
        .credentials
        .verify_credentials(&req.username, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %req.username, reason = %e, "Login failed");
            e
        })?;

    let token = state.tokens.issue(user.id)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from(user),
    }))
}
