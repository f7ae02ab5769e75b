/// API route handlers
///
/// - `health`: welcome message and health check
/// - `auth`: registration and login
/// - `tasks`: task CRUD for the authenticated user

pub mod auth;
pub mod health;
pub mod tasks;
