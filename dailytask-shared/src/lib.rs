//! # Daily Task Manager Shared Library
//!
//! Domain types and business logic behind the Daily Task Manager API.
//!
//! ## Module Organization
//!
//! - `models`: users and tasks, with their PostgreSQL queries
//! - `store`: storage traits with PostgreSQL and in-memory implementations
//! - `auth`: password hashing, session tokens, credential checks, the authorization gate
//! - `tasks`: owner-scoped task operations
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
