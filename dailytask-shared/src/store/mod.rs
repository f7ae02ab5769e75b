/// Storage abstraction
///
/// Services never talk to a database handle directly. They receive a store
/// implementing the traits below at construction time, which lets the API
/// run against PostgreSQL in production and against [`MemoryStore`] in tests.
///
/// # Implementations
///
/// - [`PgStore`]: PostgreSQL via a sqlx connection pool
/// - [`MemoryStore`]: in-process store with the same contracts
///
/// # Contracts
///
/// - Username and email are each unique; violations surface as
///   [`StoreError::UniqueViolation`].
/// - Task reads and writes are scoped by owner. `update_task` and
///   `delete_task` return `None` both when the task does not exist and when
///   it belongs to another user.
/// - `list_tasks` orders by creation time, newest first.

use async_trait::async_trait;

use crate::models::task::{CreateTask, Task, TaskPatch};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }

        StoreError::Database(err)
    }
}

/// Persistence of user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Finds any user holding the username or the email
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Inserts a new user
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;
}

/// Persistence of tasks, always scoped to an owner
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `user_id`, newest first
    async fn list_tasks(&self, user_id: i32) -> Result<Vec<Task>, StoreError>;

    /// Inserts a new task
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Merges `patch` into the task if `user_id` owns it
    async fn update_task(
        &self,
        user_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError>;

    /// Deletes the task if `user_id` owns it, returning the removed record
    async fn delete_task(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, StoreError>;
}

/// A complete backing store for the application
#[async_trait]
pub trait Storage: UserStore + TaskStore {
    /// Checks that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
