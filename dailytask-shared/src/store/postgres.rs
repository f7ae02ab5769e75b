/// PostgreSQL implementation of the storage traits
///
/// Every method is a single parameter-bound statement. sqlx checks a
/// connection out of the pool for the statement and returns it when the
/// future completes or is dropped, on success and error alike.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Storage, StoreError, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::task::{CreateTask, Task, TaskPatch};
use crate::models::user::{CreateUser, User};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username_or_email(&self.pool, username, email).await?)
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, user_id: i32) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_user(&self.pool, user_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(
        &self,
        user_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update_for_user(&self.pool, user_id, task_id, patch).await?)
    }

    async fn delete_task(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, StoreError> {
        Ok(Task::delete_for_user(&self.pool, user_id, task_id).await?)
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
