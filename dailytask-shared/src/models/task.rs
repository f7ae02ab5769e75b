/// Task model and database operations
///
/// Every task has exactly one owner. All queries in this module that read or
/// mutate an existing task are scoped by `id AND user_id`, so a task owned
/// by someone else behaves exactly like a task that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use dailytask_shared::models::task::{Task, CreateTask, TaskPatch, Patch};
/// use dailytask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: 1,
///     title: "buy milk".to_string(),
///     description: String::new(),
/// }).await?;
///
/// let patch = TaskPatch { completed: Patch::Set(true), ..Default::default() };
/// Task::update_for_user(&pool, 1, task.id, patch).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;

/// Maximum title length (matches the column width)
pub const MAX_TITLE_LEN: usize = 255;

/// Task owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Short title, never empty
    pub title: String,

    /// Free-form description, empty when not provided
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: i32,
    pub title: String,
    pub description: String,
}

/// A single field of a partial update
///
/// `Unset` leaves the stored value alone, `Set` overwrites it. When
/// deserialized, an absent key and an explicit `null` are both `Unset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    /// Borrows the new value, if any
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// Converts into an `Option`, `None` meaning "keep the stored value"
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// Drops the new value unless it satisfies `keep`
    pub fn filter(self, keep: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Patch::Set(value) if keep(&value) => Patch::Set(value),
            _ => Patch::Unset,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Unset,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Partial update of a task
///
/// Only fields that are `Set` overwrite the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Patch<String>,

    #[serde(default)]
    pub description: Patch<String>,

    #[serde(default)]
    pub completed: Patch<bool>,
}

impl TaskPatch {
    /// Applies the patch to an in-memory record
    pub fn apply_to(self, task: &mut Task) {
        if let Patch::Set(title) = self.title {
            task.title = title;
        }
        if let Patch::Set(description) = self.description {
            task.description = description;
        }
        if let Patch::Set(completed) = self.completed {
            task.completed = completed;
        }
    }
}

impl Task {
    /// Inserts a new, not yet completed task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, completed, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task owned by `user_id`, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, completed, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Merges `patch` into the task, in one statement
    ///
    /// Returns `None` if no task with `id` is owned by `user_id`.
    pub async fn update_for_user(
        pool: &PgPool,
        user_id: i32,
        id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                completed = COALESCE($5, completed)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, completed, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title.into_option())
        .bind(patch.description.into_option())
        .bind(patch.completed.into_option())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes the task and returns it
    ///
    /// Returns `None` if no task with `id` is owned by `user_id`.
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: i32,
        id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, completed, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
