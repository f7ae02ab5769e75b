/// Task repository
///
/// CRUD on tasks for an already-authenticated user. Every call takes the
/// caller's user ID and every store call is scoped by it, so there is no
/// path that reads or writes another user's task. A task that exists but
/// belongs to someone else yields [`TaskError::NotFoundOrForbidden`], the
/// same as a task that does not exist.

use std::sync::Arc;

use crate::models::task::{CreateTask, Task, TaskPatch, MAX_TITLE_LEN};
use crate::store::{StoreError, TaskStore};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Input rejected before touching storage
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// No task with that ID is owned by the caller
    #[error("Task not found or unauthorized")]
    NotFoundOrForbidden,

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Owner-scoped task operations over an injected [`TaskStore`]
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    /// Creates a repository over `store`
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// All tasks owned by `user_id`, newest first
    pub async fn list(&self, user_id: i32) -> Result<Vec<Task>, TaskError> {
        Ok(self.store.list_tasks(user_id).await?)
    }

    /// Creates a task; `description` defaults to empty
    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        description: Option<String>,
    ) -> Result<Task, TaskError> {
        if title.trim().is_empty() {
            return Err(TaskError::Validation {
                field: "title",
                message: "Title is required".to_string(),
            });
        }
        check_title_len(title)?;

        let task = self
            .store
            .create_task(CreateTask {
                user_id,
                title: title.to_string(),
                description: description.unwrap_or_default(),
            })
            .await?;

        tracing::info!(user_id, task_id = task.id, "Task created");
        Ok(task)
    }

    /// Overwrites the fields set in `patch`
    ///
    /// A blank title keeps the stored one.
    pub async fn update(
        &self,
        user_id: i32,
        task_id: i32,
        mut patch: TaskPatch,
    ) -> Result<Task, TaskError> {
        patch.title = patch.title.filter(|title| !title.trim().is_empty());
        if let Some(title) = patch.title.as_set() {
            check_title_len(title)?;
        }

        let task = self
            .store
            .update_task(user_id, task_id, patch)
            .await?
            .ok_or(TaskError::NotFoundOrForbidden)?;

        tracing::info!(user_id, task_id, completed = task.completed, "Task updated");
        Ok(task)
    }

    /// Deletes a task and returns it
    pub async fn delete(&self, user_id: i32, task_id: i32) -> Result<Task, TaskError> {
        let task = self
            .store
            .delete_task(user_id, task_id)
            .await?
            .ok_or(TaskError::NotFoundOrForbidden)?;

        tracing::info!(user_id, task_id, "Task deleted");
        Ok(task)
    }
}

fn check_title_len(title: &str) -> Result<(), TaskError> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::Validation {
            field: "title",
            message: format!("Title must be at most {} characters", MAX_TITLE_LEN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Patch;
    use crate::models::user::CreateUser;
    use crate::store::{MemoryStore, UserStore};

    async fn setup(users: &[&str]) -> (TaskRepository, Vec<i32>) {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for name in users {
            let user = store
                .create_user(CreateUser {
                    username: name.to_string(),
                    email: format!("{}@x.com", name),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (TaskRepository::new(store), ids)
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (repo, ids) = setup(&["alice"]).await;

        let task = repo.create(ids[0], "buy milk", None).await.unwrap();

        assert_eq!(task.title, "buy milk");
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.user_id, ids[0]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let (repo, ids) = setup(&["alice"]).await;

        for title in ["", "   "] {
            let result = repo.create(ids[0], title, None).await;
            assert!(matches!(result, Err(TaskError::Validation { field: "title", .. })));
        }
        assert!(repo.list(ids[0]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_long_title() {
        let (repo, ids) = setup(&["alice"]).await;

        let result = repo.create(ids[0], &"t".repeat(256), None).await;
        assert!(matches!(result, Err(TaskError::Validation { .. })));
        assert!(repo.create(ids[0], &"t".repeat(255), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_never_leaks_other_users_tasks() {
        let (repo, ids) = setup(&["alice", "bob", "carol"]).await;

        for round in 0..4 {
            for &user_id in &ids {
                repo.create(user_id, &format!("task {} of {}", round, user_id), None)
                    .await
                    .unwrap();
            }
        }

        for &user_id in &ids {
            let tasks = repo.list(user_id).await.unwrap();
            assert_eq!(tasks.len(), 4);
            assert!(tasks.iter().all(|t| t.user_id == user_id));
        }
    }

    #[tokio::test]
    async fn test_foreign_task_same_as_missing() {
        let (repo, ids) = setup(&["alice", "bob"]).await;
        let task = repo.create(ids[0], "private", None).await.unwrap();

        let patch = TaskPatch {
            completed: Patch::Set(true),
            ..Default::default()
        };
        let foreign = repo.update(ids[1], task.id, patch.clone()).await;
        let missing = repo.update(ids[1], 9999, patch).await;
        assert!(matches!(foreign, Err(TaskError::NotFoundOrForbidden)));
        assert!(matches!(missing, Err(TaskError::NotFoundOrForbidden)));

        assert!(matches!(
            repo.delete(ids[1], task.id).await,
            Err(TaskError::NotFoundOrForbidden)
        ));
        assert!(matches!(
            repo.delete(ids[1], 9999).await,
            Err(TaskError::NotFoundOrForbidden)
        ));

        let untouched = repo.list(ids[0]).await.unwrap();
        assert_eq!(untouched, vec![task]);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let (repo, ids) = setup(&["alice"]).await;
        let task = repo
            .create(ids[0], "buy milk", Some("2 litres".to_string()))
            .await
            .unwrap();

        let updated = repo
            .update(
                ids[0],
                task.id,
                TaskPatch {
                    completed: Patch::Set(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "buy milk");
        assert_eq!(updated.description, "2 litres");
    }

    #[tokio::test]
    async fn test_update_blank_title_keeps_stored_title() {
        let (repo, ids) = setup(&["alice"]).await;
        let task = repo.create(ids[0], "buy milk", None).await.unwrap();

        let updated = repo
            .update(
                ids[0],
                task.id,
                TaskPatch {
                    title: Patch::Set("  ".to_string()),
                    description: Patch::Set("semi-skimmed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "buy milk");
        assert_eq!(updated.description, "semi-skimmed");
    }

    #[tokio::test]
    async fn test_delete_returns_record() {
        let (repo, ids) = setup(&["alice"]).await;
        let task = repo.create(ids[0], "buy milk", None).await.unwrap();

        let deleted = repo.delete(ids[0], task.id).await.unwrap();

        assert_eq!(deleted, task);
        assert!(repo.list(ids[0]).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(ids[0], task.id).await,
            Err(TaskError::NotFoundOrForbidden)
        ));
    }
}
