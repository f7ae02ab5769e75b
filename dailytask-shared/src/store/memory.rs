/// In-memory implementation of the storage traits
///
/// Mirrors the PostgreSQL contracts (auto-increment ids, unique username and
/// email, an existing owner for every task, owner-scoped task access,
/// newest-first ordering) so services and handlers can be exercised without
/// a database. Data lives only as long as the store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Storage, StoreError, TaskStore, UserStore};
use crate::models::task::{CreateTask, Task, TaskPatch};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    last_user_id: i32,
    last_task_id: i32,
}

/// Store holding all records in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }
        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, user_id: i32) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;

        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(tasks)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "tasks_user_id_fkey".to_string(),
            ));
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            completed: false,
            created_at: Utc::now(),
        };
        tables.tasks.push(task.clone());

        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
        else {
            return Ok(None);
        };

        patch.apply_to(task);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let position = tables
            .tasks
            .iter()
            .position(|t| t.id == task_id && t.user_id == user_id);

        Ok(position.map(|index| tables.tasks.remove(index)))
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
