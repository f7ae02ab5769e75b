/// Task endpoints
///
/// All routes here sit behind the authorization gate and act only on tasks
/// owned by the caller.
///
/// # Endpoints
///
/// - `GET /tasks` - List the caller's tasks, newest first
/// - `POST /tasks` - Create a task
/// - `PUT /tasks/:id` - Update any subset of title, description, completed
/// - `DELETE /tasks/:id` - Delete a task

use axum::{extract::State, http::StatusCode, Extension, Json};
use dailytask_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskPatch},
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    error::{ApiJson, ApiPath, ApiResult},
};

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Required; missing is treated like empty
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Delete task response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
///
/// { "title": "buy milk", "description": "2 litres" }
/// ```
///
/// Returns `201 Created` with the task; `400` if the title is missing or blank.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .tasks
        .create(auth.user_id, &req.title, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
///
/// Fields absent from the body (or `null`) keep their stored values.
/// Returns `404` for a task that does not exist or belongs to someone else.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i32>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.update(auth.user_id, task_id, patch).await?;
    Ok(Json(task))
}

/// Delete a task
///
/// Returns `404` for a task that does not exist or belongs to someone else.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i32>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    state.tasks.delete(auth.user_id, task_id).await?;

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
