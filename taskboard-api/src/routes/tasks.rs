/// Task endpoints
///
/// A subject's queryable task set is the union of tasks in projects they
/// own and tasks assigned to them; object-level actions require being
/// the assignee or the project owner. Creating a task in a project
/// requires owning that project.
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List visible tasks; filters `status`,
///   `assigned_to`, `due_date`, plus `?search=` on title/description
/// - `POST /v1/tasks` - Create (fires the task-created hook)
/// - `GET /v1/tasks/overdue` - The caller's overdue open tasks
/// - `GET /v1/tasks/:id` - Retrieve
/// - `PATCH /v1/tasks/:id` - Partial update (no hook, even when the
///   status transitions to completed)
/// - `DELETE /v1/tasks/:id` - Delete
/// - `POST /v1/tasks/:id/mark_complete` - Transition to completed

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy},
    models::{
        project::Project,
        task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask},
        user::User,
    },
    validation::{validate_task, FieldError, TaskChanges},
};

use crate::{
    app::AppState,
    error::{request_validation_error, ApiError, ApiResult},
    hooks,
};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Project the task belongs to
    pub project_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to todo)
    #[serde(default)]
    pub status: TaskStatus,

    /// Due date
    pub due_date: NaiveDate,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,
}

/// Partial update request
///
/// Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New due date
    pub due_date: Option<NaiveDate>,

    /// New assignee
    pub assigned_to: Option<Uuid>,
}

impl UpdateTaskRequest {
    fn changes(&self) -> TaskChanges {
        TaskChanges {
            description: self.description.clone(),
            status: self.status,
            due_date: self.due_date,
        }
    }
}

/// Lists the tasks visible to the subject
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_visible(&state.db, auth.user_id, &filter).await?;

    Ok(Json(tasks))
}

/// Creates a task
///
/// The subject must own the target project. On success the task-created
/// lifecycle hook runs synchronously before the response is built; its
/// outcome never changes the response.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Subject does not own the project
/// - `404 Not Found`: Project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(|e| request_validation_error(&e))?;

    let project = Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    policy::require_project_owner(auth.user_id, &project)?;

    let changes = TaskChanges {
        description: req.description.clone(),
        status: Some(req.status),
        due_date: Some(req.due_date),
    };
    validate_task(&changes, None, Utc::now().date_naive()).map_err(ApiError::ValidationError)?;

    ensure_assignee_exists(&state, req.assigned_to).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id: project.id,
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    hooks::task_created(&state, &task, &project).await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Retrieves a task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let (task, _project) = find_editable_task(&state, auth.user_id, id).await?;

    Ok(Json(task))
}

/// Applies a partial update to a task
///
/// Validation runs against the merged effective state: a field absent
/// from the patch keeps its stored value for the cross-field rules. A
/// status transition to completed here fires no side effects; the
/// lifecycle hook belongs to creation only.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(|e| request_validation_error(&e))?;

    let (task, _project) = find_editable_task(&state, auth.user_id, id).await?;

    validate_task(&req.changes(), Some(&task), Utc::now().date_naive())
        .map_err(ApiError::ValidationError)?;

    ensure_assignee_exists(&state, req.assigned_to).await?;

    let task = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (task, _project) = find_editable_task(&state, auth.user_id, id).await?;

    Task::delete(&state.db, task.id).await?;

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Transitions a task to completed
///
/// Equivalent to `PATCH {"status": "completed"}`. Returns the validation
/// errors verbatim as a 400 when the transition is invalid (the status is
/// left untouched), and a confirmation message on success.
pub async fn mark_complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let (task, _project) = find_editable_task(&state, auth.user_id, id).await?;

    validate_task(
        &TaskChanges::mark_complete(),
        Some(&task),
        Utc::now().date_naive(),
    )
    .map_err(ApiError::ValidationError)?;

    Task::update(
        &state.db,
        task.id,
        UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "detail": "Task marked as completed."
    })))
}

/// Lists the subject's overdue tasks
///
/// Overdue = due strictly before today and still open; completed tasks
/// are excluded however late they finished.
pub async fn overdue_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_overdue(&state.db, auth.user_id, Utc::now().date_naive()).await?;

    Ok(Json(tasks))
}

/// Fetches a task and its project, verifying the subject may act on it
async fn find_editable_task(
    state: &AppState,
    subject: Uuid,
    id: Uuid,
) -> Result<(Task, Project), ApiError> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, task.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    policy::require_task_editor(subject, &task, project.owner_id)?;

    Ok((task, project))
}

/// Rejects an `assigned_to` value that doesn't reference a real user
async fn ensure_assignee_exists(
    state: &AppState,
    assigned_to: Option<Uuid>,
) -> Result<(), ApiError> {
    if let Some(assigned_to) = assigned_to {
        if !User::exists(&state.db, assigned_to).await? {
            return Err(ApiError::ValidationError(vec![FieldError::new(
                "assigned_to",
                "Assigned user does not exist.",
            )]));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            project_id: Uuid::new_v4(),
            title: "Fix login redirect".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: due(),
            assigned_to: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            project_id: Uuid::new_v4(),
            title: String::new(),
            description: None,
            status: TaskStatus::Todo,
            due_date: due(),
            assigned_to: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateTaskRequest {
            project_id: Uuid::new_v4(),
            title: "a".repeat(256),
            description: None,
            status: TaskStatus::Todo,
            due_date: due(),
            assigned_to: None,
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_update_request_changes_keep_absent_fields_absent() {
        let req = UpdateTaskRequest {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        let changes = req.changes();
        assert_eq!(changes.status, Some(TaskStatus::Completed));
        assert!(changes.description.is_none());
        assert!(changes.due_date.is_none());
    }

    #[test]
    fn test_update_request_parses_partial_json() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();

        assert_eq!(req.status, Some(TaskStatus::InProgress));
        assert!(req.title.is_none());
        assert!(req.due_date.is_none());
    }

    #[test]
    fn test_status_filter_parses_from_query_shape() {
        let filter: TaskFilter =
            serde_json::from_str(r#"{"status": "todo", "search": "login"}"#).unwrap();

        assert_eq!(filter.status, Some(TaskStatus::Todo));
        assert_eq!(filter.search.as_deref(), Some("login"));
        assert!(filter.assigned_to.is_none());
    }
}
