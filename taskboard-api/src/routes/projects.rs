/// Project endpoints
///
/// Projects are strictly owner-scoped: a subject's queryable set is the
/// projects they own, and every object-level action re-checks ownership.
/// Being assigned to a task inside a project grants nothing on the
/// project itself.
///
/// # Endpoints
///
/// - `GET /v1/projects` - List owned projects, `?search=` on name
/// - `POST /v1/projects` - Create, optionally with a batch of nested tasks
/// - `GET /v1/projects/:id` - Retrieve with tasks
/// - `PUT /v1/projects/:id` - Update name/description
/// - `DELETE /v1/projects/:id` - Delete (cascades to tasks)
///
/// # Nested creation
///
/// `POST /v1/projects` accepts a `create_tasks` list. All payloads are
/// validated up front with the same rules as standalone task creation
/// (the project field is implied); the project row and every task row are
/// then inserted in one transaction, so a failure anywhere leaves nothing
/// behind. The task-created lifecycle hook fires once per task after the
/// transaction commits.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy},
    models::{
        project::{CreateProject, Project, UpdateProject},
        task::{CreateProjectTask, Task, TaskStatus},
        user::User,
    },
    validation::{validate_task, FieldError, TaskChanges},
};

use crate::{
    app::AppState,
    error::{request_validation_error, ApiError, ApiResult},
    hooks,
};

/// Query parameters for the project list
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    /// Case-insensitive substring match on the project name
    pub search: Option<String>,
}

/// A task payload nested inside a project-creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NestedTaskRequest {
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

impl NestedTaskRequest {
    fn changes(&self) -> TaskChanges {
        TaskChanges {
            description: self.description.clone(),
            status: Some(self.status),
            due_date: Some(self.due_date),
        }
    }

    fn into_payload(self) -> CreateProjectTask {
        CreateProjectTask {
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
        }
    }
}

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Tasks to create together with the project
    #[serde(default)]
    pub create_tasks: Vec<NestedTaskRequest>,
}

/// Update project request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// A project together with its tasks
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    /// The project
    #[serde(flatten)]
    pub project: Project,

    /// The project's tasks, newest first
    pub tasks: Vec<Task>,
}

/// Lists the subject's projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects =
        Project::list_owned(&state.db, auth.user_id, query.search.as_deref()).await?;

    Ok(Json(projects))
}

/// Creates a project, optionally with nested tasks, atomically
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed on the project or any nested
///   task; nothing is persisted
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    req.validate().map_err(|e| request_validation_error(&e))?;

    let today = Utc::now().date_naive();
    let mut errors = Vec::new();

    for (index, task) in req.create_tasks.iter().enumerate() {
        collect_nested_errors(&mut errors, index, task, &state, today).await?;
    }

    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    let payloads: Vec<CreateProjectTask> = req
        .create_tasks
        .into_iter()
        .map(NestedTaskRequest::into_payload)
        .collect();

    let (project, tasks) = Project::create_with_tasks(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            owner_id: auth.user_id,
        },
        payloads,
    )
    .await?;

    tracing::info!(
        project_id = %project.id,
        owner_id = %auth.user_id,
        task_count = tasks.len(),
        "Project created"
    );

    // Side effects only after the whole batch is durably committed
    for task in &tasks {
        hooks::task_created(&state, task, &project).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse { project, tasks }),
    ))
}

/// Retrieves a project with its tasks
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = find_owned_project(&state, auth.user_id, id).await?;
    let tasks = Task::list_for_project(&state.db, project.id).await?;

    Ok(Json(ProjectResponse { project, tasks }))
}

/// Updates a project's name and description
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    req.validate().map_err(|e| request_validation_error(&e))?;

    let project = find_owned_project(&state, auth.user_id, id).await?;

    let project = Project::update(
        &state.db,
        project.id,
        UpdateProject {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_for_project(&state.db, project.id).await?;

    Ok(Json(ProjectResponse { project, tasks }))
}

/// Deletes a project and all of its tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let project = find_owned_project(&state, auth.user_id, id).await?;

    Project::delete(&state.db, project.id).await?;

    tracing::info!(project_id = %project.id, owner_id = %auth.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Fetches a project and verifies the subject owns it
async fn find_owned_project(
    state: &AppState,
    subject: Uuid,
    id: Uuid,
) -> Result<Project, ApiError> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    policy::require_project_owner(subject, &project)?;

    Ok(project)
}

/// Validates one nested task payload, prefixing errors with its index
async fn collect_nested_errors(
    errors: &mut Vec<FieldError>,
    index: usize,
    task: &NestedTaskRequest,
    state: &AppState,
    today: NaiveDate,
) -> Result<(), ApiError> {
    let prefix = |field: &str| format!("create_tasks[{}].{}", index, field);

    if let Err(e) = task.validate() {
        for (field, field_errors) in e.field_errors() {
            for error in field_errors {
                errors.push(FieldError::new(
                    prefix(field),
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                ));
            }
        }
    }

    if let Err(domain_errors) = validate_task(&task.changes(), None, today) {
        for error in domain_errors {
            errors.push(FieldError::new(prefix(&error.field), error.message));
        }
    }

    if let Some(assigned_to) = task.assigned_to {
        if !User::exists(&state.db, assigned_to).await? {
            errors.push(FieldError::new(
                prefix("assigned_to"),
                "Assigned user does not exist.",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(title: &str, due_date: NaiveDate) -> NestedTaskRequest {
        NestedTaskRequest {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date,
            assigned_to: None,
        }
    }

    #[test]
    fn test_create_project_request_validation() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let valid = CreateProjectRequest {
            name: "Website relaunch".to_string(),
            description: None,
            create_tasks: vec![nested("Design", due)],
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateProjectRequest {
            name: String::new(),
            description: None,
            create_tasks: vec![],
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateProjectRequest {
            name: "a".repeat(256),
            description: None,
            create_tasks: vec![],
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_nested_task_title_bounds() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        assert!(nested("ok", due).validate().is_ok());
        assert!(nested("", due).validate().is_err());
        assert!(nested(&"a".repeat(256), due).validate().is_err());
    }

    #[test]
    fn test_nested_changes_carry_all_rule_inputs() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let mut request = nested("Design", due);
        request.status = TaskStatus::Completed;
        request.description = Some("done".to_string());

        let changes = request.changes();
        assert_eq!(changes.status, Some(TaskStatus::Completed));
        assert_eq!(changes.due_date, Some(due));
        assert_eq!(changes.description.as_deref(), Some("done"));
    }

    #[test]
    fn test_nested_domain_validation_flags_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let request = nested("Design", today.pred_opt().unwrap());

        let errors = validate_task(&request.changes(), None, today).unwrap_err();
        assert_eq!(errors[0].field, "due_date");
    }

    #[test]
    fn test_create_tasks_defaults_to_empty_in_json() {
        let req: CreateProjectRequest =
            serde_json::from_str(r#"{"name": "Solo project"}"#).unwrap();
        assert!(req.create_tasks.is_empty());
    }
}
