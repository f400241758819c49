/// Task model and database operations
///
/// Tasks belong to exactly one project and may be assigned to a user.
/// Deleting a project deletes its tasks; deleting an assigned user only
/// clears the assignment.
///
/// # Status
///
/// A task is in exactly one of three states:
///
/// ```text
/// todo → in_progress → completed
/// ```
///
/// The transition to `completed` is validated (the task must carry a
/// non-empty description) but the states themselves are otherwise free:
/// there is no configurable workflow.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     due_date DATE NOT NULL,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id: Uuid::new_v4(),
///     title: "Write onboarding docs".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     assigned_to: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Done; requires a non-empty description at transition time
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display and database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checks if the task still counts toward overdue reporting
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Todo | TaskStatus::InProgress)
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Calendar date the task is due
    pub due_date: NaiveDate,

    /// Assigned user (None if unassigned or the user was deleted)
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    /// Project ID
    pub project_id: Uuid,

    /// Task title
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

/// A task payload nested inside a project-creation request
///
/// Identical to [`CreateTask`] except the project is implied by the
/// enclosing request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectTask {
    /// Task title
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

impl CreateProjectTask {
    /// Binds this payload to the project it is being created under
    pub fn into_create(self, project_id: Uuid) -> CreateTask {
        CreateTask {
            project_id,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
        }
    }
}

/// Input for a partial task update
///
/// Only non-None fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
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

impl UpdateTask {
    /// Whether the patch carries any change at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
    }
}

/// Listing filters for the task collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only tasks in this status
    pub status: Option<TaskStatus>,

    /// Only tasks assigned to this user
    pub assigned_to: Option<Uuid>,

    /// Only tasks due on this exact date
    pub due_date: Option<NaiveDate>,

    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
}

const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, due_date, assigned_to, created_at";

impl Task {
    /// Creates a new task
    ///
    /// Accepts any executor so it can run standalone against the pool or
    /// inside the project-creation transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, due_date, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, title, description, status, due_date, assigned_to, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.assigned_to)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks visible to a subject, newest first
    ///
    /// The visible set is the union of tasks in projects the subject owns
    /// and tasks assigned to the subject.
    pub async fn list_visible(
        pool: &PgPool,
        subject: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!(
            "SELECT t.{} FROM tasks t \
             JOIN projects p ON p.id = t.project_id \
             WHERE (p.owner_id = $1 OR t.assigned_to = $1)",
            TASK_COLUMNS.replace(", ", ", t."),
        );
        let mut bind_count = 1;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND t.status = ${}", bind_count));
        }
        if filter.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND t.assigned_to = ${}", bind_count));
        }
        if filter.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND t.due_date = ${}", bind_count));
        }
        if filter.search.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (t.title ILIKE ${n} OR t.description ILIKE ${n})",
                n = bind_count
            ));
        }

        query.push_str(" ORDER BY t.created_at DESC");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(subject);

        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(due_date) = filter.due_date {
            q = q.bind(due_date);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        q.fetch_all(pool).await
    }

    /// Lists all tasks of a project, newest first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the subject's overdue tasks
    ///
    /// Overdue = due strictly before `today` and still open (todo or
    /// in_progress). Completed tasks never show up here, however late.
    pub async fn list_overdue(
        pool: &PgPool,
        subject: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT t.{} FROM tasks t \
             JOIN projects p ON p.id = t.project_id \
             WHERE (p.owner_id = $1 OR t.assigned_to = $1) \
               AND t.due_date < $2 \
               AND t.status IN ('todo', 'in_progress') \
             ORDER BY t.due_date ASC",
            TASK_COLUMNS.replace(", ", ", t."),
        ))
        .bind(subject)
        .bind(today)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Returns None if no task with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE tasks SET");
        let mut bind_count = 1;
        let mut first = true;

        let mut push_set = |query: &mut String, column: &str| {
            bind_count += 1;
            if first {
                first = false;
                query.push_str(&format!(" {} = ${}", column, bind_count));
            } else {
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        };

        if data.title.is_some() {
            push_set(&mut query, "title");
        }
        if data.description.is_some() {
            push_set(&mut query, "description");
        }
        if data.status.is_some() {
            push_set(&mut query, "status");
        }
        if data.due_date.is_some() {
            push_set(&mut query, "due_date");
        }
        if data.assigned_to.is_some() {
            push_set(&mut query, "assigned_to");
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task
    ///
    /// Also deletes its activity log entries via CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
