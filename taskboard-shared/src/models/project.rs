/// Project model and database operations
///
/// A project is owned by exactly one user for its whole lifetime; the
/// owner is set at creation and never changed through the API. Deleting
/// the owner deletes the project, and deleting a project deletes its
/// tasks, both via CASCADE.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{CreateProject, Project};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     name: "Website relaunch".to_string(),
///     description: None,
///     owner_id: Uuid::new_v4(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::{CreateProjectTask, Task};

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Owning user; immutable after creation
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user
    pub owner_id: Uuid,
}

/// Input for updating a project
///
/// Only non-None fields are applied. The owner cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

const PROJECT_COLUMNS: &str = "id, name, description, owner_id, created_at";

impl Project {
    /// Creates a new project
    ///
    /// Accepts any executor so it can run standalone or inside the
    /// project-with-tasks transaction.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    /// Creates a project together with a batch of tasks, atomically
    ///
    /// All rows are inserted in one transaction: the project first, then
    /// each task bound to it. Any failure rolls the whole batch back so no
    /// partial project is ever left behind.
    ///
    /// Task payloads are expected to be validated by the caller before
    /// this is invoked; side effects for the created tasks (activity log,
    /// notification) are also the caller's responsibility, after commit.
    pub async fn create_with_tasks(
        pool: &PgPool,
        data: CreateProject,
        tasks: Vec<CreateProjectTask>,
    ) -> Result<(Self, Vec<Task>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = Self::create(&mut *tx, data).await?;

        let mut created = Vec::with_capacity(tasks.len());
        for task in tasks {
            created.push(Task::create(&mut *tx, task.into_create(project.id)).await?);
        }

        tx.commit().await?;

        Ok((project, created))
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists the projects a subject owns, newest first
    ///
    /// A subject's queryable project set is exactly the projects they own.
    pub async fn list_owned(
        pool: &PgPool,
        owner_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = if let Some(search) = search {
            sqlx::query_as::<_, Project>(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects \
                 WHERE owner_id = $1 AND name ILIKE $2 \
                 ORDER BY created_at DESC"
            ))
            .bind(owner_id)
            .bind(format!("%{}%", search))
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as::<_, Project>(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects \
                 WHERE owner_id = $1 \
                 ORDER BY created_at DESC"
            ))
            .bind(owner_id)
            .fetch_all(pool)
            .await?
        };

        Ok(projects)
    }

    /// Applies a partial update
    ///
    /// Returns None if no project with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = match (data.name, data.description) {
            (None, None) => return Self::find_by_id(pool, id).await,
            (Some(name), None) => {
                sqlx::query_as::<_, Project>(&format!(
                    "UPDATE projects SET name = $2 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
                ))
                .bind(id)
                .bind(name)
                .fetch_optional(pool)
                .await?
            }
            (None, Some(description)) => {
                sqlx::query_as::<_, Project>(&format!(
                    "UPDATE projects SET description = $2 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
                ))
                .bind(id)
                .bind(description)
                .fetch_optional(pool)
                .await?
            }
            (Some(name), Some(description)) => {
                sqlx::query_as::<_, Project>(&format!(
                    "UPDATE projects SET name = $2, description = $3 \
                     WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
                ))
                .bind(id)
                .bind(name)
                .bind(description)
                .fetch_optional(pool)
                .await?
            }
        };

        Ok(project)
    }

    /// Deletes a project
    ///
    /// Also deletes all of its tasks via CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_is_noop_shape() {
        let update = UpdateProject::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_project_serializes_owner() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Apollo".to_string(),
            description: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("owner_id"));
        assert!(json.contains("Apollo"));
    }
}
