/// Task activity log model
///
/// An append-only record of task events. Entries are written exclusively
/// by the task-created lifecycle hook, never by direct client action, and
/// are never updated or deleted on their own (they go away with their
/// task via CASCADE).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_activity_log (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     message VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::Task;

/// One activity log entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskActivityLog {
    /// Unique entry ID
    pub id: Uuid,

    /// Task this entry belongs to
    pub task_id: Uuid,

    /// Human-readable event message
    pub message: String,

    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

impl TaskActivityLog {
    /// The message recorded when a task is created
    pub fn creation_message(title: &str) -> String {
        format!("Task created with title: {}", title)
    }

    /// Appends the creation entry for a freshly persisted task
    ///
    /// # Errors
    ///
    /// Returns the storage error to the caller; the lifecycle hook decides
    /// what failure means (it reports and aborts its remaining steps).
    pub async fn record(pool: &PgPool, task: &Task) -> Result<Self, sqlx::Error> {
        let entry = sqlx::query_as::<_, TaskActivityLog>(
            r#"
            INSERT INTO task_activity_log (task_id, message)
            VALUES ($1, $2)
            RETURNING id, task_id, message, created_at
            "#,
        )
        .bind(task.id)
        .bind(Self::creation_message(&task.title))
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    /// Lists a task's activity entries, oldest first
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, TaskActivityLog>(
            r#"
            SELECT id, task_id, message, created_at
            FROM task_activity_log
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Counts a task's activity entries
    pub async fn count(pool: &PgPool, task_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM task_activity_log WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_message_format() {
        assert_eq!(
            TaskActivityLog::creation_message("Fix login redirect"),
            "Task created with title: Fix login redirect"
        );
    }

    #[test]
    fn test_creation_message_keeps_title_verbatim() {
        // Titles are not escaped or truncated in the message
        assert_eq!(
            TaskActivityLog::creation_message("a: b, c"),
            "Task created with title: a: b, c"
        );
    }
}
