/// Task lifecycle hook
///
/// Runs exactly once, synchronously, right after a task row is first
/// persisted — never on updates, and in particular not when a task
/// transitions to completed later. The call sites are the two creation
/// paths in the task and project routes; there is no event bus and no
/// hidden listener registration.
///
/// # Ordering and failure isolation
///
/// 1. Append the activity log entry. If this fails the failure is
///    reported and the hook stops: no notification goes out for an event
///    that was never logged. The task itself is already committed and the
///    creating request is unaffected.
/// 2. Emit a structured log record for the creation. Unconditional.
/// 3. If the task has no assignee, or the assignee has no email address,
///    log the skip and stop. Not an error.
/// 4. Send the assignment email. A failure is reported with the recipient
///    and task id and then dropped: one attempt, no retry, nothing else
///    in the system is affected.
///
/// The hook returns nothing; from the caller's perspective it is
/// fire-and-forget.

use chrono::NaiveDate;

use taskboard_shared::models::{activity::TaskActivityLog, project::Project, task::Task, user::User};

use crate::app::AppState;

/// Subject line of the assignment notification
pub const ASSIGNMENT_SUBJECT: &str = "New Task Assigned";

/// Builds the assignment notification body
///
/// `name` is the assignee's display name, falling back to their username.
pub fn assignment_email_body(
    name: &str,
    title: &str,
    project_name: &str,
    due_date: NaiveDate,
) -> String {
    format!(
        "Hello {name},\n\n\
         You have been assigned a new task.\n\n\
         Title: {title}\n\
         Project: {project_name}\n\
         Due Date: {due_date}\n"
    )
}

/// Runs the post-creation side-effect chain for a freshly created task
///
/// `project` is the task's project; both creation paths already hold it
/// when they call in.
pub async fn task_created(state: &AppState, task: &Task, project: &Project) {
    // 1. Activity log entry; its failure aborts the rest of the hook
    if let Err(e) = TaskActivityLog::record(&state.db, task).await {
        tracing::error!(
            task_id = %task.id,
            error = %e,
            "Activity log write failed, skipping remaining task-created steps"
        );
        return;
    }

    // 2. Creation record, always emitted once the event is logged
    tracing::info!(
        task_id = %task.id,
        title = %task.title,
        project_id = %task.project_id,
        assigned_to = ?task.assigned_to,
        "Task created"
    );

    // 3. Resolve the assignee and their address
    let Some(assignee_id) = task.assigned_to else {
        tracing::info!(task_id = %task.id, "Email skipped, no assigned user");
        return;
    };

    let assignee = match User::find_by_id(&state.db, assignee_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!(task_id = %task.id, "Email skipped, assigned user no longer exists");
            return;
        }
        Err(e) => {
            tracing::error!(
                task_id = %task.id,
                error = %e,
                "Failed to load assigned user for notification"
            );
            return;
        }
    };

    let Some(email) = assignee.email.as_deref().filter(|e| !e.is_empty()) else {
        tracing::info!(task_id = %task.id, "Email skipped, assigned user has no email address");
        return;
    };

    // 4. Best-effort send; failure is reported and dropped
    let body = assignment_email_body(
        assignee.greeting_name(),
        &task.title,
        &project.name,
        task.due_date,
    );

    match state.mailer.send(email, ASSIGNMENT_SUBJECT, &body).await {
        Ok(()) => {
            tracing::info!(task_id = %task.id, recipient = %email, "Assignment email sent");
        }
        Err(e) => {
            tracing::error!(
                task_id = %task.id,
                recipient = %email,
                error = %e,
                "Assignment email failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_subject() {
        assert_eq!(ASSIGNMENT_SUBJECT, "New Task Assigned");
    }

    #[test]
    fn test_assignment_email_body() {
        let body = assignment_email_body(
            "Adriana Reyes",
            "Fix login redirect",
            "Website relaunch",
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );

        assert!(body.starts_with("Hello Adriana Reyes,\n"));
        assert!(body.contains("Title: Fix login redirect\n"));
        assert!(body.contains("Project: Website relaunch\n"));
        assert!(body.contains("Due Date: 2026-09-01\n"));
    }

    #[test]
    fn test_assignment_email_body_with_username_fallback() {
        // Callers pass greeting_name(), which falls back to the username
        let body = assignment_email_body(
            "adriana",
            "Fix login redirect",
            "Website relaunch",
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );

        assert!(body.starts_with("Hello adriana,"));
    }
}
