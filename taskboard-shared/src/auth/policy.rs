/// Object-level access policy for projects and tasks
///
/// Two rules cover every mutation in the system:
///
/// - A subject may act on a **project** iff they own it.
/// - A subject may act on a **task** iff they are assigned to it or own
///   its project.
///
/// The listing scope mirrors these rules: a subject's queryable project
/// set is the projects they own, and their queryable task set is the
/// union of tasks in owned projects and tasks assigned to them (see
/// `Project::list_owned` and `Task::list_visible`).
///
/// The checks here are pure and persistence-free; callers fetch the rows
/// first and hand them in.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::policy::require_project_owner;
/// use taskboard_shared::models::project::Project;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let project = Project {
///     id: Uuid::new_v4(),
///     name: "Apollo".to_string(),
///     description: None,
///     owner_id: owner,
///     created_at: Utc::now(),
/// };
///
/// assert!(require_project_owner(owner, &project).is_ok());
/// assert!(require_project_owner(Uuid::new_v4(), &project).is_err());
/// ```

use uuid::Uuid;

use crate::models::{project::Project, task::Task};

/// Error type for access checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Subject lacks rights over the object
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Checks whether a subject owns a project
pub fn is_project_owner(subject: Uuid, project: &Project) -> bool {
    project.owner_id == subject
}

/// Checks whether a subject may act on a task
///
/// `project_owner` is the owner of the task's project; the caller already
/// has the project at hand when this runs.
pub fn is_task_editor(subject: Uuid, task: &Task, project_owner: Uuid) -> bool {
    task.assigned_to == Some(subject) || project_owner == subject
}

/// Requires that a subject owns a project
///
/// # Errors
///
/// Returns `AccessError::NotAuthorized` if the subject is not the owner
pub fn require_project_owner(subject: Uuid, project: &Project) -> Result<(), AccessError> {
    if !is_project_owner(subject, project) {
        return Err(AccessError::NotAuthorized);
    }

    Ok(())
}

/// Requires that a subject may act on a task
///
/// # Errors
///
/// Returns `AccessError::NotAuthorized` if the subject is neither the
/// assignee nor the project owner
pub fn require_task_editor(
    subject: Uuid,
    task: &Task,
    project_owner: Uuid,
) -> Result<(), AccessError> {
    if !is_task_editor(subject, task, project_owner) {
        return Err(AccessError::NotAuthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use chrono::{NaiveDate, Utc};

    fn project(owner_id: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Apollo".to_string(),
            description: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    fn task(project_id: Uuid, assigned_to: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id,
            title: "Design review".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            assigned_to,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_owner_check() {
        let owner = Uuid::new_v4();
        let project = project(owner);

        assert!(is_project_owner(owner, &project));
        assert!(!is_project_owner(Uuid::new_v4(), &project));
    }

    #[test]
    fn test_task_editor_owner() {
        let owner = Uuid::new_v4();
        let project = project(owner);
        let task = task(project.id, None);

        assert!(is_task_editor(owner, &task, project.owner_id));
    }

    #[test]
    fn test_task_editor_assignee() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let project = project(owner);
        let task = task(project.id, Some(assignee));

        // Union, not intersection: either role is enough
        assert!(is_task_editor(assignee, &task, project.owner_id));
        assert!(is_task_editor(owner, &task, project.owner_id));
    }

    #[test]
    fn test_task_editor_stranger_denied() {
        let project = project(Uuid::new_v4());
        let task = task(project.id, Some(Uuid::new_v4()));

        assert!(!is_task_editor(Uuid::new_v4(), &task, project.owner_id));
    }

    #[test]
    fn test_unassigned_task_only_owner_edits() {
        let owner = Uuid::new_v4();
        let project = project(owner);
        let task = task(project.id, None);

        assert!(require_task_editor(owner, &task, project.owner_id).is_ok());
        assert!(require_task_editor(Uuid::new_v4(), &task, project.owner_id).is_err());
    }

    #[test]
    fn test_assignee_cannot_touch_project_itself() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let project = project(owner);

        // Being assigned to a task in the project grants nothing on the
        // project object
        assert!(require_project_owner(assignee, &project).is_err());
    }
}
