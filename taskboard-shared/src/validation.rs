/// Task validation rules
///
/// Field-level and cross-field checks applied to every task create and
/// update before anything is persisted. The checks are pure: they look
/// only at the submitted attributes, the existing record (for updates),
/// and the date they are handed.
///
/// # Rules
///
/// 1. A due date being set must not lie in the past. Today passes; the
///    comparison is strict.
/// 2. A task whose effective status is `completed` must carry a non-empty
///    effective description. "Effective" means the submitted value when
///    one is present, otherwise the stored value of the existing record.
///    This makes a completion-only patch valid when the task already has
///    a description, and rejects clearing the description while
///    completing.
///
/// # Example
///
/// ```
/// use taskboard_shared::validation::{validate_task, TaskChanges};
/// use taskboard_shared::models::task::TaskStatus;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
///
/// let changes = TaskChanges {
///     due_date: Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()),
///     ..Default::default()
/// };
///
/// let errors = validate_task(&changes, None, today).unwrap_err();
/// assert_eq!(errors[0].field, "due_date");
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::task::{Task, TaskStatus};

/// Pseudo-field name used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// A single validation failure, scoped to a field or to the whole record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation, or [`NON_FIELD_ERRORS`]
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    /// Creates a field-scoped error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a record-scoped (cross-field) error
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::new(NON_FIELD_ERRORS, message)
    }
}

/// The attributes submitted by a task create or partial update
///
/// Only the fields the validation rules look at; absent fields mean "not
/// part of this request".
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    /// Submitted description, if any
    pub description: Option<String>,

    /// Submitted status, if any
    pub status: Option<TaskStatus>,

    /// Submitted due date, if any
    pub due_date: Option<NaiveDate>,
}

impl TaskChanges {
    /// The changes applied by a mark-complete transition
    pub fn mark_complete() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        }
    }
}

/// Validates a task create or update against the submitted attributes
///
/// `existing` is the currently persisted record for an update, or None
/// for a create. `today` is the server's current date, passed in so the
/// rules stay pure and testable at the boundary.
///
/// Returns every violated rule, not just the first.
pub fn validate_task(
    changes: &TaskChanges,
    existing: Option<&Task>,
    today: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(due_date) = changes.due_date {
        if due_date < today {
            errors.push(FieldError::new("due_date", "Due date cannot be in the past."));
        }
    }

    let effective_status = changes
        .status
        .or_else(|| existing.map(|t| t.status))
        .unwrap_or_default();

    let effective_description = changes
        .description
        .as_deref()
        .or_else(|| existing.and_then(|t| t.description.as_deref()));

    if effective_status == TaskStatus::Completed && is_blank(effective_description) {
        errors.push(FieldError::non_field(
            "Description is required to mark task as completed.",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn existing_task(status: TaskStatus, description: Option<&str>) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Existing".to_string(),
            description: description.map(String::from),
            status,
            due_date: today(),
            assigned_to: None,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn test_due_date_in_past_fails() {
        let changes = TaskChanges {
            due_date: Some(today().pred_opt().unwrap()),
            ..Default::default()
        };

        let errors = validate_task(&changes, None, today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "due_date");
        assert_eq!(errors[0].message, "Due date cannot be in the past.");
    }

    #[test]
    fn test_due_date_today_passes() {
        let changes = TaskChanges {
            due_date: Some(today()),
            ..Default::default()
        };

        assert!(validate_task(&changes, None, today()).is_ok());
    }

    #[test]
    fn test_due_date_in_future_passes() {
        let changes = TaskChanges {
            due_date: Some(today().succ_opt().unwrap()),
            ..Default::default()
        };

        assert!(validate_task(&changes, None, today()).is_ok());
    }

    #[test]
    fn test_due_date_absent_is_not_checked() {
        // An update that doesn't touch the due date never re-validates it,
        // even when the stored date has since passed
        let task = existing_task(TaskStatus::Todo, Some("notes"));
        let changes = TaskChanges {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };

        assert!(validate_task(&changes, Some(&task), today()).is_ok());
    }

    #[test]
    fn test_create_completed_without_description_fails() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        let errors = validate_task(&changes, None, today()).unwrap_err();
        assert_eq!(errors[0].field, NON_FIELD_ERRORS);
        assert_eq!(
            errors[0].message,
            "Description is required to mark task as completed."
        );
    }

    #[test]
    fn test_create_completed_with_empty_description_fails() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            description: Some(String::new()),
            ..Default::default()
        };

        assert!(validate_task(&changes, None, today()).is_err());
    }

    #[test]
    fn test_create_completed_with_description_passes() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            description: Some("Done and verified".to_string()),
            ..Default::default()
        };

        assert!(validate_task(&changes, None, today()).is_ok());
    }

    #[test]
    fn test_completion_only_patch_uses_stored_description() {
        let task = existing_task(TaskStatus::InProgress, Some("Shipping notes"));

        assert!(validate_task(&TaskChanges::mark_complete(), Some(&task), today()).is_ok());
    }

    #[test]
    fn test_completion_only_patch_fails_when_stored_description_empty() {
        for stored in [None, Some("")] {
            let task = existing_task(TaskStatus::InProgress, stored);
            let errors =
                validate_task(&TaskChanges::mark_complete(), Some(&task), today()).unwrap_err();
            assert_eq!(errors[0].field, NON_FIELD_ERRORS);
        }
    }

    #[test]
    fn test_clearing_description_while_completed_fails() {
        // Submitted empty description wins over the stored one
        let task = existing_task(TaskStatus::Completed, Some("kept"));
        let changes = TaskChanges {
            description: Some(String::new()),
            ..Default::default()
        };

        assert!(validate_task(&changes, Some(&task), today()).is_err());
    }

    #[test]
    fn test_non_completed_status_never_requires_description() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress] {
            let changes = TaskChanges {
                status: Some(status),
                ..Default::default()
            };
            assert!(validate_task(&changes, None, today()).is_ok());
        }
    }

    #[test]
    fn test_multiple_violations_reported_together() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            due_date: Some(today().pred_opt().unwrap()),
            ..Default::default()
        };

        let errors = validate_task(&changes, None, today()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
