/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `projects`: Project CRUD, including creation with nested tasks
/// - `tasks`: Task CRUD plus the mark_complete and overdue actions

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
