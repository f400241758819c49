/// Database models
///
/// This module contains all database models:
///
/// - `user`: User accounts
/// - `project`: Projects owned by users
/// - `task`: Tasks within projects
/// - `activity`: Append-only task activity log

pub mod activity;
pub mod project;
pub mod task;
pub mod user;
