//! # Taskboard Shared Library
//!
//! This crate contains the types and business logic shared across the
//! Taskboard API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `db`: Connection pool and migration utilities
//! - `auth`: Authentication, authorization policy, and Axum middleware
//! - `validation`: Field and cross-field task validation rules
//! - `mail`: Outbound email transport

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod validation;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
