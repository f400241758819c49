/// User model and database operations
///
/// Users own projects and can be assigned to tasks. The email address is
/// optional: a user without one is simply never notified by email.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(150) NOT NULL UNIQUE,
///     display_name VARCHAR(255),
///     email VARCHAR(255),
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{CreateUser, User};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "adriana".to_string(),
///     display_name: Some("Adriana Reyes".to_string()),
///     email: Some("adriana@example.com".to_string()),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_username(&pool, "adriana").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login identifier, unique across all users
    pub username: String,

    /// Optional display name, preferred over the username wherever a
    /// human-facing name is needed
    pub display_name: Option<String>,

    /// Optional email address
    pub email: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    /// Login identifier
    pub username: String,

    /// Optional display name
    pub display_name: Option<String>,

    /// Optional email address
    pub email: Option<String>,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// The name to greet this user by: display name when set, otherwise
    /// the username.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Whether this user can receive email at all
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username is already taken (unique
    /// constraint) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, display_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, display_name, email, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.display_name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks that a user with the given ID exists
    ///
    /// Used to validate `assigned_to` references before insert so a bad ID
    /// surfaces as a validation error rather than a foreign-key violation.
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, email: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "casey".to_string(),
            display_name: display_name.map(String::from),
            email: email.map(String::from),
            password_hash: "$argon2id$test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_greeting_name_prefers_display_name() {
        assert_eq!(user(Some("Casey Nguyen"), None).greeting_name(), "Casey Nguyen");
        assert_eq!(user(None, None).greeting_name(), "casey");
    }

    #[test]
    fn test_has_email() {
        assert!(user(None, Some("casey@example.com")).has_email());
        assert!(!user(None, Some("")).has_email());
        assert!(!user(None, None).has_email());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&user(None, None)).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("username"));
    }
}
