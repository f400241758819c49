/// Authentication and authorization
///
/// - `jwt`: Access/refresh token creation and validation
/// - `password`: Argon2id hashing and strength checks
/// - `middleware`: Axum middleware injecting the authenticated subject
/// - `policy`: Object-level access rules for projects and tasks

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
