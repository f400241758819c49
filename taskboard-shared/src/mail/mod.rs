/// Outbound email transport
///
/// Email is delivered synchronously and best-effort: one attempt, no
/// retry, no queueing, no fallback channel. A failed send is solely a
/// reporting event for the caller.
///
/// # Transport Contract
///
/// All transports implement the [`Mailer`] trait:
/// 1. Accept recipient, subject, and body
/// 2. Return `Ok(())` once the message is handed to the provider
/// 3. Return a [`MailError`] on any transport or provider failure
///
/// # Implementations
///
/// - [`http::HttpMailer`]: POSTs to an HTTP mail-API endpoint
/// - [`NoopMailer`]: discards mail; development fallback when no
///   transport is configured
/// - [`mock::MockMailer`]: records sends in memory for tests
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::mail::{Mailer, NoopMailer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = NoopMailer;
/// mailer.send("user@example.com", "Hello", "A message body").await?;
/// # Ok(())
/// # }
/// ```

pub mod http;
pub mod mock;

use async_trait::async_trait;

pub use http::HttpMailer;
pub use mock::MockMailer;

/// Mail transport error types
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The transport itself failed (connection, TLS, timeout)
    #[error("Mail transport failed: {0}")]
    Transport(String),

    /// The provider rejected the message
    #[error("Mail rejected by provider with status {status}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
    },
}

/// Mail transport trait
///
/// Implementations deliver one message per call, synchronously from the
/// caller's point of view.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a single plain-text message
    ///
    /// # Errors
    ///
    /// Returns a `MailError` if delivery fails; callers decide whether
    /// that is fatal (inside the lifecycle hook it never is).
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Transport that silently discards mail
///
/// Used when no mail endpoint is configured, so development setups run
/// without a provider account.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), MailError> {
        tracing::debug!(recipient = %to, subject = %subject, "No mail transport configured, discarding message");
        Ok(())
    }
}
