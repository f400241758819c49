/// Mock mail transport for tests
///
/// Records every message handed to it instead of delivering anything,
/// and can be switched into a failing mode to exercise the caller's
/// error handling.
///
/// # Example
///
/// ```
/// use taskboard_shared::mail::{Mailer, MockMailer};
///
/// # async fn example() {
/// let mailer = MockMailer::new();
/// mailer.send("user@example.com", "Hi", "body").await.unwrap();
///
/// assert_eq!(mailer.sent_count(), 1);
/// assert_eq!(mailer.sent()[0].to, "user@example.com");
/// # }
/// ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{MailError, Mailer};

/// A message captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Message body
    pub body: String,
}

/// Recording mail transport
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl MockMailer {
    /// Creates a mock that accepts every message
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose sends all fail
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    /// Switches failure mode on or off
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of every message captured so far
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("mock mailer lock poisoned").clone()
    }

    /// Number of messages captured
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock mailer lock poisoned").len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("mock transport failure".to_string()));
        }

        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_messages() {
        let mailer = MockMailer::new();

        mailer.send("a@example.com", "first", "1").await.unwrap();
        mailer.send("b@example.com", "second", "2").await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[1].subject, "second");
    }

    #[tokio::test]
    async fn test_failing_mock_records_nothing() {
        let mailer = MockMailer::failing();

        let result = mailer.send("a@example.com", "s", "b").await;
        assert!(result.is_err());
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_mode_can_be_toggled() {
        let mailer = MockMailer::new();
        mailer.set_failing(true);
        assert!(mailer.send("a@example.com", "s", "b").await.is_err());

        mailer.set_failing(false);
        assert!(mailer.send("a@example.com", "s", "b").await.is_ok());
        assert_eq!(mailer.sent_count(), 1);
    }
}
