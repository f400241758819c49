/// Tests for the mail transport contract
///
/// The lifecycle hook talks to mail through `Arc<dyn Mailer>`, so these
/// tests exercise the trait-object surface the way the hook uses it.

use std::sync::Arc;

use taskboard_shared::mail::{MailError, Mailer, MockMailer, NoopMailer};

async fn notify(mailer: &Arc<dyn Mailer>, to: &str) -> Result<(), MailError> {
    mailer.send(to, "New Task Assigned", "You have a new task.").await
}

#[tokio::test]
async fn test_mailer_usable_as_trait_object() {
    let mock = Arc::new(MockMailer::new());
    let mailer: Arc<dyn Mailer> = mock.clone();

    notify(&mailer, "user@example.com").await.unwrap();

    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "user@example.com");
    assert_eq!(sent[0].subject, "New Task Assigned");
}

#[tokio::test]
async fn test_failure_is_an_error_not_a_panic() {
    let mock = Arc::new(MockMailer::failing());
    let mailer: Arc<dyn Mailer> = mock.clone();

    let result = notify(&mailer, "user@example.com").await;
    assert!(matches!(result, Err(MailError::Transport(_))));
    assert_eq!(mock.sent_count(), 0);
}

#[tokio::test]
async fn test_noop_mailer_as_trait_object() {
    let mailer: Arc<dyn Mailer> = Arc::new(NoopMailer);
    assert!(notify(&mailer, "user@example.com").await.is_ok());
}
