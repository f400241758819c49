/// HTTP mail-API transport
///
/// Delivers mail by POSTing a JSON payload to a provider's HTTP endpoint
/// (any API-key-authenticated service accepting `{from, to, subject,
/// body}` works). The request is a single attempt with the client's
/// default timeouts; the provider's failure reason beyond the status code
/// is not inspected.

use async_trait::async_trait;
use serde::Serialize;

use super::{MailError, Mailer};

/// Mailer posting messages to an HTTP mail API
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

/// Wire payload sent to the provider
#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl HttpMailer {
    /// Creates a mailer for the given endpoint and sender address
    ///
    /// `api_key`, when present, is sent as a bearer token.
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }

    /// The configured sender address
    pub fn from_address(&self) -> &str {
        &self.from
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = OutgoingMessage {
            from: &self.from,
            to,
            subject,
            body,
        };

        let mut request = self.client.post(&self.endpoint).json(&message);

        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_address() {
        let mailer = HttpMailer::new(
            "https://mail.example.com/v1/send".to_string(),
            Some("key".to_string()),
            "no-reply@taskboard.example".to_string(),
        );

        assert_eq!(mailer.from_address(), "no-reply@taskboard.example");
    }

    #[test]
    fn test_outgoing_message_serialization() {
        let message = OutgoingMessage {
            from: "no-reply@taskboard.example",
            to: "user@example.com",
            subject: "New Task Assigned",
            body: "Hello",
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"from\""));
        assert!(json.contains("\"to\""));
        assert!(json.contains("New Task Assigned"));
    }
}
