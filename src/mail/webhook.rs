//! Webhook mailer - hands messages to an HTTP mail relay

use crate::error::{Error, Result};
use crate::mail::Mailer;
use crate::types::EmailMessage;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mailer that POSTs each message as JSON to a relay endpoint
pub struct WebhookMailer {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl WebhookMailer {
    /// Create a mailer for `endpoint`, optionally authenticating with a bearer token
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Notification(format!("mail relay unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Mail relay rejected message to {}: {status}", message.to);
            return Err(Error::Notification(format!(
                "mail relay returned {status}: {}",
                body.trim()
            )));
        }

        debug!("Mail relay accepted message to {}", message.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn make_message() -> EmailMessage {
        EmailMessage {
            to: "ana@example.com".to_string(),
            subject: "Submission confirmation: North".to_string(),
            html_body: "<p>hi</p>".to_string(),
            sender_name: "Data Intake".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_with_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "to": "ana@example.com",
                "senderName": "Data Intake"
            })))
            .with_status(202)
            .create_async()
            .await;

        let mailer = WebhookMailer::new(format!("{}/send", server.url()), Some("secret".into()));
        mailer.send_email(&make_message()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_quota_error_is_notification_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(429)
            .with_body("daily quota exceeded")
            .create_async()
            .await;

        let mailer = WebhookMailer::new(format!("{}/send", server.url()), None);
        let err = mailer.send_email(&make_message()).await.unwrap_err();

        assert!(matches!(err, Error::Notification(_)));
        assert!(err.to_string().contains("quota"));
    }
}
