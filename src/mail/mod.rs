//! Mail delivery
//!
//! Two transports: an outbox directory for local use and a JSON webhook for
//! an HTTP mail relay.

mod outbox;
mod webhook;

pub use outbox::OutboxMailer;
pub use webhook::WebhookMailer;

use crate::error::Result;
use crate::types::EmailMessage;
use async_trait::async_trait;

/// Sends a prepared message; may fail on quota or transport errors
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    async fn send_email(&self, message: &EmailMessage) -> Result<()>;
}
