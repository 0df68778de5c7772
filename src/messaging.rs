//! Outbound messages from users to talents.

use async_trait::async_trait;
use uuid::Uuid;

/// Delivery failure reported by a [`Messenger`].
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("message transport unavailable: {0}")]
    Transport(String),
}

/// Delivers a message to a registered user.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, recipient: Uuid, subject: &str, body: &str) -> Result<(), MessengerError>;
}

/// Records messages in the application log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    async fn send(&self, recipient: Uuid, subject: &str, body: &str) -> Result<(), MessengerError> {
        log::info!(
            "Message for {} ({} chars): {}",
            recipient,
            body.chars().count(),
            subject
        );
        Ok(())
    }
}
