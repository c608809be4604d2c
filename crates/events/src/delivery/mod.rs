//! Delivery channels for guest notifications.

pub mod email;
pub mod log;

use async_trait::async_trait;

use crate::message::Notification;

/// Error type for a failed delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Email(#[from] email::EmailError),

    /// The channel refused the message for a reason of its own.
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Sends a rendered notification to its recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;

    /// Short channel name for log fields.
    fn channel(&self) -> &'static str;
}
