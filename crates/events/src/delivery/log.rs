//! Log-only delivery channel.

use async_trait::async_trait;

use super::{DeliveryError, Notifier};
use crate::message::Notification;

/// Writes notifications to the tracing log instead of sending them.
///
/// The body is logged at `debug` only, since it may contain a one-time code.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Notification delivery skipped (no SMTP configured)"
        );
        tracing::debug!(body = %notification.body, "Undelivered notification body");
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "log"
    }
}
