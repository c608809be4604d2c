//! Guest notification infrastructure for the reservation core.
//!
//! - [`Notification`]: a rendered plain-text message with its recipient.
//! - [`message`]: builders for the messages the core sends (OTP codes,
//!   booking confirmations, cancellations).
//! - [`Notifier`]: the delivery seam. [`SmtpNotifier`] sends through an SMTP
//!   relay; [`LogNotifier`] only logs and is used when SMTP is not configured.
//!
//! Delivery is always best-effort: callers log failures and carry on.

pub mod delivery;
pub mod message;

pub use delivery::email::{EmailConfig, EmailError, SmtpNotifier};
pub use delivery::log::LogNotifier;
pub use delivery::{DeliveryError, Notifier};
pub use message::Notification;
