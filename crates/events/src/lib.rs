//! Quakewatch notification delivery.
//!
//! This crate provides the building blocks for pushing an alert out of the
//! process:
//!
//! - [`NotificationChannel`] — the uniform `send(message)` capability.
//! - [`delivery`] — concrete channels (SMS, email, webhook).
//! - [`NotificationDispatcher`] — fans one message out to every channel and
//!   isolates failures per channel.
//! - [`DispatchReport`] — per-channel outcome of one dispatch.

pub mod delivery;
pub mod dispatcher;
pub mod report;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::sms::{SmsConfig, SmsDelivery};
pub use delivery::webhook::WebhookDelivery;
pub use delivery::{ChannelError, NotificationChannel};
pub use dispatcher::NotificationDispatcher;
pub use report::{ChannelOutcome, DispatchReport};
