//! Customer SMS and staff push notifications.
//!
//! The two halves are independent: [`SmsDispatcher`] correlates each send
//! with its delivery callback, [`PushDispatcher`] fans a fixed message out to
//! every registered device whenever a record is created.

mod correlation;
mod push;
mod sms;

pub use correlation::{CorrelationId, DeliveryOutcome, PendingDeliveries};
pub use push::{DeviceToken, DeviceTokenError, FanOutSummary, PushDispatcher, PushNotification};
pub use sms::{DeliveryReport, OutboundSms, SmsDispatcher, SmsKind, SmsReceipt, compose_message};
