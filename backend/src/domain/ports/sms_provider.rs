//! Port for the outbound SMS gateway.

use async_trait::async_trait;

use crate::domain::OutboundSms;

use super::define_port_error;

define_port_error! {
    /// Errors raised by SMS provider adapters.
    pub enum SmsProviderError {
        /// The gateway answered but refused the message.
        Rejected { message: String } => "sms provider rejected the message: {message}",
        /// The gateway could not be reached or answered garbage.
        Transport { message: String } => "sms provider request failed: {message}",
        /// The gateway did not answer in time.
        Timeout { message: String } => "sms provider timed out: {message}",
    }
}

/// Accepts a message for delivery. Delivery itself is reported later through
/// the status callback, keyed by the message's correlation id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, sms: &OutboundSms) -> Result<(), SmsProviderError>;
}
