//! SMS dispatch and delivery correlation.
//!
//! A send moves through `Sent -> Delivered | Failed`. The correlation id is
//! registered before the provider is called so a fast callback cannot slip
//! past, and the waiting request is only woken by the callback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::correlation::{CorrelationId, DeliveryOutcome, PendingDeliveries};
use crate::domain::ports::{
    LookupRepository, RecordRepository, SmsNotifications, SmsProvider, SmsProviderError,
};
use crate::domain::repository_errors::{map_lookup_error, map_record_error};
use crate::domain::{Caller, Error, RecordId, StoredRecord, Store};

/// Message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsKind {
    /// Ready for pickup; needs the store's name, address and phone.
    Repaired,
    /// Could not be repaired.
    Unrepairable,
    /// Thank-you with the store's review link.
    Thanks,
}

impl SmsKind {
    pub fn needs_store(self) -> bool {
        matches!(self, Self::Repaired | Self::Thanks)
    }
}

/// Message handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundSms {
    pub correlation_id: CorrelationId,
    pub to: String,
    pub text: String,
}

/// Delivery callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    pub message_id: CorrelationId,
    pub delivery_status_code: i32,
}

/// Returned once the provider reports the message delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsReceipt {
    pub message_id: CorrelationId,
    pub record_id: RecordId,
    pub kind: SmsKind,
    pub to: String,
}

/// Text for `kind`, or `None` when the template cannot be filled.
pub fn compose_message(kind: SmsKind, record: &StoredRecord, store: Option<&Store>) -> Option<String> {
    let product = record.fields.product.product.trim();
    match (kind, store) {
        (SmsKind::Repaired, Some(store)) => Some(format!(
            "Your {product} (ticket #{id}) is repaired and ready for pickup at {name}, {address}. Call {phone} for details.",
            id = record.id,
            name = store.name,
            address = store.address,
            phone = store.phone,
        )),
        (SmsKind::Thanks, Some(store)) => Some(format!(
            "Thank you for choosing {name}! Tell us how we did: {link}",
            name = store.name,
            link = store.review_link,
        )),
        (SmsKind::Unrepairable, _) => Some(format!(
            "Unfortunately your {product} (ticket #{id}) could not be repaired. You may collect it at any time.",
            id = record.id,
        )),
        (SmsKind::Repaired | SmsKind::Thanks, None) => None,
    }
}

fn map_provider_error(error: SmsProviderError) -> Error {
    match error {
        SmsProviderError::Timeout { message } => {
            Error::integration_timeout(format!("sms provider timed out: {message}"))
        }
        other => Error::upstream_failure(other.to_string()),
    }
}

/// Removes the pending entry if the waiting request is dropped first.
struct PendingGuard<'a> {
    pending: &'a PendingDeliveries,
    id: CorrelationId,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.pending.cancel(&self.id) {
            debug!(message_id = %self.id, "sms waiter left before delivery report");
        }
    }
}

/// SMS service owning the correlation table.
pub struct SmsDispatcher<R, L, P> {
    records: Arc<R>,
    lookups: Arc<L>,
    provider: Arc<P>,
    pending: PendingDeliveries,
    delivered_code: i32,
}

impl<R, L, P> SmsDispatcher<R, L, P> {
    /// `delivered_code` is the provider's delivery status meaning success;
    /// every other code is a failure.
    pub fn new(records: Arc<R>, lookups: Arc<L>, provider: Arc<P>, delivered_code: i32) -> Self {
        Self {
            records,
            lookups,
            provider,
            pending: PendingDeliveries::new(),
            delivered_code,
        }
    }

    pub fn pending(&self) -> &PendingDeliveries {
        &self.pending
    }
}

impl<R, L, P> SmsDispatcher<R, L, P>
where
    R: RecordRepository,
    L: LookupRepository,
    P: SmsProvider,
{
    async fn prepare(
        &self,
        caller: &Caller,
        id: RecordId,
        kind: SmsKind,
    ) -> Result<(String, String), Error> {
        let record = self
            .records
            .find(id)
            .await
            .map_err(map_record_error)?
            .ok_or_else(|| Error::not_found(format!("record {id} not found")))?;
        caller.require_owner(record.fields.mechanic)?;

        let to = record
            .fields
            .customer
            .mobile()
            .ok_or_else(|| {
                Error::invalid_request(format!("cannot send: record {id} has no mobile phone"))
            })?
            .to_owned();

        let store = if kind.needs_store() {
            self.lookups
                .find_store(record.fields.store)
                .await
                .map_err(map_lookup_error)?
        } else {
            None
        };

        let text = compose_message(kind, &record, store.as_ref()).ok_or_else(|| {
            Error::invalid_request(format!(
                "cannot send: no message text for record {id} (store {})",
                record.fields.store
            ))
            .with_details(json!({ "kind": kind, "store": record.fields.store }))
        })?;
        Ok((to, text))
    }
}

#[async_trait]
impl<R, L, P> SmsNotifications for SmsDispatcher<R, L, P>
where
    R: RecordRepository,
    L: LookupRepository,
    P: SmsProvider,
{
    async fn send(
        &self,
        caller: &Caller,
        record: RecordId,
        kind: SmsKind,
    ) -> Result<SmsReceipt, Error> {
        let (to, text) = self.prepare(caller, record, kind).await?;

        let correlation_id = CorrelationId::generate();
        let outcome = self.pending.register(correlation_id.clone());
        let mut guard = PendingGuard {
            pending: &self.pending,
            id: correlation_id.clone(),
            armed: true,
        };

        let sms = OutboundSms {
            correlation_id: correlation_id.clone(),
            to: to.clone(),
            text,
        };
        if let Err(error) = self.provider.send(&sms).await {
            warn!(message_id = %correlation_id, %error, "sms provider refused message");
            return Err(map_provider_error(error));
        }
        info!(message_id = %correlation_id, record_id = %record, ?kind, "sms sent, awaiting delivery report");

        let result = outcome.await;
        guard.armed = false;
        match result {
            Ok(DeliveryOutcome::Delivered) => Ok(SmsReceipt {
                message_id: correlation_id,
                record_id: record,
                kind,
                to,
            }),
            Ok(DeliveryOutcome::Failed { status_code }) => {
                Err(Error::upstream_failure("sms delivery failed").with_details(json!({
                    "messageId": correlation_id,
                    "deliveryStatusCode": status_code,
                })))
            }
            Err(_) => Err(Error::internal(format!(
                "sms waiter for {correlation_id} was replaced"
            ))),
        }
    }

    fn record_delivery(&self, report: DeliveryReport) -> bool {
        let outcome = if report.delivery_status_code == self.delivered_code {
            DeliveryOutcome::Delivered
        } else {
            DeliveryOutcome::Failed {
                status_code: report.delivery_status_code,
            }
        };
        let resolved = self.pending.resolve(&report.message_id, outcome);
        if resolved {
            info!(message_id = %report.message_id, ?outcome, "sms delivery report resolved");
        } else {
            debug!(message_id = %report.message_id, "delivery report for unknown message id");
        }
        resolved
    }
}

#[cfg(test)]
#[path = "sms_tests.rs"]
mod tests;
