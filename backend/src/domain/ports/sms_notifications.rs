//! Driving port for customer SMS notifications.

use async_trait::async_trait;

use crate::domain::{Caller, DeliveryReport, Error, RecordId, SmsKind, SmsReceipt};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsNotifications: Send + Sync {
    /// Send the templated message and wait for its delivery report.
    ///
    /// There is no time limit: the future completes only once the provider
    /// calls back.
    async fn send(&self, caller: &Caller, record: RecordId, kind: SmsKind)
    -> Result<SmsReceipt, Error>;

    /// Resolve the pending send matching `report`. Returns `false` when no
    /// send is waiting on that id.
    fn record_delivery(&self, report: DeliveryReport) -> bool;
}
