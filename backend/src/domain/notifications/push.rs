//! Push fan-out to staff devices.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::ports::{DeviceRegistration, DeviceTokenStore, PushProvider, RecordAnnouncer};
use crate::domain::repository_errors::map_device_token_error;
use crate::domain::{Error, RecordId, TraceId};

const MAX_TOKEN_LEN: usize = 4096;

/// Device token failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceTokenError {
    #[error("device token must not be empty")]
    Empty,
    #[error("device token must be at most {MAX_TOKEN_LEN} characters")]
    TooLong,
    #[error("device token must not contain whitespace")]
    Whitespace,
}

/// Opaque registration token issued to a device by the push service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceToken(String);

impl DeviceToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, DeviceTokenError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DeviceTokenError::Empty);
        }
        if raw.len() > MAX_TOKEN_LEN {
            return Err(DeviceTokenError::TooLong);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(DeviceTokenError::Whitespace);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceToken {
    type Error = DeviceTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceToken> for String {
    fn from(value: DeviceToken) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceToken {
    // Logs only ever see a prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "{prefix}…")
    }
}

/// Payload sent to every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub record: Option<RecordId>,
}

impl PushNotification {
    pub const NEW_RECORD_TITLE: &'static str = "Repair desk";
    pub const NEW_RECORD_BODY: &'static str = "A new repair record was created";

    pub fn new_record(record: RecordId) -> Self {
        Self {
            title: Self::NEW_RECORD_TITLE.to_owned(),
            body: Self::NEW_RECORD_BODY.to_owned(),
            record: Some(record),
        }
    }
}

/// Result of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Push service: device registration and new-record broadcasts.
pub struct PushDispatcher<T, P> {
    tokens: Arc<T>,
    provider: Arc<P>,
}

impl<T, P> Clone for PushDispatcher<T, P> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<T, P> PushDispatcher<T, P> {
    pub fn new(tokens: Arc<T>, provider: Arc<P>) -> Self {
        Self { tokens, provider }
    }
}

impl<T, P> PushDispatcher<T, P>
where
    T: DeviceTokenStore,
    P: PushProvider,
{
    /// Send `notification` to every registered device. Per-device failures
    /// are logged and counted, never returned.
    pub async fn fan_out(&self, notification: &PushNotification) -> FanOutSummary {
        let tokens = match self.tokens.list().await {
            Ok(tokens) => tokens,
            Err(error) => {
                warn!(%error, "could not read device tokens; push skipped");
                return FanOutSummary::default();
            }
        };
        if tokens.is_empty() {
            debug!("no registered devices; push skipped");
            return FanOutSummary::default();
        }

        let mut summary = FanOutSummary::default();
        for token in &tokens {
            match self.provider.send(token, notification).await {
                Ok(()) => summary.delivered += 1,
                Err(error) => {
                    summary.failed += 1;
                    warn!(device = %token, %error, "push delivery failed");
                }
            }
        }
        info!(
            delivered = summary.delivered,
            failed = summary.failed,
            "push fan-out finished"
        );
        summary
    }
}

impl<T, P> RecordAnnouncer for PushDispatcher<T, P>
where
    T: DeviceTokenStore + 'static,
    P: PushProvider + 'static,
{
    fn announce_new_record(&self, record: RecordId) {
        let dispatcher = self.clone();
        tokio::spawn(TraceId::inherit(async move {
            dispatcher
                .fan_out(&PushNotification::new_record(record))
                .await;
        }));
    }
}

#[async_trait]
impl<T, P> DeviceRegistration for PushDispatcher<T, P>
where
    T: DeviceTokenStore,
    P: PushProvider,
{
    async fn register_device(&self, token: &DeviceToken) -> Result<(), Error> {
        self.tokens
            .add(token)
            .await
            .map_err(map_device_token_error)?;
        debug!(device = %token, "device registered for push");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DeviceTokenStoreError, MockDeviceTokenStore, MockPushProvider, PushProviderError,
    };
    use crate::domain::test_fixtures::record_id;
    use rstest::rstest;

    fn token(raw: &str) -> DeviceToken {
        DeviceToken::new(raw).expect("valid token")
    }

    fn store_with(tokens: Vec<DeviceToken>) -> MockDeviceTokenStore {
        let mut store = MockDeviceTokenStore::new();
        store.expect_list().returning(move || Ok(tokens.clone()));
        store
    }

    #[rstest]
    #[tokio::test]
    async fn no_tokens_means_no_provider_call() {
        let mut provider = MockPushProvider::new();
        provider.expect_send().times(0);
        let dispatcher = PushDispatcher::new(Arc::new(store_with(Vec::new())), Arc::new(provider));

        let summary = dispatcher
            .fan_out(&PushNotification::new_record(record_id(1)))
            .await;

        assert_eq!(summary, FanOutSummary::default());
    }

    #[rstest]
    #[tokio::test]
    async fn one_failing_device_does_not_stop_the_others() {
        let mut provider = MockPushProvider::new();
        provider.expect_send().times(3).returning(|token, _| {
            if token.as_str() == "bad" {
                Err(PushProviderError::rejected("unregistered"))
            } else {
                Ok(())
            }
        });
        let dispatcher = PushDispatcher::new(
            Arc::new(store_with(vec![token("a"), token("bad"), token("c")])),
            Arc::new(provider),
        );

        let summary = dispatcher
            .fan_out(&PushNotification::new_record(record_id(1)))
            .await;

        assert_eq!(
            summary,
            FanOutSummary {
                delivered: 2,
                failed: 1
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_token_store_skips_the_push() {
        let mut store = MockDeviceTokenStore::new();
        store
            .expect_list()
            .returning(|| Err(DeviceTokenStoreError::connection("redis down")));
        let mut provider = MockPushProvider::new();
        provider.expect_send().times(0);
        let dispatcher = PushDispatcher::new(Arc::new(store), Arc::new(provider));

        let summary = dispatcher
            .fan_out(&PushNotification::new_record(record_id(1)))
            .await;

        assert_eq!(summary.delivered + summary.failed, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_store_failures() {
        let mut store = MockDeviceTokenStore::new();
        store
            .expect_add()
            .returning(|_| Err(DeviceTokenStoreError::connection("redis down")));
        let dispatcher = PushDispatcher::new(Arc::new(store), Arc::new(MockPushProvider::new()));

        let err = dispatcher
            .register_device(&token("abc"))
            .await
            .expect_err("store down");

        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    fn invalid_tokens_are_rejected(#[case] raw: &str) {
        assert!(DeviceToken::new(raw).is_err());
    }

    #[rstest]
    fn display_shows_only_a_prefix() {
        let shown = token("0123456789abcdef").to_string();
        assert!(!shown.contains("89abcdef"));
    }
}
