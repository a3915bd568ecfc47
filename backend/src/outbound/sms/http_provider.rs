//! Reqwest-backed SMS gateway adapter.
//!
//! The adapter owns transport details only: request serialisation, the
//! request timeout, and HTTP status mapping. The correlation id is sent as
//! the gateway's client message id so the delivery callback can echo it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::OutboundSms;
use crate::domain::ports::{SmsProvider, SmsProviderError};

/// Gateway endpoint and account settings.
pub struct SmsGatewaySettings {
    /// Message submission endpoint.
    pub endpoint: Url,
    /// Bearer token for the gateway account.
    pub api_key: Zeroizing<String>,
    /// Sender id shown on the handset.
    pub sender: String,
    /// Public URL of `POST /api/v1/sms/callback`.
    pub callback_url: Url,
    /// Budget for the submission request itself.
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitMessageDto<'a> {
    to: &'a str,
    text: &'a str,
    sender: &'a str,
    client_message_id: &'a str,
    callback_url: &'a str,
}

pub struct HttpSmsProvider {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
    sender: String,
    callback_url: Url,
}

impl HttpSmsProvider {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: SmsGatewaySettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
            sender: settings.sender,
            callback_url: settings.callback_url,
        })
    }

    fn payload<'a>(&'a self, sms: &'a OutboundSms) -> SubmitMessageDto<'a> {
        SubmitMessageDto {
            to: &sms.to,
            text: &sms.text,
            sender: &self.sender,
            client_message_id: sms.correlation_id.as_str(),
            callback_url: self.callback_url.as_str(),
        }
    }
}

#[async_trait]
impl SmsProvider for HttpSmsProvider {
    async fn send(&self, sms: &OutboundSms) -> Result<(), SmsProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&self.payload(sms))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(message_id = %sms.correlation_id, "sms accepted by gateway");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> SmsProviderError {
    if error.is_timeout() {
        SmsProviderError::timeout(error.to_string())
    } else {
        SmsProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SmsProviderError {
    let message = format!("gateway returned {status}: {}", body_preview(body));
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            SmsProviderError::timeout(message)
        }
        status if status.is_client_error() => SmsProviderError::rejected(message),
        _ => SmsProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
