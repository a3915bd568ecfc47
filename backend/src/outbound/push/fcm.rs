//! Reqwest-backed FCM HTTP v1 adapter.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::domain::ports::{PushProvider, PushProviderError};
use crate::domain::{DeviceToken, PushNotification};

const FCM_BASE_URL: &str = "https://fcm.googleapis.com/v1/";

/// Project and credentials for the FCM v1 API.
pub struct FcmSettings {
    pub project_id: String,
    /// OAuth2 access token with the `firebase.messaging` scope.
    pub access_token: Zeroizing<String>,
    /// Override for the API base, used against emulators.
    pub base_url: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendRequestDto<'a> {
    message: MessageDto<'a>,
}

#[derive(Debug, Serialize)]
struct MessageDto<'a> {
    token: &'a str,
    notification: NotificationDto<'a>,
    android: AndroidDto,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
struct NotificationDto<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct AndroidDto {
    priority: &'static str,
}

pub struct FcmPushProvider {
    client: Client,
    send_url: Url,
    access_token: Zeroizing<String>,
}

impl FcmPushProvider {
    /// # Errors
    ///
    /// Returns [`PushProviderError::Transport`] when the client cannot be
    /// built or the project id does not form a valid URL.
    pub fn new(settings: FcmSettings) -> Result<Self, PushProviderError> {
        let base = match settings.base_url {
            Some(url) => url,
            None => Url::parse(FCM_BASE_URL)
                .map_err(|err| PushProviderError::transport(err.to_string()))?,
        };
        let send_url = base
            .join(&format!("projects/{}/messages:send", settings.project_id))
            .map_err(|err| PushProviderError::transport(err.to_string()))?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| PushProviderError::transport(err.to_string()))?;
        Ok(Self {
            client,
            send_url,
            access_token: settings.access_token,
        })
    }
}

fn request_body<'a>(
    token: &'a DeviceToken,
    notification: &'a PushNotification,
) -> SendRequestDto<'a> {
    let mut data = BTreeMap::new();
    if let Some(record) = notification.record {
        data.insert("recordId", record.to_string());
    }
    SendRequestDto {
        message: MessageDto {
            token: token.as_str(),
            notification: NotificationDto {
                title: &notification.title,
                body: &notification.body,
            },
            android: AndroidDto { priority: "high" },
            data,
        },
    }
}

#[async_trait]
impl PushProvider for FcmPushProvider {
    async fn send(
        &self,
        token: &DeviceToken,
        notification: &PushNotification,
    ) -> Result<(), PushProviderError> {
        let response = self
            .client
            .post(self.send_url.clone())
            .bearer_auth(self.access_token.as_str())
            .json(&request_body(token, notification))
            .send()
            .await
            .map_err(|err| PushProviderError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> PushProviderError {
    let message = format!("fcm returned {status}: {}", body.trim());
    match status {
        // Unregistered or malformed tokens.
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => PushProviderError::rejected(message),
        _ => PushProviderError::transport(message),
    }
}
