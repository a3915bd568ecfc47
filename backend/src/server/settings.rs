//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file or a
//! `REPAIRS_*` environment variable. Optional values fall back to the
//! defaults below; integration credentials are required.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use repair_desk::domain::{CLOSED_STATUS, StatusId, UploadLimits};
use repair_desk::outbound::pdf::PdftkSettings;
use repair_desk::outbound::persistence::PoolConfig;
use repair_desk::outbound::push::FcmSettings;
use repair_desk::outbound::sms::SmsGatewaySettings;
use repair_desk::outbound::storage::StorageDirs;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_JAVA: &str = "java";
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMS_DELIVERED_CODE: i32 = 1;
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
const INTEGRATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Setting missing or unusable at start-up.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing(field))
}

fn parse_url(value: &str, field: &'static str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|err| SettingsError::Invalid {
        field,
        message: err.to_string(),
    })
}

/// Configuration values for the server process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REPAIRS")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    pub db_checkout_timeout_secs: Option<u64>,
    /// Redis instance backing sessions.
    pub redis_url: Option<String>,
    /// Redis instance holding push device tokens; defaults to `redis_url`.
    pub token_redis_url: Option<String>,
    pub bind_addr: Option<String>,
    pub photos_dir: Option<PathBuf>,
    pub forms_dir: Option<PathBuf>,
    /// Per-store `service{store}.pdf` layouts.
    pub layouts_dir: Option<PathBuf>,
    /// XFDF template listing the form fields.
    pub form_template: Option<PathBuf>,
    pub java_bin: Option<PathBuf>,
    pub pdftk_jar: Option<PathBuf>,
    pub render_timeout_secs: Option<u64>,
    pub sms_endpoint: Option<String>,
    pub sms_api_key: Option<String>,
    pub sms_sender: Option<String>,
    /// Public URL the gateway posts delivery reports to.
    pub sms_callback_url: Option<String>,
    /// Gateway status code meaning "delivered".
    pub sms_delivered_code: Option<i32>,
    pub fcm_project_id: Option<String>,
    pub fcm_access_token: Option<String>,
    pub fcm_base_url: Option<String>,
    pub upload_max_files: Option<usize>,
    pub upload_max_file_bytes: Option<usize>,
    /// Status code of closed records, hidden from per-mechanic lists.
    pub closed_status: Option<i32>,
    pub session_ttl_hours: Option<i64>,
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "database_url")
    }

    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let mut config = PoolConfig::new(self.database_url()?);
        if let Some(max) = self.db_max_connections {
            config = config.with_max_size(max);
        }
        if let Some(secs) = self.db_checkout_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn redis_url(&self) -> &str {
        self.redis_url.as_deref().unwrap_or(DEFAULT_REDIS_URL)
    }

    pub fn token_redis_url(&self) -> &str {
        self.token_redis_url
            .as_deref()
            .unwrap_or_else(|| self.redis_url())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
                field: "bind_addr",
                message: err.to_string(),
            })
    }

    pub fn storage_dirs(&self) -> StorageDirs {
        StorageDirs {
            photos: self
                .photos_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("data/photos")),
            forms: self
                .forms_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("data/forms")),
        }
    }

    fn layouts_dir(&self) -> PathBuf {
        self.layouts_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("layouts"))
    }

    pub fn form_template(&self) -> PathBuf {
        self.form_template
            .clone()
            .unwrap_or_else(|| self.layouts_dir().join("fields.xfdf"))
    }

    pub fn pdftk_settings(&self) -> PdftkSettings {
        PdftkSettings {
            java: self
                .java_bin
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JAVA)),
            jar: self
                .pdftk_jar
                .clone()
                .unwrap_or_else(|| self.layouts_dir().join("pdftk-all.jar")),
            layouts_dir: self.layouts_dir(),
            forms_dir: self.storage_dirs().forms,
            timeout: Duration::from_secs(
                self.render_timeout_secs
                    .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS),
            ),
        }
    }

    pub fn sms_settings(&self) -> Result<SmsGatewaySettings, SettingsError> {
        Ok(SmsGatewaySettings {
            endpoint: parse_url(
                required(self.sms_endpoint.as_deref(), "sms_endpoint")?,
                "sms_endpoint",
            )?,
            api_key: Zeroizing::new(
                required(self.sms_api_key.as_deref(), "sms_api_key")?.to_owned(),
            ),
            sender: required(self.sms_sender.as_deref(), "sms_sender")?.to_owned(),
            callback_url: parse_url(
                required(self.sms_callback_url.as_deref(), "sms_callback_url")?,
                "sms_callback_url",
            )?,
            timeout: INTEGRATION_TIMEOUT,
        })
    }

    pub fn sms_delivered_code(&self) -> i32 {
        self.sms_delivered_code
            .unwrap_or(DEFAULT_SMS_DELIVERED_CODE)
    }

    pub fn fcm_settings(&self) -> Result<FcmSettings, SettingsError> {
        Ok(FcmSettings {
            project_id: required(self.fcm_project_id.as_deref(), "fcm_project_id")?.to_owned(),
            access_token: Zeroizing::new(
                required(self.fcm_access_token.as_deref(), "fcm_access_token")?.to_owned(),
            ),
            base_url: self
                .fcm_base_url
                .as_deref()
                .map(|raw| parse_url(raw, "fcm_base_url"))
                .transpose()?,
            timeout: INTEGRATION_TIMEOUT,
        })
    }

    pub fn upload_limits(&self) -> UploadLimits {
        let defaults = UploadLimits::default();
        UploadLimits {
            max_files: self.upload_max_files.unwrap_or(defaults.max_files),
            max_file_bytes: self
                .upload_max_file_bytes
                .unwrap_or(defaults.max_file_bytes),
        }
    }

    pub fn closed_status(&self) -> StatusId {
        self.closed_status.map_or(CLOSED_STATUS, StatusId)
    }

    pub fn session_ttl(&self) -> actix_web::cookie::time::Duration {
        actix_web::cookie::time::Duration::hours(
            self.session_ttl_hours
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        )
    }
}
