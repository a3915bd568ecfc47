//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, storage, providers) are implemented under
//! `outbound`; driving ports are implemented by the domain services and
//! called from `inbound::http`.

mod macros;
pub(crate) use macros::define_port_error;

mod artifact_cleanup;
mod device_registration;
mod device_token_store;
mod file_storage;
mod form_generation;
mod form_renderer;
mod history_repository;
mod login_service;
mod lookup_repository;
mod lookups_query;
mod photo_repository;
mod photo_uploads;
mod push_provider;
mod record_announcer;
mod record_repository;
mod records_command;
mod records_query;
mod sms_notifications;
mod sms_provider;
mod user_repository;

pub use artifact_cleanup::ArtifactCleanup;
#[cfg(test)]
pub use artifact_cleanup::MockArtifactCleanup;
pub use device_registration::DeviceRegistration;
#[cfg(test)]
pub use device_registration::MockDeviceRegistration;
#[cfg(test)]
pub use device_token_store::MockDeviceTokenStore;
pub use device_token_store::{DeviceTokenStore, DeviceTokenStoreError};
#[cfg(test)]
pub use file_storage::MockFileStorage;
pub use file_storage::{FileStorage, FileStorageError, StorageArea};
pub use form_generation::FormGeneration;
#[cfg(test)]
pub use form_generation::MockFormGeneration;
#[cfg(test)]
pub use form_renderer::MockFormRenderer;
pub use form_renderer::{FormRenderer, FormRendererError, RenderJob};
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{HistoryRepository, HistoryRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use lookup_repository::MockLookupRepository;
pub use lookup_repository::{LookupRepository, LookupRepositoryError};
pub use lookups_query::LookupsQuery;
#[cfg(test)]
pub use lookups_query::MockLookupsQuery;
#[cfg(test)]
pub use photo_repository::MockPhotoRepository;
pub use photo_repository::{PhotoRepository, PhotoRepositoryError};
#[cfg(test)]
pub use photo_uploads::MockPhotoUploads;
pub use photo_uploads::PhotoUploads;
#[cfg(test)]
pub use push_provider::MockPushProvider;
pub use push_provider::{PushProvider, PushProviderError};
#[cfg(test)]
pub use record_announcer::MockRecordAnnouncer;
pub use record_announcer::RecordAnnouncer;
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use records_command::MockRecordsCommand;
pub use records_command::RecordsCommand;
#[cfg(test)]
pub use records_query::MockRecordsQuery;
pub use records_query::RecordsQuery;
#[cfg(test)]
pub use sms_notifications::MockSmsNotifications;
pub use sms_notifications::SmsNotifications;
#[cfg(test)]
pub use sms_provider::MockSmsProvider;
pub use sms_provider::{SmsProvider, SmsProviderError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
