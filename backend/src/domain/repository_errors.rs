//! Translation of driven-port errors into domain errors.
//!
//! Connection failures surface as `service_unavailable`, foreign-key
//! violations as `invalid_request`, everything else as `internal_error`.

use serde_json::json;

use super::Error;
use super::ports::{
    DeviceTokenStoreError, FileStorageError, HistoryRepositoryError, LookupRepositoryError,
    PhotoRepositoryError, RecordRepositoryError, UserRepositoryError,
};

fn reference(message: String) -> Error {
    Error::invalid_request("payload references a row that does not exist")
        .with_details(json!({ "reason": message }))
}

pub(crate) fn map_record_error(error: RecordRepositoryError) -> Error {
    match error {
        RecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("record repository unavailable: {message}"))
        }
        RecordRepositoryError::Query { message } => {
            Error::internal(format!("record repository error: {message}"))
        }
        RecordRepositoryError::Reference { message } => reference(message),
    }
}

pub(crate) fn map_history_error(error: HistoryRepositoryError) -> Error {
    match error {
        HistoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("history repository unavailable: {message}"))
        }
        HistoryRepositoryError::Query { message } => {
            Error::internal(format!("history repository error: {message}"))
        }
        HistoryRepositoryError::Reference { message } => reference(message),
    }
}

pub(crate) fn map_photo_error(error: PhotoRepositoryError) -> Error {
    match error {
        PhotoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("photo repository unavailable: {message}"))
        }
        PhotoRepositoryError::Query { message } => {
            Error::internal(format!("photo repository error: {message}"))
        }
        PhotoRepositoryError::Reference { message } => reference(message),
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_lookup_error(error: LookupRepositoryError) -> Error {
    match error {
        LookupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("lookup repository unavailable: {message}"))
        }
        LookupRepositoryError::Query { message } => {
            Error::internal(format!("lookup repository error: {message}"))
        }
    }
}

pub(crate) fn map_device_token_error(error: DeviceTokenStoreError) -> Error {
    match error {
        DeviceTokenStoreError::Connection { message } => {
            Error::service_unavailable(format!("device token store unavailable: {message}"))
        }
        DeviceTokenStoreError::Command { message } => {
            Error::internal(format!("device token store error: {message}"))
        }
    }
}

pub(crate) fn map_storage_error(error: FileStorageError) -> Error {
    match error {
        FileStorageError::InvalidName { name } => {
            Error::invalid_request(format!("invalid file name: {name}"))
        }
        FileStorageError::Io { message } => Error::internal(format!("file storage error: {message}")),
    }
}
