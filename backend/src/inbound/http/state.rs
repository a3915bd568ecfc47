//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DeviceRegistration, FormGeneration, LoginService, LookupsQuery, PhotoUploads, RecordsCommand,
    RecordsQuery, SmsNotifications,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub devices: Arc<dyn DeviceRegistration>,
    pub records: Arc<dyn RecordsCommand>,
    pub records_query: Arc<dyn RecordsQuery>,
    pub photos: Arc<dyn PhotoUploads>,
    pub forms: Arc<dyn FormGeneration>,
    pub sms: Arc<dyn SmsNotifications>,
    pub lookups: Arc<dyn LookupsQuery>,
}
