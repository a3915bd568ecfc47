//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers resolve the [`session::SessionContext`] into a caller, parse
//! path and body input, then delegate to the driving ports bundled in
//! [`state::HttpState`]. Domain errors map onto status codes in [`error`].

pub mod error;
pub mod forms;
pub mod health;
pub mod history;
pub mod lookups;
pub mod media;
pub mod records;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod sms;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
