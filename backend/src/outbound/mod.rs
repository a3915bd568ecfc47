//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **storage**: local photo and form directories plus background cleanup
//! - **sms**: HTTP SMS gateway
//! - **push**: FCM push delivery and the Redis device token set
//! - **pdf**: the external form renderer process
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod pdf;
pub mod persistence;
pub mod push;
pub mod sms;
pub mod storage;
