//! SMS gateway outbound adapter.
//!
//! A thin HTTP implementation of the `SmsProvider` port. Delivery reports
//! arrive later through the inbound callback route.

mod http_provider;

pub use http_provider::{HttpSmsProvider, SmsGatewaySettings};
