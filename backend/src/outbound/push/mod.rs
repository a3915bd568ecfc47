//! Push notification outbound adapters.
//!
//! - [`FcmPushProvider`] sends one message per device through the FCM HTTP
//!   v1 API.
//! - [`RedisDeviceTokenStore`] keeps the registered device tokens in a
//!   single Redis set shared by every server process.

mod fcm;
mod redis_tokens;

pub use fcm::{FcmPushProvider, FcmSettings};
pub use redis_tokens::{RedisDeviceTokenStore, TOKEN_SET_KEY};
