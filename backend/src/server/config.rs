//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_session::storage::RedisSessionStore;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};

use repair_desk::inbound::http::session_config::SessionSettings;

/// Everything the server needs besides the HTTP state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: Duration,
    pub(crate) session_store: RedisSessionStore,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        session: SessionSettings,
        session_store: RedisSessionStore,
        bind_addr: SocketAddr,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            session_ttl: Duration::hours(12),
            session_store,
        }
    }

    /// Idle lifetime of a login session.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}
