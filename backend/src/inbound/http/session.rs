//! Logged-in identity carried in the session cookie.
//!
//! The session stores the user id and display name written at login.
//! Handlers turn it into a [`Caller`], which is the only thing the domain
//! services accept. A session whose id no longer parses counts as logged
//! out.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Caller, Error, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_NAME_KEY: &str = "user_name";

/// Identity kept in the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `user`.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id().get())
            .and_then(|()| self.0.insert(USER_NAME_KEY, user.name()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The logged-in user, if any.
    pub fn user(&self) -> Result<Option<SessionUser>, Error> {
        let read = |error: actix_session::SessionGetError| {
            Error::internal(format!("failed to read session: {error}"))
        };
        let Some(raw) = self.0.get::<i32>(USER_ID_KEY).map_err(read)? else {
            return Ok(None);
        };
        let id = match UserId::new(raw) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session");
                return Ok(None);
            }
        };
        let name = self.0.get::<String>(USER_NAME_KEY).map_err(read)?;
        Ok(Some(SessionUser {
            id,
            name: name.unwrap_or_default(),
        }))
    }

    /// Require a logged-in user or return `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<Caller, Error> {
        self.user()?
            .map(|user| Caller::new(user.id))
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the session from the store and expire the cookie.
    pub fn end(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
