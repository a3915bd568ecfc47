//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};

use super::state::HttpState;
use crate::domain::ports::{
    MockDeviceRegistration, MockFormGeneration, MockLoginService, MockLookupsQuery,
    MockPhotoUploads, MockRecordsCommand, MockRecordsQuery, MockSmsNotifications,
};
use crate::domain::{User, UserId};

/// Build a session middleware configured for tests.
///
/// Fresh key per call, cookie named `session`, no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocks for every driving port; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub devices: MockDeviceRegistration,
    pub records: MockRecordsCommand,
    pub records_query: MockRecordsQuery,
    pub photos: MockPhotoUploads,
    pub forms: MockFormGeneration,
    pub sms: MockSmsNotifications,
    pub lookups: MockLookupsQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            devices: Arc::new(self.devices),
            records: Arc::new(self.records),
            records_query: Arc::new(self.records_query),
            photos: Arc::new(self.photos),
            forms: Arc::new(self.forms),
            sms: Arc::new(self.sms),
            lookups: Arc::new(self.lookups),
        })
    }
}

/// Route that logs in as `id` without credentials, for handler tests.
pub const TEST_LOGIN_PATH: &str = "/test-login/{id}";

pub async fn test_login(
    session: super::session::SessionContext,
    path: web::Path<i32>,
) -> Result<actix_web::HttpResponse, crate::domain::Error> {
    let id = UserId::new(path.into_inner())
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    session.persist_user(&User::new(id, format!("user {id}"), format!("user{id}")))?;
    Ok(actix_web::HttpResponse::Ok().finish())
}

/// Log in through [`TEST_LOGIN_PATH`] and return the session cookie.
pub async fn login_as<S>(app: &S, id: i32) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test-login/{id}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
