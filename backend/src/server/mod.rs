//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;
pub(crate) use state_builders::{Adapters, Policies, build_http_state};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::RedisSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use repair_desk::Trace;
#[cfg(debug_assertions)]
use repair_desk::doc::ApiDoc;
use repair_desk::domain::Error;
use repair_desk::inbound::http::forms::{create_form, download_form};
use repair_desk::inbound::http::health::{HealthState, live, ready};
use repair_desk::inbound::http::history::{get_history, list_history};
use repair_desk::inbound::http::lookups::get_lookups;
use repair_desk::inbound::http::media::upload_photos;
use repair_desk::inbound::http::records::{
    create_record, delete_record, edit_record, get_record, list_records, list_records_by_mechanic,
};
use repair_desk::inbound::http::sms::{delivery_callback, delivery_callback_query, send_sms};
use repair_desk::inbound::http::state::HttpState;
use repair_desk::inbound::http::users::{login, logout};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session_store: RedisSessionStore,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl: Duration,
}

/// Malformed JSON and query strings answer with the usual error payload.
fn input_configs() -> (web::JsonConfig, web::QueryConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_request(err.to_string()).into());
    let query = web::QueryConfig::default()
        .error_handler(|err, _req| Error::invalid_request(err.to_string()).into());
    (json, query)
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session_store,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let session = SessionMiddleware::builder(session_store, key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();
    let (json_config, query_config) = input_configs();

    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(json_config)
        .app_data(query_config)
        .service(login)
        .service(logout)
        .service(list_records)
        .service(list_records_by_mechanic)
        .service(create_record)
        .service(get_record)
        .service(edit_record)
        .service(delete_record)
        .service(get_history)
        .service(list_history)
        .service(upload_photos)
        .service(create_form)
        .service(download_form)
        .service(send_sms)
        .service(delivery_callback)
        .service(delivery_callback_query)
        .service(get_lookups);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        session_ttl,
        session_store,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session_store: session_store.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
