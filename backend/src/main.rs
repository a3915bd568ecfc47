//! Backend entry-point: loads settings, connects adapters, applies
//! migrations and serves the REST API.

mod server;

use std::io;

use actix_session::storage::RedisSessionStore;
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use repair_desk::domain::FormTemplate;
use repair_desk::inbound::http::health::HealthState;
use repair_desk::inbound::http::session_config::{BuildMode, session_settings_from_env};
use repair_desk::outbound::pdf::PdftkRenderer;
use repair_desk::outbound::persistence::{DbPool, run_pending_migrations};
use repair_desk::outbound::push::{FcmPushProvider, RedisDeviceTokenStore};
use repair_desk::outbound::sms::HttpSmsProvider;
use repair_desk::outbound::storage::LocalFileStorage;
use server::{Adapters, AppSettings, Policies, ServerConfig, build_http_state, create_server};

fn startup_error(stage: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{stage}: {err}"))
}

async fn apply_migrations(database_url: String) -> io::Result<usize> {
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| startup_error("migration task", err))?
        .map_err(|err| startup_error("migrations", err))
}

async fn load_form_template(settings: &AppSettings) -> io::Result<FormTemplate> {
    let path = settings.form_template();
    let xml = tokio::fs::read_to_string(&path)
        .await
        .map_err(|err| startup_error(&format!("form template {}", path.display()), err))?;
    FormTemplate::parse(&xml).map_err(|err| startup_error("form template", err))
}

async fn connect_adapters(settings: &AppSettings) -> io::Result<Adapters> {
    let pool_config = settings
        .pool_config()
        .map_err(|err| startup_error("settings", err))?;
    let applied = apply_migrations(pool_config.database_url().to_owned()).await?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| startup_error("database pool", err))?;
    let storage = LocalFileStorage::new(settings.storage_dirs());
    storage
        .ensure_dirs()
        .await
        .map_err(|err| startup_error("storage directories", err))?;
    let tokens = RedisDeviceTokenStore::connect(settings.token_redis_url())
        .await
        .map_err(|err| startup_error("device token store", err))?;
    let sms = settings
        .sms_settings()
        .map_err(|err| startup_error("settings", err))
        .and_then(|sms| HttpSmsProvider::new(sms).map_err(|err| startup_error("sms client", err)))?;
    let push = settings
        .fcm_settings()
        .map_err(|err| startup_error("settings", err))
        .and_then(|fcm| FcmPushProvider::new(fcm).map_err(|err| startup_error("push client", err)))?;

    Ok(Adapters {
        pool,
        tokens,
        storage,
        sms,
        push,
        renderer: PdftkRenderer::new(settings.pdftk_settings()),
        template: load_form_template(settings).await?,
    })
}

/// Fail the probes as soon as shutdown starts; actix finishes in-flight
/// requests on the same signal.
async fn drain_on_interrupt(health_state: web::Data<HealthState>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            health_state.mark_draining();
            info!("shutdown requested, draining");
        }
        Err(err) => warn!(error = %err, "cannot listen for shutdown signal"),
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| startup_error("settings", err))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("session settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("settings", err))?;

    let adapters = connect_adapters(&settings).await?;
    let session_store = RedisSessionStore::new(settings.redis_url())
        .await
        .map_err(|err| startup_error("session store", err))?;
    let http_state = build_http_state(
        adapters,
        Policies {
            upload_limits: settings.upload_limits(),
            closed_status: settings.closed_status(),
            sms_delivered_code: settings.sms_delivered_code(),
        },
    );

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, session_store, bind_addr)
        .with_session_ttl(settings.session_ttl());
    let server = create_server(health_state.clone(), http_state, config)?;
    info!(%bind_addr, "repair desk listening");
    tokio::spawn(drain_on_interrupt(health_state));
    server.await
}
