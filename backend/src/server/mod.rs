//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerSettings, SettingsError};
pub use state_builders::{Repositories, build_http_state};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use thiserror::Error;
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::LanguageCode;
use crate::inbound::http::api::api_scope;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::language::DefaultLanguage;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DbPool, MigrationError, PoolError, run_migrations};

/// Failures that stop the server before it starts listening.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to start HTTP server: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the per-worker app factory clones.
#[derive(Clone)]
pub struct AppDependencies {
    /// Probe flags shared with the server handle.
    pub health_state: web::Data<HealthState>,
    /// Driving ports behind `/api/v1`.
    pub http_state: HttpState,
    /// Language applied to requests that name none.
    pub default_language: LanguageCode,
}

/// Assemble the application: trace middleware, health probes, the
/// versioned API and, in debug builds, Swagger UI.
pub fn build_app(
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
        default_language,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(DefaultLanguage(default_language)))
        .wrap(Trace)
        .service(api_scope(&http_state))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Pick the repositories for the configured storage.
///
/// With a database URL the pending migrations run first (unless disabled),
/// then the pool is built. Without one every adapter is in memory.
///
/// # Errors
///
/// Returns [`StartupError`] when migrations fail or the pool cannot be built.
pub async fn prepare_repositories(settings: &ServerSettings) -> Result<Repositories, StartupError> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; content is kept in memory and lost on restart");
        return Ok(Repositories::in_memory());
    };

    if settings.run_migrations() {
        run_migrations(pool_config.database_url().to_owned()).await?;
    } else {
        info!("skipping embedded migrations");
    }

    let pool = DbPool::new(pool_config).await?;
    if let Err(error) = pool.ping().await {
        warn!(%error, "database not reachable yet; requests will retry on checkout");
    }
    Ok(Repositories::postgres(&pool))
}

/// Construct the Actix HTTP server.
///
/// Readiness is flipped once the socket is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(deps: AppDependencies, bind_addr: SocketAddr) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    info!(%bind_addr, "listening");
    Ok(server)
}

/// Load-to-listen in one step: validate settings, prepare storage and start
/// the server.
///
/// # Errors
///
/// Returns [`StartupError`] for invalid settings or any startup failure.
pub async fn start(settings: &ServerSettings) -> Result<Server, StartupError> {
    let bind_addr = settings.bind_addr()?;
    let default_language = settings.default_language()?;
    let attempts = settings.reference_allocation_attempts()?;

    let repositories = prepare_repositories(settings).await?;
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: build_http_state(&repositories, attempts),
        default_language,
    };
    Ok(create_server(deps, bind_addr)?)
}
