//! Backend entry-point: loads settings, prepares storage and serves the API.

use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tourism_backend::server::{ServerSettings, start};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let server = start(&settings).await.map_err(|e| {
        error!(error = %e, "startup failed");
        std::io::Error::other(e.to_string())
    })?;
    server.await
}
