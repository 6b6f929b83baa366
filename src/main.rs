use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;

use notical_core::{CalendarStore, NoticalConfig};
use notical_server::extract::ExtractionClient;
use notical_server::routes;
use notical_server::singleton;
use notical_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Ensure only one instance is running
    let _lock = singleton::acquire_lock()?;

    let config_path = match std::env::var("NOTICAL_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => NoticalConfig::config_path()?,
    };
    let config = NoticalConfig::load(&config_path)?;
    let tz = config.timezone()?;
    let api_key = config.api_key()?;

    let store = CalendarStore::new(&config.calendar_file, tz);
    if store.init_if_missing()? {
        log::info!(
            "created empty calendar document at {}",
            config.calendar_file.display()
        );
    }

    let extractor = ExtractionClient::new(
        config.api_base_url.clone(),
        api_key,
        config.model.clone(),
        tz,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let state = AppState::new(Arc::new(store), Arc::new(extractor), tz);

    // The front end is served cross-origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::events::router())
        .route_service("/", ServeFile::new(&config.index_file))
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("notical-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
