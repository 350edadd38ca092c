use rootcause::Report;
use sso_gate_server::{auth::AppState, config::ServerConfig, error::ServerError, router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Report<ServerError>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().map_err(|e| ServerError::InvalidConfig {
        details: e.to_string(),
    })?;
    tracing::info!("Loaded configuration");

    let state = Arc::new(AppState::from_config(&config)?);
    let snapshot = state.gate.snapshot();
    tracing::info!(
        mode = ?snapshot.auth.mode,
        providers = snapshot.registry.len(),
        desktop_clients_allowed = snapshot.auth.desktop_clients_allowed,
        "request gate configured"
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: config.listen_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|e| ServerError::Serve {
            details: e.to_string(),
        })?;

    Ok(())
}
