//! Binary entry point: loads the rate catalog, wires the availability
//! client and serves the HTTP adapter.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use parking_engine::api::{create_router, AppState};
use parking_engine::availability::LtaClient;
use parking_engine::catalog::CatalogLoader;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog_dir =
        std::env::var("CATALOG_DIR").unwrap_or_else(|_| "./config/sg".to_string());
    let loader = match CatalogLoader::load(&catalog_dir) {
        Ok(loader) => loader,
        Err(err) => {
            // A broken catalog must never go into service.
            tracing::error!(error = %err, catalog_dir, "Failed to load rate catalog");
            std::process::exit(1);
        }
    };
    tracing::info!(
        catalog = %loader.catalog().metadata().name,
        version = %loader.catalog().metadata().version,
        malls = loader.catalog().malls().len(),
        holidays = loader.holidays().len(),
        "Rate catalog loaded"
    );

    let api_key = std::env::var("LTA_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("LTA_API_KEY is not set; availability fetches will fail");
    }

    let state = AppState::new(loader, Arc::new(LtaClient::new(api_key)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("Failed to bind to port 8080");
    tracing::info!("parking engine listening on port 8080");

    axum::serve(listener, app).await.expect("server error");
}
