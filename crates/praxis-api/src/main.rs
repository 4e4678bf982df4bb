use std::sync::Arc;

use praxis_engine::AssessmentEngine;
use praxis_store::rest::RestStore;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::ApiConfig;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;
    let store = Arc::new(RestStore::new(config.store.clone())?);
    let engine = AssessmentEngine::new(store).with_config(config.engine.clone());

    let app = routes::router(AppState {
        engine: Arc::new(engine),
    });

    match config.bind_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "serving locally");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
    }
}
