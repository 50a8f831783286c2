use thiserror::Error;

use crate::config::AppConfig;
use crate::data::RegistryHandle;

pub mod api;
pub mod routes;
pub mod static_files;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: RegistryHandle,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),

    #[error("failed to bind '{addr}'")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped")]
    Serve(#[source] std::io::Error),
}

/// Blocking entry point for the CLI: builds a tokio runtime and serves until shutdown.
pub fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let runtime = tokio::runtime::Runtime::new().map_err(ServerError::Runtime)?;
    runtime.block_on(serve(config.clone()))
}

/// Bind immediately and load the data registry in the background; API handlers
/// wait for it before answering.
pub async fn serve(config: AppConfig) -> Result<(), ServerError> {
    let registry = RegistryHandle::spawn_load(config.data_dir.clone());
    let app = routes::router(AppState { registry }, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr.clone(),
            source,
        })?;
    tracing::info!(
        static_dir = ?config.static_dir,
        "quickref server listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
