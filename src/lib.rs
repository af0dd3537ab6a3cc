pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod session;
pub mod usage;
pub use error::{AppError, AppResult};

/// Entrypoint used by the gateway binary and CLI bindings.
pub async fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting snapstudio gateway");

    let config = config::GatewayConfig::from_env();
    gateway::serve(config).await
}
