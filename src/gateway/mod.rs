//! Push-notification gateway: token registry plus the admin shared-secret
//! check, served over HTTP.

pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::AppResult;

pub use error::{GatewayError, GatewayResult};
pub use registry::{NotificationSubscription, Platform, SubscriptionRegistry};
pub use state::GatewayState;

/// Run the gateway until the process is stopped.
///
/// A missing database path or admin key does not prevent startup; the
/// affected endpoints reject requests instead, so the rest of the service
/// stays probeable.
pub async fn serve(config: GatewayConfig) -> AppResult<()> {
    let registry = match &config.database_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let registry = SubscriptionRegistry::connect(path).await?;
            registry.initialize().await?;
            tracing::info!(path = %path.display(), "subscription registry ready");
            Some(registry)
        }
        None => {
            tracing::warn!("SNAPSTUDIO_DB_PATH is not set; subscribe requests will be rejected");
            None
        }
    };

    if config.admin_key.is_none() {
        tracing::warn!("SNAPSTUDIO_ADMIN_KEY is not set; admin verification always fails");
    }

    let state = GatewayState::new(registry, config.admin_key.clone());
    let app = routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let address = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(%address, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
