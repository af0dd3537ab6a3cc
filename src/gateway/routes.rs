//! Route table for the gateway service.
//!
//! ```text
//! GET  /healthz                         -> health
//! POST /api/notifications/subscribe     -> subscribe
//! POST /api/admin/verify                -> verify_admin_key
//! ```

use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::state::GatewayState;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/notifications/subscribe", post(handlers::subscribe))
        .route("/api/admin/verify", post(handlers::verify_admin_key))
}
