//! Request handlers for the gateway's three endpoints.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::error::{GatewayError, GatewayResult};
use super::registry::Platform;
use super::state::GatewayState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminKeyRequest {
    pub api_key: Option<String>,
}

/// POST /api/notifications/subscribe
///
/// Upserts a device token; repeated calls with the same token update the
/// existing row. The platform is inferred from the `User-Agent` header.
pub async fn subscribe(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(input): Json<SubscribeRequest>,
) -> GatewayResult<Json<serde_json::Value>> {
    let token = input
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(GatewayError::MissingToken)?;

    let registry = state.registry()?;

    let user_agent = headers.get(USER_AGENT).and_then(|value| value.to_str().ok());
    let platform = Platform::from_user_agent(user_agent);

    let subscription = registry
        .upsert(token, input.user_id.as_deref(), platform)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "subscription registered",
        "platform": subscription.platform,
    })))
}

/// POST /api/admin/verify
///
/// Pure shared-secret check; no session is issued.
pub async fn verify_admin_key(
    State(state): State<GatewayState>,
    Json(input): Json<VerifyAdminKeyRequest>,
) -> GatewayResult<Json<serde_json::Value>> {
    state.verify_admin_key(input.api_key.as_deref())?;
    Ok(Json(json!({ "success": true })))
}

/// GET /healthz
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
