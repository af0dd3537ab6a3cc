use super::error::{GatewayError, GatewayResult};
use super::registry::SubscriptionRegistry;

/// Shared state for all gateway handlers. Cheaply cloneable; the registry
/// holds a pooled connection internally.
#[derive(Debug, Clone)]
pub struct GatewayState {
    registry: Option<SubscriptionRegistry>,
    admin_key: Option<String>,
}

impl GatewayState {
    pub fn new(registry: Option<SubscriptionRegistry>, admin_key: Option<String>) -> Self {
        Self {
            registry,
            admin_key,
        }
    }

    /// The registry, or `RegistryUnconfigured` when the service was started
    /// without one.
    pub fn registry(&self) -> GatewayResult<&SubscriptionRegistry> {
        self.registry
            .as_ref()
            .ok_or(GatewayError::RegistryUnconfigured)
    }

    /// Exact comparison against the configured shared secret. A missing key
    /// in the request is a validation failure; an unconfigured secret always
    /// fails authorization, for any provided key.
    pub fn verify_admin_key(&self, provided: Option<&str>) -> GatewayResult<()> {
        let provided = provided
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingApiKey)?;

        match self.admin_key.as_deref() {
            Some(secret) if secret == provided => Ok(()),
            Some(_) => Err(GatewayError::InvalidApiKey),
            None => {
                tracing::warn!("admin verification attempted with no configured secret");
                Err(GatewayError::InvalidApiKey)
            }
        }
    }
}
