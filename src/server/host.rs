//! Server host holding the state every route needs
//!
//! The host is assembled once by the builder and shared by the router.

use crate::config::ServerConfig;
use crate::core::auth::AuthProvider;
use crate::core::error::ConfigError;
use crate::orders::{OrderAppState, OrderManager};
use crate::server::cors::OriginAllowList;
use axum::http::HeaderName;
use std::sync::Arc;

/// Host context containing all service state
pub struct ServerHost {
    /// Effective configuration
    pub config: Arc<ServerConfig>,

    /// Order workflow
    pub manager: Arc<OrderManager>,

    /// Caller identity extraction
    pub auth: Arc<dyn AuthProvider>,

    /// Browser origins allowed to call the API
    pub origins: Arc<OriginAllowList>,

    /// Header carrying the user id, advertised in CORS preflights
    pub auth_header: HeaderName,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        config: ServerConfig,
        manager: OrderManager,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self, ConfigError> {
        let origins = OriginAllowList::new(&config.cors.allowed_origins)?;
        let auth_header = HeaderName::from_bytes(config.auth.user_header.trim().as_bytes())
            .map_err(|e| ConfigError::InvalidValue {
                key: "auth.user_header".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            config: Arc::new(config),
            manager: Arc::new(manager),
            auth,
            origins: Arc::new(origins),
            auth_header,
        })
    }

    /// State handed to the order handlers
    pub fn order_state(&self) -> OrderAppState {
        OrderAppState {
            manager: self.manager.clone(),
            auth: self.auth.clone(),
        }
    }
}
