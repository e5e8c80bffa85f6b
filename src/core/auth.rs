//! Caller identity for the order endpoints
//!
//! Authentication itself is delegated to an upstream gateway. The service
//! only reads the identity it forwards and enforces that orders are seen
//! and changed by their owner.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use uuid::Uuid;

use crate::core::error::{ConfigError, RequestError, ShopError};

/// Header carrying the authenticated user id by default
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: Uuid },

    /// No identity was supplied
    Anonymous,
}

impl AuthContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }

    /// The authenticated user, or 401
    pub fn require_user(&self) -> Result<Uuid, ShopError> {
        self.user_id().ok_or_else(|| {
            RequestError::Unauthorized {
                message: "authentication required".to_string(),
            }
            .into()
        })
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, ShopError>;
}

/// Reads the user id forwarded by the gateway from a request header
#[derive(Debug, Clone)]
pub struct HeaderAuthProvider {
    header: HeaderName,
}

impl HeaderAuthProvider {
    pub fn new(header_name: &str) -> Result<Self, ConfigError> {
        let header = HeaderName::from_bytes(header_name.trim().as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                key: "auth.user_header".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { header })
    }
}

impl Default for HeaderAuthProvider {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_USER_HEADER),
        }
    }
}

#[async_trait]
impl AuthProvider for HeaderAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, ShopError> {
        let Some(value) = headers.get(&self.header) else {
            return Ok(AuthContext::Anonymous);
        };

        let raw = value.to_str().map_err(|_| RequestError::Unauthorized {
            message: format!("header '{}' is not valid text", self.header),
        })?;

        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| RequestError::Unauthorized {
            message: format!("header '{}' does not carry a valid user id", self.header),
        })?;

        Ok(AuthContext::User { user_id })
    }
}
