//! Typed error handling for the storefront service
//!
//! Every failure the order workflow can produce is expressed as a variant of
//! [`ShopError`], which knows its HTTP status, a stable machine-readable code
//! and how to render itself as a JSON body.
//!
//! # Error Categories
//!
//! - [`EntityError`]: an order, user or product reference did not resolve
//! - [`ValidationError`]: malformed input (bad quantity, negative total, ...)
//! - [`TransitionError`]: an illegal order status change
//! - [`StorageError`]: the persistence layer failed or is unreachable
//! - [`RequestError`]: authentication, CORS and request-shape problems
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match manager.get_by_id(&id).await {
//!     Ok(order) => println!("{:?}", order.status),
//!     Err(ShopError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("order {} does not exist", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::core::order::OrderStatus;

/// The main error type for the storefront service
#[derive(Debug)]
pub enum ShopError {
    /// A referenced record does not exist
    Entity(EntityError),

    /// Input failed validation
    Validation(ValidationError),

    /// Order status change not allowed by the lifecycle graph
    Transition(TransitionError),

    /// Storage backend errors
    Storage(StorageError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::Entity(e) => write!(f, "{}", e),
            ShopError::Validation(e) => write!(f, "{}", e),
            ShopError::Transition(e) => write!(f, "{}", e),
            ShopError::Storage(e) => write!(f, "{}", e),
            ShopError::Request(e) => write!(f, "{}", e),
            ShopError::Config(e) => write!(f, "{}", e),
            ShopError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShopError::Entity(e) => Some(e),
            ShopError::Validation(e) => Some(e),
            ShopError::Transition(e) => Some(e),
            ShopError::Storage(e) => Some(e),
            ShopError::Request(e) => Some(e),
            ShopError::Config(e) => Some(e),
            ShopError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Entity(_) => StatusCode::NOT_FOUND,
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::Transition(_) => StatusCode::CONFLICT,
            ShopError::Storage(e) => e.status_code(),
            ShopError::Request(e) => e.status_code(),
            ShopError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Entity(e) => e.error_code(),
            ShopError::Validation(_) => "VALIDATION_ERROR",
            ShopError::Transition(_) => "INVALID_STATUS_TRANSITION",
            ShopError::Storage(_) => "STORAGE_ERROR",
            ShopError::Request(e) => e.error_code(),
            ShopError::Config(_) => "CONFIG_ERROR",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Shorthand for a missing record of the given kind
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        ShopError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id,
                }))
            }
            ShopError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            ShopError::Transition(TransitionError::NotAllowed { from, to }) => {
                Some(serde_json::json!({
                    "from": from,
                    "to": to,
                    "allowed": from.allowed_transitions(),
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// A reference that did not resolve
#[derive(Debug, Error)]
pub enum EntityError {
    /// Record was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },
}

impl EntityError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

impl From<EntityError> for ShopError {
    fn from(err: EntityError) -> Self {
        ShopError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationError> for ShopError {
    fn from(err: ValidationError) -> Self {
        ShopError::Validation(err)
    }
}

// =============================================================================
// Transition Errors
// =============================================================================

/// Illegal order status change
#[derive(Debug, Error)]
pub enum TransitionError {
    /// `to` is not reachable from `from`
    #[error("Order status cannot change from '{from}' to '{to}'")]
    NotAllowed { from: OrderStatus, to: OrderStatus },

    /// The stored status moved between read and write
    #[error("Order '{id}' was modified concurrently; expected status '{expected}'")]
    Conflict { id: String, expected: OrderStatus },
}

impl From<TransitionError> for ShopError {
    fn from(err: TransitionError) -> Self {
        ShopError::Transition(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::ConnectionError { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::QueryError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ShopError {
    fn from(err: StorageError) -> Self {
        ShopError::Storage(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid entity ID format
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Unauthorized request
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Cross-origin caller not on the allow-list
    #[error(
        "The CORS policy for this site does not allow access from the specified Origin: {origin}"
    )]
    OriginRejected { origin: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::OriginRejected { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidBody { .. } => "INVALID_REQUEST_BODY",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::OriginRejected { .. } => "CORS_ORIGIN_REJECTED",
        }
    }
}

impl From<RequestError> for ShopError {
    fn from(err: RequestError) -> Self {
        ShopError::Request(err)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration{}: {message}", describe_file(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A configuration value is out of range or malformed
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

fn describe_file(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" '{}'", f))
        .unwrap_or_default()
}

impl From<ConfigError> for ShopError {
    fn from(err: ConfigError) -> Self {
        ShopError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ShopError {
    fn from(err: serde_yaml::Error) -> Self {
        ShopError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Storage services report failures through `anyhow`; surface them as query errors.
impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => ShopError::Storage(storage),
            Err(other) => ShopError::Storage(StorageError::QueryError {
                backend: "store".to_string(),
                message: format!("{:#}", other),
            }),
        }
    }
}

/// A specialized Result type for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
