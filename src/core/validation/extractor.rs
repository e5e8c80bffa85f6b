//! Axum extractor for JSON request bodies
//!
//! `JsonBody<T>` behaves like `axum::Json<T>` but reports malformed or
//! mistyped payloads through [`ShopError`] so every 400 has the same shape.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::core::error::{RequestError, ShopError, ValidationError};

/// Deserialized request payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     JsonBody(payload): JsonBody<CreateOrderRequest>,
/// ) -> Result<impl IntoResponse, ShopError> {
///     // payload is already typed
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ShopError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => RequestError::InvalidBody {
            message: "expected 'Content-Type: application/json'".to_string(),
        }
        .into(),
        other => ValidationError::InvalidJson {
            message: other.body_text(),
        }
        .into(),
    }
}
