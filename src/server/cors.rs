//! Cross-origin policy
//!
//! Browsers calling from an origin on the allow-list get the usual CORS
//! headers. Requests carrying any other `Origin` are refused with 403.
//! Requests without an `Origin` header (curl, server-to-server) pass.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::error::{ConfigError, RequestError, ShopError};

/// Origins allowed to call the API from a browser
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<HeaderValue>,
}

impl OriginAllowList {
    pub fn new<I, S>(origins: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref().trim().trim_end_matches('/');
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                    key: "cors.allowed_origins".to_string(),
                    message: format!("'{}': {}", origin, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { origins })
    }

    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn origins(&self) -> &[HeaderValue] {
        &self.origins
    }

    /// `tower-http` layer emitting CORS headers for listed origins
    pub fn cors_layer(&self, auth_header: &HeaderName) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.iter().cloned()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, auth_header.clone()])
            .allow_credentials(true)
    }
}

/// Middleware refusing requests whose `Origin` is not allow-listed
pub async fn reject_unlisted_origins(
    State(allow_list): State<Arc<OriginAllowList>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN)
        && !allow_list.is_allowed(origin)
    {
        let origin = origin.to_str().unwrap_or("<non-ascii>").to_string();
        tracing::warn!(origin = %origin, path = %request.uri().path(), "rejected cross-origin request");
        return ShopError::from(RequestError::OriginRejected { origin }).into_response();
    }

    next.run(request).await
}
