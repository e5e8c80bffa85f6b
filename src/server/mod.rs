//! HTTP server: host state, router, CORS policy and the fluent builder

pub mod builder;
pub mod cors;
pub mod host;
pub mod router;

pub use builder::{ServerBuilder, shutdown_signal};
pub use cors::OriginAllowList;
pub use host::ServerHost;
