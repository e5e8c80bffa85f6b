//! # Storefront
//!
//! Order backend for a small online shop.
//!
//! ## Features
//!
//! - **Order Record Manager**: create orders against a user directory and a
//!   product catalog, read them back and move them through a fixed lifecycle
//! - **Pluggable storage**: in-memory for tests and development, MongoDB for
//!   production (`mongodb_backend` feature)
//! - **Configuration-driven**: YAML file plus environment overrides
//! - **Browser-ready**: CORS allow-list with explicit rejection of unknown
//!   origins
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! let users = InMemoryDataService::<User>::new();
//! let products = InMemoryDataService::<Product>::new();
//!
//! ServerBuilder::new()
//!     .with_config(ServerConfig::load()?)
//!     .with_order_store(InMemoryDataService::<Order>::new())
//!     .with_user_directory(users)
//!     .with_product_catalog(products)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthProvider, HeaderAuthProvider},
        directory::{Product, User},
        entity::Entity,
        error::{ShopError, ShopResult},
        order::{LineItem, Order, OrderStatus, ShippingAddress},
        service::{DataService, ProductCatalog, UserDirectory},
    };

    // === Orders ===
    pub use crate::orders::{NewLineItem, NewOrder, OrderManager};

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::{OrderPolicy, ServerConfig};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
