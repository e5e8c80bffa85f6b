//! Core module containing the domain records, traits and error types

pub mod auth;
pub mod directory;
pub mod entity;
pub mod error;
pub mod order;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, AuthProvider, HeaderAuthProvider};
pub use directory::{Product, User};
pub use entity::Entity;
pub use error::{ShopError, ShopResult};
pub use order::{LineItem, Order, OrderStatus, ShippingAddress};
pub use service::{DataService, ProductCatalog, UserDirectory};
