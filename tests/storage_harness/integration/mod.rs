//! Integration test infrastructure for storage backends.
//!
//! Drives a backend through the full HTTP stack
//! (HTTP → middleware → handler → OrderManager → DataService → response).
//!
//! # Architecture
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by ServerBuilder)
//!         ├─ POST /api/order              → create_order
//!         ├─ GET  /api/order              → list_orders
//!         ├─ GET  /api/order/{id}         → get_order
//!         └─ PUT  /api/order/{id}/status  → update_order_status
//! ```


use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use storefront::config::ServerConfig;
use storefront::core::directory::{Product, User};
use storefront::core::order::Order;
use storefront::core::service::DataService;
use storefront::server::ServerBuilder;

use super::{create_test_product, create_test_user, sample_address_json};

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// A running test server with one seeded user and product
pub struct RestFixture {
    pub server: TestServer,
    pub user: User,
    pub product: Product,
}

pub async fn rest_fixture<O, U, P>(orders: O, users: U, products: P) -> RestFixture
where
    O: DataService<Order> + 'static,
    U: DataService<User> + 'static,
    P: DataService<Product> + 'static,
{
    let user = users.create(create_test_user("Asha")).await.unwrap();
    let product = products
        .create(create_test_product("Masala Chips", 9.99))
        .await
        .unwrap();

    let mut config = ServerConfig::default();
    config.cors.allowed_origins = vec![ALLOWED_ORIGIN.to_string()];

    let router = ServerBuilder::new()
        .with_config(config)
        .with_order_store(orders)
        .with_user_directory(users)
        .with_product_catalog(products)
        .build()
        .unwrap();

    RestFixture {
        server: TestServer::new(router).unwrap(),
        user,
        product,
    }
}

pub fn user_header() -> HeaderName {
    HeaderName::from_static("x-user-id")
}

pub fn user_value(user_id: Uuid) -> HeaderValue {
    HeaderValue::from_str(&user_id.to_string()).unwrap()
}

pub fn order_body(product_id: Uuid, quantity: i64, total: f64) -> Value {
    json!({
        "products": [{"product": product_id, "quantity": quantity}],
        "address": sample_address_json(),
        "paymentMethod": "cod",
        "totalAmount": total
    })
}
