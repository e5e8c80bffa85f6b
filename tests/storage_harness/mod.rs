//! Shared test harness for storage backend testing
//!
//! Provides fixtures (users, products, addresses, orders) and the
//! macro-generated suites that every backend must pass.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod order_manager_tests;
#[macro_use]
pub mod integration;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use storefront::config::OrderPolicy;
use storefront::core::directory::{Product, User};
use storefront::core::order::{LineItem, Order, ShippingAddress};
use storefront::orders::{NewLineItem, NewOrder};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn sample_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_string(),
        phone: Some("+919876543210".to_string()),
        street: "12 Lake Road".to_string(),
        landmark: None,
        city: "Pune".to_string(),
        state: Some("MH".to_string()),
        postal_code: "411001".to_string(),
        country: Some("IN".to_string()),
    }
}

pub fn sample_address_json() -> Value {
    json!({
        "fullName": "Asha Rao",
        "phone": "+919876543210",
        "street": "12 Lake Road",
        "city": "Pune",
        "state": "MH",
        "pincode": "411001"
    })
}

pub fn create_test_user(name: &str) -> User {
    User::new(name, format!("{}@example.com", name.to_lowercase()))
}

pub fn create_test_product(name: &str, price: f64) -> Product {
    Product::new(name, price)
}

/// A pending order for `user_id`, created `minutes_ago` minutes in the past
pub fn create_test_order(user_id: Uuid, minutes_ago: i64) -> Order {
    let mut order = Order::new(
        user_id,
        vec![LineItem {
            product_id: Uuid::new_v4(),
            quantity: 2,
        }],
        sample_address(),
        "cod".to_string(),
        19.98,
    );
    order.created_at = timestamp_minutes_ago(minutes_ago);
    order
}

pub fn timestamp_minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn new_order(user_id: Uuid, items: &[(Uuid, i64)], total_amount: f64) -> NewOrder {
    NewOrder {
        user_id,
        line_items: items
            .iter()
            .map(|(product_id, quantity)| NewLineItem {
                product_id: *product_id,
                quantity: *quantity,
            })
            .collect(),
        address: sample_address(),
        payment_method: "cod".to_string(),
        total_amount,
    }
}

pub fn strict_policy() -> OrderPolicy {
    OrderPolicy::default()
}

// ---------------------------------------------------------------------------
// Manager fixture
// ---------------------------------------------------------------------------

use std::sync::Arc;
use storefront::core::service::DataService;
use storefront::orders::OrderManager;

/// A manager wired to the given stores, with one user and two products seeded
pub struct ManagerFixture {
    pub manager: OrderManager,
    pub orders: Arc<dyn DataService<Order>>,
    pub user: User,
    /// 9.99 per unit
    pub chips: Product,
    /// 4.50 per unit
    pub tea: Product,
}

pub async fn manager_fixture<O, U, P>(
    orders: O,
    users: U,
    products: P,
    policy: OrderPolicy,
) -> ManagerFixture
where
    O: DataService<Order> + 'static,
    U: DataService<User> + 'static,
    P: DataService<Product> + 'static,
{
    let user = users.create(create_test_user("Asha")).await.unwrap();
    let chips = products
        .create(create_test_product("Masala Chips", 9.99))
        .await
        .unwrap();
    let tea = products
        .create(create_test_product("Masala Tea", 4.50))
        .await
        .unwrap();

    let orders: Arc<dyn DataService<Order>> = Arc::new(orders);
    let manager = OrderManager::new(orders.clone(), Arc::new(users), Arc::new(products), policy);

    ManagerFixture {
        manager,
        orders,
        user,
        chips,
        tea,
    }
}

/// Number of stored orders for `user_id`
pub async fn stored_order_count(orders: &Arc<dyn DataService<Order>>, user_id: Uuid) -> usize {
    orders
        .search("user", &user_id.to_string())
        .await
        .unwrap()
        .len()
}

// ---------------------------------------------------------------------------
// Faulty stores
// ---------------------------------------------------------------------------

use async_trait::async_trait;

/// How a [`FaultyOrderStore`] misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Conditional replaces never match, as if another writer got there first
    StaleWrites,
    /// Inserts fail, reads go through
    WritesFail,
    /// Every call fails
    Down,
}

/// Wraps an order store and injects one kind of failure
pub struct FaultyOrderStore<S> {
    inner: S,
    fault: Fault,
}

impl<S> FaultyOrderStore<S> {
    pub fn new(inner: S, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

fn connection_reset() -> anyhow::Error {
    anyhow::anyhow!("connection reset")
}

#[async_trait]
impl<S: DataService<Order>> DataService<Order> for FaultyOrderStore<S> {
    async fn create(&self, entity: Order) -> anyhow::Result<Order> {
        match self.fault {
            Fault::WritesFail | Fault::Down => Err(connection_reset()),
            Fault::StaleWrites => self.inner.create(entity).await,
        }
    }

    async fn get(&self, id: &Uuid) -> anyhow::Result<Option<Order>> {
        match self.fault {
            Fault::Down => Err(connection_reset()),
            _ => self.inner.get(id).await,
        }
    }

    async fn search(&self, field: &str, value: &str) -> anyhow::Result<Vec<Order>> {
        match self.fault {
            Fault::Down => Err(connection_reset()),
            _ => self.inner.search(field, value).await,
        }
    }

    async fn replace_if(
        &self,
        id: &Uuid,
        field: &str,
        expected: &str,
        entity: Order,
    ) -> anyhow::Result<Option<Order>> {
        match self.fault {
            Fault::StaleWrites => Ok(None),
            Fault::Down => Err(connection_reset()),
            Fault::WritesFail => self.inner.replace_if(id, field, expected, entity).await,
        }
    }
}
