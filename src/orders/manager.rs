//! Order Record Manager
//!
//! Owns the order workflow: checks the checkout input, resolves the user
//! and every product, writes exactly one record and moves it through the
//! status lifecycle.

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::OrderPolicy;
use crate::core::error::{ShopError, ShopResult, TransitionError, ValidationError};
use crate::core::order::{LineItem, Order, OrderStatus, ShippingAddress};
use crate::core::service::{DataService, ProductCatalog, UserDirectory};
use crate::core::validation::{Validate, Violations, validators};

/// One requested line item, before its quantity has been checked
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Checkout input for [`OrderManager::create`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub line_items: Vec<NewLineItem>,
    pub address: ShippingAddress,
    pub payment_method: String,
    pub total_amount: f64,
}

impl NewOrder {
    /// Check every field, collecting all violations
    pub fn check(&self, policy: &OrderPolicy) -> Result<(), ValidationError> {
        let mut v = Violations::new();

        if self.line_items.is_empty() && !policy.allow_empty_orders {
            v.push("products", "at least one line item is required");
        }
        for (i, item) in self.line_items.iter().enumerate() {
            v.check(
                format!("products[{}].quantity", i),
                validators::positive_quantity("quantity", item.quantity),
            );
        }
        v.check(
            "totalAmount",
            validators::non_negative_amount("totalAmount", self.total_amount),
        );
        v.check(
            "paymentMethod",
            validators::required_text("paymentMethod", &self.payment_method),
        );
        v.merge(self.address.validate());

        v.finish()
    }
}

/// Order workflow over injected persistence and collaborators
#[derive(Clone)]
pub struct OrderManager {
    orders: Arc<dyn DataService<Order>>,
    users: Arc<dyn UserDirectory>,
    products: Arc<dyn ProductCatalog>,
    policy: OrderPolicy,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn DataService<Order>>,
        users: Arc<dyn UserDirectory>,
        products: Arc<dyn ProductCatalog>,
        policy: OrderPolicy,
    ) -> Self {
        Self {
            orders,
            users,
            products,
            policy,
        }
    }

    /// Record a new `pending` order.
    ///
    /// Input is validated first, then the user and products are resolved,
    /// then one record is written. Nothing is persisted on failure.
    pub async fn create(&self, input: NewOrder) -> ShopResult<Order> {
        input.check(&self.policy)?;

        let user = self
            .users
            .resolve_user(&input.user_id)
            .await
            .map_err(|e| storage_failure("resolve user", e))?
            .ok_or_else(|| ShopError::not_found("user", input.user_id))?;

        let mut line_items = Vec::with_capacity(input.line_items.len());
        let mut catalog_total = 0.0;
        for item in &input.line_items {
            let product = self
                .products
                .resolve_product(&item.product_id)
                .await
                .map_err(|e| storage_failure("resolve product", e))?
                .ok_or_else(|| ShopError::not_found("product", item.product_id))?;

            // range already checked by NewOrder::check
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                ShopError::Internal(format!("quantity {} out of range", item.quantity))
            })?;
            catalog_total += f64::from(quantity) * product.price;
            line_items.push(LineItem {
                product_id: product.id,
                quantity,
            });
        }

        if (catalog_total - input.total_amount).abs() > self.policy.total_mismatch_tolerance {
            warn!(
                user_id = %user.id,
                client_total = input.total_amount,
                catalog_total,
                "order total differs from catalog prices; keeping client total"
            );
        }

        let order = Order::new(
            user.id,
            line_items,
            input.address,
            input.payment_method,
            input.total_amount,
        );

        let order = self
            .orders
            .create(order)
            .await
            .map_err(|e| storage_failure("create order", e))?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.item_count(),
            total = order.total_amount,
            "order created"
        );
        Ok(order)
    }

    /// Fetch one order
    pub async fn get_by_id(&self, id: &Uuid) -> ShopResult<Order> {
        debug!(order_id = %id, "loading order");
        self.orders
            .get(id)
            .await
            .map_err(|e| storage_failure("load order", e))?
            .ok_or_else(|| ShopError::not_found("order", id))
    }

    /// Fetch one order only if `owner` placed it; anyone else sees not-found
    pub async fn get_owned(&self, id: &Uuid, owner: &Uuid) -> ShopResult<Order> {
        let order = self.get_by_id(id).await?;
        if order.user_id != *owner {
            debug!(order_id = %id, caller = %owner, "order belongs to another user");
            return Err(ShopError::not_found("order", id));
        }
        Ok(order)
    }

    /// All orders placed by `user_id`, newest first
    pub async fn list_by_user(&self, user_id: &Uuid) -> ShopResult<Vec<Order>> {
        debug!(user_id = %user_id, "listing orders");
        self.orders
            .search("user", &user_id.to_string())
            .await
            .map_err(|e| storage_failure("list orders", e))
    }

    /// Move an order along the lifecycle.
    ///
    /// The write only lands if the stored status is still the one that was
    /// read; losing that race is reported as a conflict.
    pub async fn update_status(&self, id: &Uuid, next: OrderStatus) -> ShopResult<Order> {
        let current = self.get_by_id(id).await?;
        let previous = current.status;

        let mut updated = current;
        updated.transition_to(next)?;

        let stored = self
            .orders
            .replace_if(id, "status", previous.as_str(), updated)
            .await
            .map_err(|e| storage_failure("update order status", e))?;

        match stored {
            Some(order) => {
                info!(order_id = %id, from = %previous, to = %next, "order status changed");
                Ok(order)
            }
            None => {
                warn!(order_id = %id, expected = %previous, "order status changed concurrently");
                Err(TransitionError::Conflict {
                    id: id.to_string(),
                    expected: previous,
                }
                .into())
            }
        }
    }
}

fn storage_failure(action: &str, err: anyhow::Error) -> ShopError {
    error!(action, error = %format!("{:#}", err), "storage failure");
    ShopError::from(err)
}
