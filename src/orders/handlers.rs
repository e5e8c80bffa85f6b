//! HTTP handlers for order operations
//!
//! Every route acts on behalf of the authenticated caller: orders are
//! created for them, listed for them and only readable or changeable by them.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::AuthProvider;
use crate::core::error::{RequestError, ShopError, ShopResult, ValidationError};
use crate::core::order::{Order, OrderStatus, ShippingAddress};
use crate::core::validation::JsonBody;
use crate::orders::manager::{NewLineItem, NewOrder, OrderManager};

/// Application state shared across order handlers
#[derive(Clone)]
pub struct OrderAppState {
    pub manager: Arc<OrderManager>,
    pub auth: Arc<dyn AuthProvider>,
}

impl OrderAppState {
    /// Resolve the calling user or fail with 401
    async fn caller(&self, headers: &HeaderMap) -> ShopResult<Uuid> {
        self.auth.extract_context(headers).await?.require_user()
    }
}

/// One `{product, quantity}` entry of a checkout request
#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    pub product: Uuid,
    pub quantity: i64,
}

/// Request body for creating an order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub products: Vec<LineItemRequest>,
    pub address: ShippingAddress,
    pub payment_method: String,
    pub total_amount: f64,
}

impl CreateOrderRequest {
    fn into_new_order(self, user_id: Uuid) -> NewOrder {
        NewOrder {
            user_id,
            line_items: self
                .products
                .into_iter()
                .map(|item| NewLineItem {
                    product_id: item.product,
                    quantity: item.quantity,
                })
                .collect(),
            address: self.address,
            payment_method: self.payment_method,
            total_amount: self.total_amount,
        }
    }
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Response for list orders endpoint
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
    pub count: usize,
}

/// POST /api/order
pub async fn create_order(
    State(state): State<OrderAppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<CreateOrderRequest>,
) -> Result<impl IntoResponse, ShopError> {
    let user_id = state.caller(&headers).await?;
    let order = state.manager.create(payload.into_new_order(user_id)).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/order
pub async fn list_orders(
    State(state): State<OrderAppState>,
    headers: HeaderMap,
) -> Result<Json<ListOrdersResponse>, ShopError> {
    let user_id = state.caller(&headers).await?;
    let orders = state.manager.list_by_user(&user_id).await?;
    let count = orders.len();
    Ok(Json(ListOrdersResponse { orders, count }))
}

/// GET /api/order/{id}
pub async fn get_order(
    State(state): State<OrderAppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Order>, ShopError> {
    let user_id = state.caller(&headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state.manager.get_owned(&order_id, &user_id).await?;
    Ok(Json(order))
}

/// PUT /api/order/{id}/status
pub async fn update_order_status(
    State(state): State<OrderAppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateStatusRequest>,
) -> Result<Json<Order>, ShopError> {
    let user_id = state.caller(&headers).await?;
    let order_id = parse_order_id(&id)?;
    let next: OrderStatus = payload
        .status
        .parse()
        .map_err(|message| ValidationError::FieldError {
            field: "status".to_string(),
            message,
        })?;

    state.manager.get_owned(&order_id, &user_id).await?;
    let order = state.manager.update_status(&order_id, next).await?;
    Ok(Json(order))
}

fn parse_order_id(raw: &str) -> ShopResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RequestError::InvalidEntityId { id: raw.to_string() }.into())
}
