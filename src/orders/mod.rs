//! Order workflow and its HTTP handlers

pub mod handlers;
pub mod manager;

pub use handlers::OrderAppState;
pub use manager::{NewLineItem, NewOrder, OrderManager};
