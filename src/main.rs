//! Storefront API server
//!
//! Loads configuration, connects to MongoDB and serves the order API until
//! SIGTERM or Ctrl+C.

use anyhow::Result;
use mongodb::bson::doc;
use storefront::config::ServerConfig;
use storefront::core::{Order, Product, User};
use storefront::server::ServerBuilder;
use storefront::storage::{MongoDataService, mongodb::connect};
use storefront::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;
    telemetry::init(&config.logging);

    tracing::info!(database = %config.database.name, "connecting to MongoDB");
    let client = connect(&config.database.uri).await?;
    let database = client.database(&config.database.name);

    let orders = MongoDataService::<Order>::new(database.clone());
    orders.ensure_index(doc! { "user": 1, "createdAt": -1 }).await?;

    let result = ServerBuilder::new()
        .with_config(config)
        .with_order_store(orders)
        .with_user_directory(MongoDataService::<User>::new(database.clone()))
        .with_product_catalog(MongoDataService::<Product>::new(database))
        .serve()
        .await;

    client.shutdown().await;
    tracing::info!("MongoDB connection closed");

    result
}
