//! ServerBuilder for fluent API to build the HTTP server

use super::host::ServerHost;
use super::router::build_router;
use crate::config::ServerConfig;
use crate::core::auth::{AuthProvider, HeaderAuthProvider};
use crate::core::order::Order;
use crate::core::service::{DataService, ProductCatalog, UserDirectory};
use crate::orders::OrderManager;
use anyhow::{Result, anyhow};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring storage, collaborators and configuration into a router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_order_store(InMemoryDataService::<Order>::new())
///     .with_user_directory(InMemoryDataService::<User>::new())
///     .with_product_catalog(InMemoryDataService::<Product>::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServerConfig,
    orders: Option<Arc<dyn DataService<Order>>>,
    users: Option<Arc<dyn UserDirectory>>,
    products: Option<Arc<dyn ProductCatalog>>,
    auth: Option<Arc<dyn AuthProvider>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            orders: None,
            users: None,
            products: None,
            auth: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the order store (required)
    pub fn with_order_store(mut self, store: impl DataService<Order> + 'static) -> Self {
        self.orders = Some(Arc::new(store));
        self
    }

    /// Set the user directory (required)
    pub fn with_user_directory(mut self, users: impl UserDirectory + 'static) -> Self {
        self.users = Some(Arc::new(users));
        self
    }

    /// Set the product catalog (required)
    pub fn with_product_catalog(mut self, products: impl ProductCatalog + 'static) -> Self {
        self.products = Some(Arc::new(products));
        self
    }

    /// Replace the header-based auth provider
    pub fn with_auth_provider(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Add custom routes to the server
    ///
    /// They share the tracing and CORS layers of the order routes.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the host holding all service state
    pub fn build_host(&mut self) -> Result<ServerHost> {
        self.config.validate()?;

        let orders = self
            .orders
            .take()
            .ok_or_else(|| anyhow!("Order store is required. Call .with_order_store()"))?;
        let users = self
            .users
            .take()
            .ok_or_else(|| anyhow!("User directory is required. Call .with_user_directory()"))?;
        let products = self
            .products
            .take()
            .ok_or_else(|| anyhow!("Product catalog is required. Call .with_product_catalog()"))?;
        let auth = match self.auth.take() {
            Some(auth) => auth,
            None => Arc::new(HeaderAuthProvider::new(&self.config.auth.user_header)?),
        };

        let manager = OrderManager::new(orders, users, products, self.config.orders.clone());
        Ok(ServerHost::from_builder_components(
            self.config.clone(),
            manager,
            auth,
        )?)
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(build_router(host, custom_routes))
    }

    /// Serve on the configured address until SIGTERM or Ctrl+C
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve on the configured address until `signal` resolves, then drain
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on SIGTERM or Ctrl+C
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
