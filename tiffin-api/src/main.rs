use anyhow::Context;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tiffin_api::{order_app, user_app, OrderServiceState, UserServiceState};
use tiffin_catalog::HttpCatalogClient;
use tiffin_core::CatalogRepository;
use tiffin_order::{HttpFulfillmentGateway, OrderOrchestrator, PasswordHasher, UserRegistrar};
use tiffin_store::app_config::{CatalogConfig, CatalogSource, Config};
use tiffin_store::{DbClient, PgCatalogRepository, PgOrderRepository, PgUserRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiffin_api=debug,tiffin_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;

    // Order store, shared by both services
    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to the database")?;
    db.migrate().await.context("Failed to run migrations")?;

    let users = Arc::new(PgUserRepository::new(db.pool.clone()));
    let orders = Arc::new(PgOrderRepository::new(db.pool.clone()));
    let catalog = connect_catalog(&config.catalog, config.database.max_connections).await?;
    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);

    let mut orchestrator = OrderOrchestrator::new(users.clone(), orders, catalog, hasher);
    match &config.fulfillment.api_url {
        Some(api_url) => {
            tracing::info!("Dispatching orders to {}", api_url);
            let gateway = HttpFulfillmentGateway::new(api_url.clone());
            orchestrator = orchestrator.with_fulfillment(Arc::new(gateway));
        }
        None => tracing::warn!("fulfillment.api_url not set, orders will not be dispatched"),
    }

    let user_state = UserServiceState {
        registrar: Arc::new(UserRegistrar::new(users, hasher)),
    };
    let order_state = OrderServiceState {
        orchestrator: Arc::new(orchestrator),
    };

    let user_addr = SocketAddr::from(([0, 0, 0, 0], config.server.user_port));
    let order_addr = SocketAddr::from(([0, 0, 0, 0], config.server.order_port));
    let user_listener = tokio::net::TcpListener::bind(user_addr)
        .await
        .with_context(|| format!("Failed to bind user service on {}", user_addr))?;
    let order_listener = tokio::net::TcpListener::bind(order_addr)
        .await
        .with_context(|| format!("Failed to bind order service on {}", order_addr))?;

    tracing::info!("User service listening on {}", user_addr);
    tracing::info!("Order service listening on {}", order_addr);

    // Independent listeners; either failing stops the process
    tokio::try_join!(
        axum::serve(user_listener, user_app(user_state)).into_future(),
        axum::serve(order_listener, order_app(order_state)).into_future(),
    )?;

    Ok(())
}

async fn connect_catalog(
    config: &CatalogConfig,
    max_connections: u32,
) -> anyhow::Result<Arc<dyn CatalogRepository>> {
    match config.source {
        CatalogSource::Http => {
            let api_url = config
                .api_url
                .as_deref()
                .context("catalog.api_url is required when catalog.source is \"http\"")?;
            tracing::info!("Pricing against catalog service at {}", api_url);
            let client = HttpCatalogClient::new(api_url)
                .with_context(|| format!("Invalid catalog.api_url {}", api_url))?;
            Ok(Arc::new(client))
        }
        CatalogSource::Database => {
            let url = config
                .database_url
                .as_deref()
                .context("catalog.database_url is required when catalog.source is \"database\"")?;
            let catalog_db = DbClient::new(url, max_connections)
                .await
                .context("Failed to connect to the catalog database")?;
            tracing::info!("Pricing against the catalog database");
            Ok(Arc::new(PgCatalogRepository::new(catalog_db.pool)))
        }
    }
}
