use route_mapping::prelude::*;

mod auth;
mod health;
mod users;

use health::HealthController;
use users::UserController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting users-server...");

    // 1. Collect declarations
    let mut registry = RouteRegistry::new();
    registry
        .mount::<UserController>()?
        .mount::<HealthController>()?;

    // 2. Register every route with the host router
    let options = RouterOptions::from_env();
    let mut host = AxumHost::new();
    let count = init_router(&mut host, &registry, &options)?;
    tracing::info!("{} routes registered under prefix {:?}", count, options.prefix);

    let router: Router = host.into_router();

    // 3. Serve
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            tracing::info!("Initiating graceful shutdown...");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
