use compra_coletiva::{campaign::CampaignService, config::AppConfig, create_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Compra Coletiva pricing API - Starting...");

    let config = AppConfig::from_env()?;
    tracing::info!(
        currency_scale = config.pricing.currency_scale,
        reference_policy = ?config.pricing.reference_policy,
        "Configuration loaded"
    );

    let addr = config.bind_address();
    let service = CampaignService::new(config.pricing);
    let metrics = service.metrics().clone();
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Pricing API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    metrics.log_summary();
    tracing::info!("Pricing API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
