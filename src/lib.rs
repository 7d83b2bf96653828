pub mod campaign;
pub mod config;
pub mod error;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use campaign::{
    AllocationMode, CampaignPricingResponse, CampaignService, CampaignSnapshot, CampaignSummary,
    MetricsSummary, Order, OrderItem, OrderTotals, Product, ProductTotal, SupplierReport,
    SupplierReportRequest, UnresolvedReference,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        campaign::handlers::price_campaign_handler,
        campaign::handlers::supplier_report_handler,
        campaign::handlers::metrics_handler,
    ),
    components(
        schemas(
            CampaignSnapshot, Product, Order, OrderItem,
            CampaignPricingResponse, OrderTotals, CampaignSummary, AllocationMode, UnresolvedReference,
            SupplierReportRequest, SupplierReport, ProductTotal,
            MetricsSummary
        )
    ),
    tags(
        (name = "campaigns", description = "Group-buying campaign pricing and supplier reports"),
        (name = "metrics", description = "Computation counters")
    ),
    info(
        title = "Compra Coletiva Pricing API",
        version = "0.1.0",
        description = "Order totals with proportional shipping and supplier reports for group-buying campaigns"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub campaign_service: Arc<CampaignService>,
}

impl AppState {
    pub fn new(campaign_service: CampaignService) -> Self {
        Self {
            campaign_service: Arc::new(campaign_service),
        }
    }
}

/// API routes without documentation or cross-cutting layers
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/campaigns/pricing", post(campaign::price_campaign_handler))
        .route("/api/campaigns/supplier-report", post(campaign::supplier_report_handler))
        .route("/api/metrics", get(campaign::metrics_handler))
        .with_state(state)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
