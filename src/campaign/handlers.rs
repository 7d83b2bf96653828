// HTTP handlers for campaign endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::campaign::{
    CampaignPricingResponse, CampaignSnapshot, MetricsSummary, SupplierReport,
    SupplierReportRequest,
};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/campaigns/pricing
/// Prices every order of the submitted campaign snapshot
#[utoipa::path(
    post,
    path = "/api/campaigns/pricing",
    request_body = CampaignSnapshot,
    responses(
        (status = 200, description = "Orders priced", body = CampaignPricingResponse),
        (status = 400, description = "Malformed snapshot", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 422, description = "Order references an unknown product (strict mode)", body = String, example = json!({"error_code": "UNKNOWN_PRODUCT"}))
    ),
    tag = "campaigns"
)]
pub async fn price_campaign_handler(
    State(state): State<AppState>,
    payload: Result<Json<CampaignSnapshot>, JsonRejection>,
) -> Result<Json<CampaignPricingResponse>, ApiError> {
    let Json(snapshot) = payload?;
    snapshot.validate()?;

    let response = state.campaign_service.price_campaign(&snapshot)?;

    Ok(Json(response))
}

/// Handler for POST /api/campaigns/supplier-report
/// Aggregates per-product totals for the supplier invoice
#[utoipa::path(
    post,
    path = "/api/campaigns/supplier-report",
    request_body = SupplierReportRequest,
    responses(
        (status = 200, description = "Supplier report built", body = SupplierReport),
        (status = 400, description = "Malformed snapshot", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 422, description = "Order references an unknown product (strict mode)", body = String, example = json!({"error_code": "UNKNOWN_PRODUCT"}))
    ),
    tag = "campaigns"
)]
pub async fn supplier_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<SupplierReportRequest>, JsonRejection>,
) -> Result<Json<SupplierReport>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let report = state.campaign_service.supplier_report(&request)?;

    Ok(Json(report))
}

/// Handler for GET /api/metrics
#[utoipa::path(
    get,
    path = "/api/metrics",
    responses(
        (status = 200, description = "Computation counters", body = MetricsSummary)
    ),
    tag = "metrics"
)]
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSummary> {
    Json(state.campaign_service.metrics().summary())
}
