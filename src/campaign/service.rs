use crate::campaign::catalog::ProductCatalog;
use crate::campaign::{
    aggregate_with_catalog, build_report, price_with_catalog, summarize, CampaignPricingResponse,
    CampaignSnapshot, Order, PerformanceMetrics, PricingConfig, PricingError, SupplierReport,
    SupplierReportRequest, UnresolvedReference,
};

/// Service for campaign pricing and supplier reporting.
///
/// Constructed once by the hosting application and shared between requests;
/// the only state it carries is configuration and metric counters.
#[derive(Debug, Clone)]
pub struct CampaignService {
    config: PricingConfig,
    metrics: PerformanceMetrics,
}

impl CampaignService {
    pub fn new(config: PricingConfig) -> Self {
        Self::with_metrics(config, PerformanceMetrics::new())
    }

    pub fn with_metrics(config: PricingConfig, metrics: PerformanceMetrics) -> Self {
        Self { config, metrics }
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Price every order of a campaign snapshot
    ///
    /// # Returns
    /// Per-order totals in input order, the campaign summary and the order
    /// lines whose product could not be found
    pub fn price_campaign(&self, snapshot: &CampaignSnapshot) -> Result<CampaignPricingResponse, PricingError> {
        tracing::debug!(
            campaign_id = %snapshot.campaign_id,
            products = snapshot.products.len(),
            orders = snapshot.orders.len(),
            "Pricing campaign"
        );
        let _timer = self.metrics.start_pricing();

        let response = self
            .price(snapshot)
            .map_err(|e| self.record_failure(&snapshot.campaign_id, e))?;

        tracing::info!(
            campaign_id = %response.campaign_id,
            orders = response.summary.order_count,
            total = %response.summary.total,
            shipping = %response.summary.shipping_allocated,
            mode = %response.summary.allocation_mode,
            "Campaign priced"
        );

        Ok(response)
    }

    /// Build the supplier report for a campaign
    pub fn supplier_report(&self, request: &SupplierReportRequest) -> Result<SupplierReport, PricingError> {
        tracing::debug!(
            campaign_id = %request.campaign_id,
            products = request.products.len(),
            orders = request.orders.len(),
            "Building supplier report"
        );
        let _timer = self.metrics.start_report();

        let report = self
            .report(request)
            .map_err(|e| self.record_failure(&request.campaign_id, e))?;

        tracing::info!(
            campaign_id = %report.campaign_id,
            products = report.items.len(),
            total_value = %report.total_value,
            "Supplier report built"
        );

        Ok(report)
    }

    fn price(&self, snapshot: &CampaignSnapshot) -> Result<CampaignPricingResponse, PricingError> {
        let catalog = ProductCatalog::build(&snapshot.products, self.config.reference_policy)?;
        let priced = price_with_catalog(
            &catalog,
            &snapshot.orders,
            snapshot.shipping_cost,
            self.config.currency_scale,
        )?;
        let summary = summarize(&snapshot.orders, &priced)?;

        Ok(CampaignPricingResponse {
            campaign_id: snapshot.campaign_id.clone(),
            orders: priced.orders,
            summary,
            unresolved_references: self.unresolved(&catalog, &snapshot.orders),
        })
    }

    fn report(&self, request: &SupplierReportRequest) -> Result<SupplierReport, PricingError> {
        let catalog = ProductCatalog::build(&request.products, self.config.reference_policy)?;
        let items = aggregate_with_catalog(&catalog, &request.orders, self.config.currency_scale)?;

        build_report(&request.campaign_id, items, self.unresolved(&catalog, &request.orders))
    }

    fn unresolved(&self, catalog: &ProductCatalog<'_>, orders: &[Order]) -> Vec<UnresolvedReference> {
        let unresolved = catalog.unresolved(orders);
        if !unresolved.is_empty() {
            self.metrics.record_unresolved(unresolved.len());
        }
        unresolved
    }

    fn record_failure(&self, campaign_id: &str, error: PricingError) -> PricingError {
        self.metrics.record_failure();
        tracing::debug!(campaign_id = %campaign_id, error = %error, "Campaign computation rejected");
        error
    }
}

impl Default for CampaignService {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
