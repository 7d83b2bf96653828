// Campaign pricing core
//
// Order pricing with proportional shipping, and the per-product supplier
// report, both computed from an immutable campaign snapshot.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod price_calculator;
pub mod pricing;
pub mod service;
pub mod shipping;
pub mod supplier_report;

pub use catalog::{ProductCatalog, ReferencePolicy};
pub use error::*;
pub use handlers::*;
pub use metrics::{MetricsSummary, PerformanceMetrics};
pub use models::*;
pub use price_calculator::*;
pub use pricing::{
    compute_order_totals, price_orders, price_with_catalog, summarize, PricedCampaign, PricingConfig,
    DEFAULT_CURRENCY_SCALE,
};
pub use service::*;
pub use shipping::{ShippingAllocation, ShippingAllocator, ShippingBasis};
pub use supplier_report::{
    aggregate_products, aggregate_with_catalog, build_report, compare_names, compute_product_totals,
};
