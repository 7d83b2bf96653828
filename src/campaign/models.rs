use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_non_blank, validate_non_negative};

/// A product offered in a campaign, supplied read-only by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Product {
    #[validate(custom = "validate_non_blank")]
    #[schema(example = "prod-cafe-500g")]
    pub id: String,
    #[schema(example = "Café especial 500g")]
    pub name: String,
    #[validate(custom = "validate_non_negative")]
    #[schema(value_type = String, example = "10.00")]
    pub unit_price: Decimal,
    /// Weight of one unit in grams
    #[validate(custom = "validate_non_negative")]
    #[schema(value_type = String, example = "1000")]
    pub unit_weight: Decimal,
}

/// One line of an order: a product reference and how many units were ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItem {
    #[validate(custom = "validate_non_blank")]
    #[schema(example = "prod-cafe-500g")]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2, minimum = 1)]
    pub quantity: u32,
}

/// A participant's order within a campaign.
///
/// Subtotal and weight are never stored here; they are always derived from
/// `items` by the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Order {
    #[validate(custom = "validate_non_blank")]
    #[schema(example = "order-ana")]
    pub id: String,
    #[validate]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Whether the order has at least one line
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Everything needed to price a campaign: its products, its orders and the
/// freight cost to be shared between them
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CampaignSnapshot {
    #[validate(custom = "validate_non_blank")]
    #[schema(example = "campanha-cafe-outubro")]
    pub campaign_id: String,
    #[validate(custom = "validate_non_negative")]
    #[schema(value_type = String, example = "30.00")]
    pub shipping_cost: Decimal,
    #[validate]
    pub products: Vec<Product>,
    #[validate]
    pub orders: Vec<Order>,
}

/// Request body for the supplier report; shipping is irrelevant to it
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupplierReportRequest {
    #[validate(custom = "validate_non_blank")]
    pub campaign_id: String,
    #[validate]
    pub products: Vec<Product>,
    #[validate]
    pub orders: Vec<Order>,
}

/// Priced view of one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderTotals {
    pub order_id: String,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub total_weight: Decimal,
    #[schema(value_type = String)]
    pub shipping_share: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// Campaign-wide totals for one product that was actually ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductTotal {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: u64,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub total_value: Decimal,
    /// Unit weight in grams
    #[schema(value_type = String)]
    pub weight: Decimal,
    #[schema(value_type = String)]
    pub total_weight: Decimal,
}

/// How the shipping cost ended up being split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Shares follow each order's weight
    Proportional,
    /// No weight anywhere: every non-empty order pays the same
    EqualSplit,
    /// Nobody eligible to pay (no orders, or only empty ones)
    Unallocated,
}

impl AllocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationMode::Proportional => "proportional",
            AllocationMode::EqualSplit => "equal_split",
            AllocationMode::Unallocated => "unallocated",
        }
    }
}

impl std::fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Organizer-facing roll-up of all priced orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CampaignSummary {
    pub order_count: usize,
    pub orders_with_items: usize,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub shipping_allocated: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    #[schema(value_type = String)]
    pub total_weight: Decimal,
    pub allocation_mode: AllocationMode,
}

/// An order line pointing at a product that is not in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UnresolvedReference {
    pub order_id: String,
    pub product_id: String,
}

/// Response DTO for POST /api/campaigns/pricing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CampaignPricingResponse {
    pub campaign_id: String,
    pub orders: Vec<OrderTotals>,
    pub summary: CampaignSummary,
    pub unresolved_references: Vec<UnresolvedReference>,
}

/// Supplier-facing report: per-product lines plus grand totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplierReport {
    pub campaign_id: String,
    pub items: Vec<ProductTotal>,
    pub total_quantity: u64,
    #[schema(value_type = String)]
    pub total_value: Decimal,
    #[schema(value_type = String)]
    pub total_weight: Decimal,
    pub unresolved_references: Vec<UnresolvedReference>,
}
