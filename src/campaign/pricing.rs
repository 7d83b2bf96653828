// Order pricing engine
//
// Prices every order of a campaign snapshot: subtotal and weight from the
// order's lines, a share of the campaign shipping cost, and the grand total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::campaign::catalog::{validate_orders, ProductCatalog, ReferencePolicy};
use crate::campaign::{
    AllocationMode, CampaignSummary, Order, OrderTotals, PriceCalculator, PricingError, Product,
    ShippingAllocator, ShippingBasis,
};

/// Default number of decimal places of the campaign currency (BRL centavos)
pub const DEFAULT_CURRENCY_SCALE: u32 = 2;

/// Knobs shared by the pricing engine and the supplier report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency_scale: u32,
    pub reference_policy: ReferencePolicy,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency_scale: DEFAULT_CURRENCY_SCALE,
            reference_policy: ReferencePolicy::Lenient,
        }
    }
}

/// Subtotal and weight of one order, before shipping
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderAmounts {
    subtotal: Decimal,
    total_weight: Decimal,
}

/// Result of pricing a whole campaign
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCampaign {
    pub orders: Vec<OrderTotals>,
    pub allocation_mode: AllocationMode,
}

/// Price every order with the default configuration.
///
/// See [`price_orders`] for the rules.
pub fn compute_order_totals(
    products: &[Product],
    orders: &[Order],
    shipping_cost: Decimal,
) -> Result<Vec<OrderTotals>, PricingError> {
    price_orders(products, orders, shipping_cost, &PricingConfig::default()).map(|priced| priced.orders)
}

/// Price every order of a campaign.
///
/// Inputs are validated first: negative amounts, zero quantities, blank IDs
/// and duplicated product or order IDs are rejected. Lines pointing at an
/// unknown product count as zero or fail, depending on the reference policy.
/// The result has one entry per order, in input order.
pub fn price_orders(
    products: &[Product],
    orders: &[Order],
    shipping_cost: Decimal,
    config: &PricingConfig,
) -> Result<PricedCampaign, PricingError> {
    let catalog = ProductCatalog::build(products, config.reference_policy)?;
    price_with_catalog(&catalog, orders, shipping_cost, config.currency_scale)
}

/// Price every order against an already built catalog.
///
/// Same rules as [`price_orders`]; products were validated when the catalog
/// was built.
pub fn price_with_catalog(
    catalog: &ProductCatalog<'_>,
    orders: &[Order],
    shipping_cost: Decimal,
    scale: u32,
) -> Result<PricedCampaign, PricingError> {
    if shipping_cost.is_sign_negative() && !shipping_cost.is_zero() {
        return Err(PricingError::NegativeAmount {
            field: "shipping_cost",
            value: shipping_cost,
        });
    }
    validate_orders(orders)?;

    let amounts = orders
        .iter()
        .map(|order| order_amounts(catalog, order))
        .collect::<Result<Vec<_>, _>>()?;

    let basis: Vec<ShippingBasis> = orders
        .iter()
        .zip(&amounts)
        .map(|(order, amounts)| ShippingBasis {
            total_weight: amounts.total_weight,
            has_items: order.has_items(),
        })
        .collect();

    let allocation = ShippingAllocator::new(scale).allocate(shipping_cost, &basis)?;

    let totals = orders
        .iter()
        .zip(amounts)
        .zip(allocation.shares)
        .map(|((order, amounts), shipping_share)| -> Result<OrderTotals, PricingError> {
            let subtotal = PriceCalculator::to_money(amounts.subtotal, scale);
            Ok(OrderTotals {
                order_id: order.id.clone(),
                subtotal,
                total_weight: amounts.total_weight,
                shipping_share,
                total: PriceCalculator::add(subtotal, shipping_share, "order total")?,
            })
        })
        .collect::<Result<Vec<_>, PricingError>>()?;

    Ok(PricedCampaign {
        orders: totals,
        allocation_mode: allocation.mode,
    })
}

/// Roll priced orders up into campaign-wide figures.
///
/// `source` is the order list that was priced; it tells how many orders had
/// at least one line.
pub fn summarize(source: &[Order], priced: &PricedCampaign) -> Result<CampaignSummary, PricingError> {
    let orders = &priced.orders;
    let subtotals: Vec<Decimal> = orders.iter().map(|o| o.subtotal).collect();
    let shares: Vec<Decimal> = orders.iter().map(|o| o.shipping_share).collect();
    let totals: Vec<Decimal> = orders.iter().map(|o| o.total).collect();
    let weights: Vec<Decimal> = orders.iter().map(|o| o.total_weight).collect();

    Ok(CampaignSummary {
        order_count: orders.len(),
        orders_with_items: source.iter().filter(|o| o.has_items()).count(),
        subtotal: PriceCalculator::calculate_total(&subtotals)?,
        shipping_allocated: PriceCalculator::calculate_total(&shares)?,
        total: PriceCalculator::calculate_total(&totals)?,
        total_weight: PriceCalculator::calculate_total(&weights)?,
        allocation_mode: priced.allocation_mode,
    })
}

fn order_amounts(catalog: &ProductCatalog<'_>, order: &Order) -> Result<OrderAmounts, PricingError> {
    let mut amounts = OrderAmounts {
        subtotal: Decimal::ZERO,
        total_weight: Decimal::ZERO,
    };

    for item in &order.items {
        if let Some(product) = catalog.resolve(order, item)? {
            amounts.subtotal = PriceCalculator::add(
                amounts.subtotal,
                PriceCalculator::item_subtotal(item, product)?,
                "order subtotal",
            )?;
            amounts.total_weight = PriceCalculator::add(
                amounts.total_weight,
                PriceCalculator::item_weight(item, product)?,
                "order weight",
            )?;
        }
    }

    Ok(amounts)
}
