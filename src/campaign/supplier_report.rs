// Supplier aggregation report
//
// Campaign-wide per-product quantities, revenue and weight for the document
// sent to the supplier. Gross figures only: shipping is not part of it.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::campaign::catalog::{validate_orders, ProductCatalog};
use crate::campaign::{
    Order, PriceCalculator, PricingConfig, PricingError, Product, ProductTotal, SupplierReport,
    UnresolvedReference,
};

#[derive(Debug, Default, Clone, Copy)]
struct RunningTotal {
    quantity: u64,
    value: Decimal,
    weight: Decimal,
}

/// Per-product totals with the default configuration.
///
/// See [`aggregate_products`] for the rules.
pub fn compute_product_totals(products: &[Product], orders: &[Order]) -> Result<Vec<ProductTotal>, PricingError> {
    aggregate_products(products, orders, &PricingConfig::default())
}

/// Sum quantity, value and weight per product over every order line.
///
/// Lines whose product is unknown are skipped (or fail under the strict
/// policy). Products nobody ordered are left out. The result is sorted by
/// product name the way a Portuguese reader expects: accents and case do not
/// change the alphabetical position.
pub fn aggregate_products(
    products: &[Product],
    orders: &[Order],
    config: &PricingConfig,
) -> Result<Vec<ProductTotal>, PricingError> {
    let catalog = ProductCatalog::build(products, config.reference_policy)?;
    aggregate_with_catalog(&catalog, orders, config.currency_scale)
}

/// Per-product totals against an already built catalog
pub fn aggregate_with_catalog(
    catalog: &ProductCatalog<'_>,
    orders: &[Order],
    scale: u32,
) -> Result<Vec<ProductTotal>, PricingError> {
    validate_orders(orders)?;

    let mut running: HashMap<&str, RunningTotal> = catalog
        .products()
        .iter()
        .map(|product| (product.id.as_str(), RunningTotal::default()))
        .collect();

    for order in orders {
        for item in &order.items {
            let Some(product) = catalog.resolve(order, item)? else {
                continue;
            };
            if let Some(total) = running.get_mut(product.id.as_str()) {
                total.quantity = total
                    .quantity
                    .checked_add(u64::from(item.quantity))
                    .ok_or(PricingError::Overflow { operation: "product quantity" })?;
                total.value = PriceCalculator::add(
                    total.value,
                    PriceCalculator::item_subtotal(item, product)?,
                    "product value",
                )?;
                total.weight = PriceCalculator::add(
                    total.weight,
                    PriceCalculator::item_weight(item, product)?,
                    "product weight",
                )?;
            }
        }
    }

    let mut totals: Vec<ProductTotal> = catalog
        .products()
        .iter()
        .filter_map(|product| {
            let total = running.get(product.id.as_str())?;
            if total.quantity == 0 {
                return None;
            }
            Some(ProductTotal {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                total_quantity: total.quantity,
                unit_price: product.unit_price,
                total_value: PriceCalculator::to_money(total.value, scale),
                weight: product.unit_weight,
                total_weight: total.weight,
            })
        })
        .collect();

    totals.sort_by(|a, b| {
        compare_names(&a.product_name, &b.product_name).then_with(|| a.product_id.cmp(&b.product_id))
    });

    Ok(totals)
}

/// Wrap product totals into the supplier-facing report with grand totals
pub fn build_report(
    campaign_id: &str,
    items: Vec<ProductTotal>,
    unresolved_references: Vec<UnresolvedReference>,
) -> Result<SupplierReport, PricingError> {
    let values: Vec<Decimal> = items.iter().map(|i| i.total_value).collect();
    let weights: Vec<Decimal> = items.iter().map(|i| i.total_weight).collect();
    let total_quantity = items
        .iter()
        .try_fold(0u64, |acc, i| acc.checked_add(i.total_quantity))
        .ok_or(PricingError::Overflow { operation: "report quantity" })?;

    Ok(SupplierReport {
        campaign_id: campaign_id.to_string(),
        total_quantity,
        total_value: PriceCalculator::calculate_total(&values)?,
        total_weight: PriceCalculator::calculate_total(&weights)?,
        items,
        unresolved_references,
    })
}

/// Compare two product names alphabetically, ignoring accents and case
/// first, then using them to break ties so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Base letters only: decomposed, combining marks dropped, lowercased
fn collation_key(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::campaign::OrderItem;
    use proptest::prelude::*;

    fn campaign_strategy() -> impl Strategy<Value = (Vec<Product>, Vec<Order>)> {
        (
            prop::collection::vec(("[A-Za-zÁÉÍÓÚÇáéíóúçãõ ]{1,12}", 0u32..=10_000u32), 1..=10),
            prop::collection::vec(prop::collection::vec((0usize..10, 1u32..=9u32), 0..=5), 0..=12),
        )
            .prop_map(|(product_rows, order_rows)| {
                let products: Vec<Product> = product_rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (name, price_cents))| Product {
                        id: format!("p{}", i),
                        name,
                        unit_price: Decimal::new(price_cents as i64, 2),
                        unit_weight: Decimal::from(i as u32 * 100),
                    })
                    .collect();
                let orders: Vec<Order> = order_rows
                    .iter()
                    .enumerate()
                    .map(|(i, lines)| Order {
                        id: format!("o{}", i),
                        items: lines
                            .iter()
                            .map(|(p, quantity)| OrderItem {
                                product_id: format!("p{}", p % products.len()),
                                quantity: *quantity,
                            })
                            .collect(),
                    })
                    .collect();
                (products, orders)
            })
    }

    /// No product with zero quantity ever appears
    #[test]
    fn prop_exclusion() {
        proptest!(|((products, orders) in campaign_strategy())| {
            let totals = compute_product_totals(&products, &orders).unwrap();
            for total in &totals {
                prop_assert!(total.total_quantity > 0);
            }
        });
    }

    /// Output is sorted by name
    #[test]
    fn prop_sorted_by_name() {
        proptest!(|((products, orders) in campaign_strategy())| {
            let totals = compute_product_totals(&products, &orders).unwrap();
            for pair in totals.windows(2) {
                prop_assert_ne!(
                    compare_names(&pair[0].product_name, &pair[1].product_name),
                    Ordering::Greater
                );
            }
        });
    }

    /// Same inputs, same outputs; quantities add up to the ordered units
    #[test]
    fn prop_idempotence_and_quantity_conservation() {
        proptest!(|((products, orders) in campaign_strategy())| {
            let first = compute_product_totals(&products, &orders).unwrap();
            let second = compute_product_totals(&products, &orders).unwrap();
            prop_assert_eq!(&first, &second);

            let ordered: u64 = orders
                .iter()
                .flat_map(|o| o.items.iter())
                .map(|i| u64::from(i.quantity))
                .sum();
            let reported: u64 = first.iter().map(|t| t.total_quantity).sum();
            prop_assert_eq!(ordered, reported);
        });
    }
}
