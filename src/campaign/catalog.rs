// Product catalog for one campaign snapshot
//
// Indexes products by ID once per computation so that resolving order lines
// is a hash lookup instead of a scan of the product list.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use validator::Validate;

use crate::campaign::{Order, OrderItem, PricingError, Product, UnresolvedReference};

/// What to do with an order line whose product is not in the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// The line contributes nothing and a warning is logged
    #[default]
    Lenient,
    /// The computation fails with `PricingError::UnknownProduct`
    Strict,
}

impl FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ReferencePolicy::Lenient),
            "strict" => Ok(ReferencePolicy::Strict),
            _ => Err(format!("Invalid reference policy: {}", s)),
        }
    }
}

/// Read-only index of a campaign's products
#[derive(Debug)]
pub struct ProductCatalog<'a> {
    products: &'a [Product],
    by_id: HashMap<&'a str, &'a Product>,
    policy: ReferencePolicy,
}

impl<'a> ProductCatalog<'a> {
    /// Validate the products and index them by ID.
    ///
    /// Fails on any invalid product or on two products sharing an ID.
    pub fn build(products: &'a [Product], policy: ReferencePolicy) -> Result<Self, PricingError> {
        let mut by_id = HashMap::with_capacity(products.len());

        for product in products {
            product.validate()?;
            if by_id.insert(product.id.as_str(), product).is_some() {
                return Err(PricingError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            products,
            by_id,
            policy,
        })
    }

    /// Products in the order they were supplied
    pub fn products(&self) -> &'a [Product] {
        self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&'a Product> {
        self.by_id.get(product_id).copied()
    }

    /// Look up the product of an order line, applying the reference policy.
    ///
    /// `Ok(None)` means the line is unresolved and must contribute zero.
    pub fn resolve(&self, order: &Order, item: &OrderItem) -> Result<Option<&'a Product>, PricingError> {
        match self.get(&item.product_id) {
            Some(product) => Ok(Some(product)),
            None => match self.policy {
                ReferencePolicy::Lenient => {
                    tracing::warn!(
                        order_id = %order.id,
                        product_id = %item.product_id,
                        "Order line references unknown product; counting it as zero"
                    );
                    Ok(None)
                }
                ReferencePolicy::Strict => Err(PricingError::UnknownProduct {
                    order_id: order.id.clone(),
                    product_id: item.product_id.clone(),
                }),
            },
        }
    }

    /// Every order line whose product is missing, in order/line order
    pub fn unresolved(&self, orders: &[Order]) -> Vec<UnresolvedReference> {
        orders
            .iter()
            .flat_map(|order| {
                order
                    .items
                    .iter()
                    .filter(|item| !self.by_id.contains_key(item.product_id.as_str()))
                    .map(|item| UnresolvedReference {
                        order_id: order.id.clone(),
                        product_id: item.product_id.clone(),
                    })
            })
            .collect()
    }
}

/// Validate every order and reject duplicated order IDs
pub fn validate_orders(orders: &[Order]) -> Result<(), PricingError> {
    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        order.validate()?;
        if !seen.insert(order.id.as_str()) {
            return Err(PricingError::DuplicateOrder(order.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            unit_price: dec!(5.00),
            unit_weight: dec!(100),
        }
    }

    fn order(id: &str, product_ids: &[&str]) -> Order {
        Order {
            id: id.to_string(),
            items: product_ids
                .iter()
                .map(|p| OrderItem {
                    product_id: p.to_string(),
                    quantity: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_indexes_products() {
        let products = vec![product("a"), product("b")];
        let catalog = ProductCatalog::build(&products, ReferencePolicy::Lenient).unwrap();
        assert_eq!(catalog.get("b").map(|p| p.id.as_str()), Some("b"));
        assert!(catalog.get("c").is_none());
        assert_eq!(catalog.products().len(), 2);
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let products = vec![product("a"), product("a")];
        let err = ProductCatalog::build(&products, ReferencePolicy::Lenient).unwrap_err();
        assert!(matches!(err, PricingError::DuplicateProduct(id) if id == "a"));
    }

    #[test]
    fn test_build_rejects_invalid_product() {
        let mut bad = product("a");
        bad.unit_price = dec!(-1);
        let err = ProductCatalog::build(std::slice::from_ref(&bad), ReferencePolicy::Lenient).unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_resolve_lenient_returns_none_for_unknown() {
        let products = vec![product("a")];
        let catalog = ProductCatalog::build(&products, ReferencePolicy::Lenient).unwrap();
        let order = order("o1", &["ghost"]);
        assert!(catalog.resolve(&order, &order.items[0]).unwrap().is_none());
    }

    #[test]
    fn test_resolve_strict_fails_for_unknown() {
        let products = vec![product("a")];
        let catalog = ProductCatalog::build(&products, ReferencePolicy::Strict).unwrap();
        let order = order("o1", &["ghost"]);
        let err = catalog.resolve(&order, &order.items[0]).unwrap_err();
        assert!(matches!(err, PricingError::UnknownProduct { .. }));
    }

    #[test]
    fn test_unresolved_lists_missing_lines() {
        let products = vec![product("a")];
        let catalog = ProductCatalog::build(&products, ReferencePolicy::Lenient).unwrap();
        let orders = vec![order("o1", &["a", "x"]), order("o2", &["y"])];
        let unresolved = catalog.unresolved(&orders);
        assert_eq!(
            unresolved,
            vec![
                UnresolvedReference { order_id: "o1".into(), product_id: "x".into() },
                UnresolvedReference { order_id: "o2".into(), product_id: "y".into() },
            ]
        );
    }

    #[test]
    fn test_validate_orders_rejects_duplicates() {
        let orders = vec![order("o1", &["a"]), order("o1", &["a"])];
        assert!(matches!(validate_orders(&orders), Err(PricingError::DuplicateOrder(_))));
    }

    #[test]
    fn test_reference_policy_from_str() {
        assert_eq!("Strict".parse::<ReferencePolicy>(), Ok(ReferencePolicy::Strict));
        assert_eq!(" lenient ".parse::<ReferencePolicy>(), Ok(ReferencePolicy::Lenient));
        assert!("loose".parse::<ReferencePolicy>().is_err());
    }
}
