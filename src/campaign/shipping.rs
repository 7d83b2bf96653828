// Shipping cost allocation
//
// Splits a campaign's freight across its orders in proportion to weight,
// falling back to an equal split between non-empty orders when nothing
// weighs anything. Shares are rounded to the currency's minor unit with the
// largest-remainder method so that they always add back up to the cost.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::campaign::{AllocationMode, PriceCalculator, PricingError};

/// What the allocator needs to know about one order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShippingBasis {
    pub total_weight: Decimal,
    pub has_items: bool,
}

/// Rounded shares, one per order in input order
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAllocation {
    pub shares: Vec<Decimal>,
    pub mode: AllocationMode,
}

/// Allocates shipping cost at a fixed currency scale
#[derive(Debug, Clone, Copy)]
pub struct ShippingAllocator {
    scale: u32,
}

impl ShippingAllocator {
    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    /// Split `shipping_cost` across `orders`.
    ///
    /// The cost is first rounded to the minor unit; the returned shares sum to
    /// exactly that rounded cost unless no order is eligible, in which case
    /// every share is zero.
    pub fn allocate(&self, shipping_cost: Decimal, orders: &[ShippingBasis]) -> Result<ShippingAllocation, PricingError> {
        let cost = PriceCalculator::to_money(shipping_cost, self.scale);
        let weights: Vec<Decimal> = orders.iter().map(|o| o.total_weight).collect();
        let campaign_weight = PriceCalculator::calculate_total(&weights)?;

        let (mode, basis) = if campaign_weight > Decimal::ZERO {
            (AllocationMode::Proportional, weights)
        } else if orders.iter().any(|o| o.has_items) {
            (
                AllocationMode::EqualSplit,
                orders
                    .iter()
                    .map(|o| if o.has_items { Decimal::ONE } else { Decimal::ZERO })
                    .collect(),
            )
        } else {
            if !cost.is_zero() {
                tracing::warn!(
                    shipping_cost = %cost,
                    orders = orders.len(),
                    "No order can carry shipping; cost left unallocated"
                );
            }
            return Ok(ShippingAllocation {
                shares: vec![PriceCalculator::to_money(Decimal::ZERO, self.scale); orders.len()],
                mode: AllocationMode::Unallocated,
            });
        };

        let shares = self.largest_remainder(cost, &basis)?;
        tracing::debug!(mode = %mode, shipping_cost = %cost, orders = orders.len(), "Shipping allocated");

        Ok(ShippingAllocation { shares, mode })
    }

    /// Distribute `cost` according to `basis` (at least one positive entry),
    /// truncating each exact share and handing the leftover minor units to
    /// the largest remainders, earliest order first on ties.
    fn largest_remainder(&self, cost: Decimal, basis: &[Decimal]) -> Result<Vec<Decimal>, PricingError> {
        let basis_total = PriceCalculator::calculate_total(basis)?;
        let unit = PriceCalculator::minor_unit(self.scale);

        let mut shares = Vec::with_capacity(basis.len());
        let mut remainders = Vec::with_capacity(basis.len());

        for (index, weight) in basis.iter().enumerate() {
            if weight.is_zero() {
                shares.push(Decimal::ZERO);
                continue;
            }
            let exact = exact_share(cost, *weight, basis_total)?;
            let truncated = exact.round_dp_with_strategy(self.scale, RoundingStrategy::ToZero);
            shares.push(truncated);
            remainders.push((index, exact - truncated));
        }

        // Each truncation loses less than one unit, so this is a handful of units
        let leftover = cost - PriceCalculator::calculate_total(&shares)?;
        let leftover_units = (leftover / unit)
            .round()
            .to_usize()
            .unwrap_or(0)
            .min(remainders.len());

        remainders.sort_by(|(ia, ra), (ib, rb)| rb.cmp(ra).then(ia.cmp(ib)));
        for (index, _) in remainders.into_iter().take(leftover_units) {
            shares[index] += unit;
        }

        Ok(shares
            .into_iter()
            .map(|share| PriceCalculator::to_money(share, self.scale))
            .collect())
    }
}

/// `cost * weight / basis_total`.
///
/// Multiplies first to keep every digit; when `cost * weight` does not fit,
/// divides first instead, which is still far finer than one minor unit.
fn exact_share(cost: Decimal, weight: Decimal, basis_total: Decimal) -> Result<Decimal, PricingError> {
    cost.checked_mul(weight)
        .and_then(|product| product.checked_div(basis_total))
        .or_else(|| {
            weight
                .checked_div(basis_total)
                .and_then(|ratio| cost.checked_mul(ratio))
        })
        .ok_or(PricingError::Overflow { operation: "shipping share" })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Rounded shares always add back up to the rounded cost
    #[test]
    fn prop_conservation_is_exact() {
        proptest!(|(
            cost_cents in 0i64..=10_000_000i64,
            weights in prop::collection::vec(0u32..=50_000u32, 1..=30)
        )| {
            let cost = Decimal::new(cost_cents, 2);
            let orders: Vec<ShippingBasis> = weights
                .iter()
                .map(|&w| ShippingBasis { total_weight: Decimal::from(w), has_items: true })
                .collect();

            let allocation = ShippingAllocator::new(2).allocate(cost, &orders).unwrap();
            prop_assert_eq!(allocation.shares.len(), orders.len());
            prop_assert_eq!(PriceCalculator::calculate_total(&allocation.shares).unwrap(), cost);
        });
    }

    /// An order twice as heavy pays twice as much, give or take rounding
    #[test]
    fn prop_proportionality() {
        proptest!(|(
            cost_cents in 1i64..=1_000_000i64,
            light in 1u32..=10_000u32,
            others in prop::collection::vec(0u32..=10_000u32, 0..=10)
        )| {
            let cost = Decimal::new(cost_cents, 2);
            let mut orders = vec![
                ShippingBasis { total_weight: Decimal::from(light) * Decimal::TWO, has_items: true },
                ShippingBasis { total_weight: Decimal::from(light), has_items: true },
            ];
            orders.extend(others.iter().map(|&w| ShippingBasis { total_weight: Decimal::from(w), has_items: true }));

            let allocation = ShippingAllocator::new(2).allocate(cost, &orders).unwrap();
            let heavy = allocation.shares[0];
            let light_share = allocation.shares[1];
            let tolerance = PriceCalculator::minor_unit(2) * Decimal::TWO;
            prop_assert!(
                (heavy - light_share * Decimal::TWO).abs() <= tolerance,
                "heavy {} vs light {}", heavy, light_share
            );
        });
    }

    /// Shares are never negative and never exceed the cost
    #[test]
    fn prop_shares_are_bounded() {
        proptest!(|(
            cost_cents in 0i64..=1_000_000i64,
            weights in prop::collection::vec(0u32..=1_000u32, 1..=20)
        )| {
            let cost = Decimal::new(cost_cents, 2);
            let orders: Vec<ShippingBasis> = weights
                .iter()
                .map(|&w| ShippingBasis { total_weight: Decimal::from(w), has_items: w % 2 == 0 })
                .collect();

            let allocation = ShippingAllocator::new(2).allocate(cost, &orders).unwrap();
            for share in &allocation.shares {
                prop_assert!(*share >= Decimal::ZERO);
                prop_assert!(*share <= cost);
            }
        });
    }
}
