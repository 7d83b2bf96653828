use rust_decimal::{Decimal, RoundingStrategy};

use crate::campaign::{OrderItem, PricingError, Product};

/// Line-level arithmetic shared by the order pricing engine and the supplier
/// report. Both views must go through these functions so they cannot drift.
///
/// Every operation is checked: amounts that do not fit in a `Decimal` come
/// back as `PricingError::Overflow` instead of panicking.
pub struct PriceCalculator;

impl PriceCalculator {
    /// Subtotal of one order line: quantity * unit price
    pub fn calculate_subtotal(quantity: u32, unit_price: Decimal) -> Result<Decimal, PricingError> {
        Decimal::from(quantity)
            .checked_mul(unit_price)
            .ok_or(PricingError::Overflow { operation: "line subtotal" })
    }

    /// Weight of one order line: quantity * unit weight
    pub fn calculate_line_weight(quantity: u32, unit_weight: Decimal) -> Result<Decimal, PricingError> {
        Decimal::from(quantity)
            .checked_mul(unit_weight)
            .ok_or(PricingError::Overflow { operation: "line weight" })
    }

    /// Subtotal of an item against the product it references
    pub fn item_subtotal(item: &OrderItem, product: &Product) -> Result<Decimal, PricingError> {
        Self::calculate_subtotal(item.quantity, product.unit_price)
    }

    /// Weight of an item against the product it references
    pub fn item_weight(item: &OrderItem, product: &Product) -> Result<Decimal, PricingError> {
        Self::calculate_line_weight(item.quantity, product.unit_weight)
    }

    /// Sum of a set of amounts
    pub fn calculate_total(amounts: &[Decimal]) -> Result<Decimal, PricingError> {
        amounts
            .iter()
            .try_fold(Decimal::ZERO, |acc, amount| Self::add(acc, *amount, "total"))
    }

    /// `a + b`, naming what was being computed when it does not fit
    pub fn add(a: Decimal, b: Decimal, operation: &'static str) -> Result<Decimal, PricingError> {
        a.checked_add(b).ok_or(PricingError::Overflow { operation })
    }

    /// Round an amount to the currency's minor unit, half away from zero,
    /// and pin the scale so it always prints with `scale` decimals.
    pub fn to_money(amount: Decimal, scale: u32) -> Decimal {
        let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(scale);
        rounded
    }

    /// Smallest representable currency amount at `scale` (0.01 for scale 2)
    pub fn minor_unit(scale: u32) -> Decimal {
        Decimal::new(1, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(price: Decimal, weight: Decimal) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Arroz".to_string(),
            unit_price: price,
            unit_weight: weight,
        }
    }

    #[test]
    fn test_calculate_subtotal_basic() {
        assert_eq!(PriceCalculator::calculate_subtotal(2, dec!(4.50)).unwrap(), dec!(9.00));
    }

    #[test]
    fn test_calculate_subtotal_decimal_precision() {
        assert_eq!(PriceCalculator::calculate_subtotal(3, dec!(4.33)).unwrap(), dec!(12.99));
    }

    #[test]
    fn test_line_weight() {
        assert_eq!(PriceCalculator::calculate_line_weight(3, dec!(250)).unwrap(), dec!(750));
    }

    #[test]
    fn test_item_helpers_use_product_fields() {
        let item = OrderItem {
            product_id: "p1".to_string(),
            quantity: 4,
        };
        let product = product(dec!(2.25), dec!(500));
        assert_eq!(PriceCalculator::item_subtotal(&item, &product).unwrap(), dec!(9.00));
        assert_eq!(PriceCalculator::item_weight(&item, &product).unwrap(), dec!(2000));
    }

    #[test]
    fn test_calculate_total_empty() {
        assert_eq!(PriceCalculator::calculate_total(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_too_large_is_an_error() {
        let err = PriceCalculator::calculate_subtotal(2, dec!(50000000000000000000000000000)).unwrap_err();
        assert!(matches!(err, PricingError::Overflow { operation: "line subtotal" }));
    }

    #[test]
    fn test_line_weight_too_large_is_an_error() {
        let err = PriceCalculator::calculate_line_weight(u32::MAX, Decimal::MAX).unwrap_err();
        assert!(matches!(err, PricingError::Overflow { operation: "line weight" }));
    }

    #[test]
    fn test_total_too_large_is_an_error() {
        let err = PriceCalculator::calculate_total(&[Decimal::MAX, dec!(1)]).unwrap_err();
        assert!(matches!(err, PricingError::Overflow { operation: "total" }));
    }

    #[test]
    fn test_to_money_rounds_half_away_from_zero() {
        assert_eq!(PriceCalculator::to_money(dec!(2.345), 2), dec!(2.35));
        assert_eq!(PriceCalculator::to_money(dec!(2.344), 2), dec!(2.34));
    }

    #[test]
    fn test_to_money_pins_scale() {
        assert_eq!(PriceCalculator::to_money(dec!(20), 2).to_string(), "20.00");
        assert_eq!(PriceCalculator::to_money(dec!(4.5), 2).to_string(), "4.50");
        assert_eq!(PriceCalculator::to_money(dec!(4.5), 0).to_string(), "5");
    }

    #[test]
    fn test_minor_unit() {
        assert_eq!(PriceCalculator::minor_unit(2), dec!(0.01));
        assert_eq!(PriceCalculator::minor_unit(0), dec!(1));
    }
}
