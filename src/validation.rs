// Validation utilities module
// Custom field validators used by the campaign snapshot types

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a monetary amount or weight is not negative
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("must_be_non_negative");
        error.add_param("value".into(), &value.to_string());
        Err(error)
    } else {
        Ok(())
    }
}

/// Validates that an identifier contains something other than whitespace
pub fn validate_non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Validates that the configured currency scale is usable for money
pub fn validate_currency_scale(scale: u32) -> Result<(), ValidationError> {
    if scale > crate::config::MAX_CURRENCY_SCALE {
        Err(ValidationError::new("currency_scale_out_of_range"))
    } else {
        Ok(())
    }
}
