use rust_decimal::Decimal;

/// Error types for campaign pricing and reporting
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    #[error("Duplicate order id: {0}")]
    DuplicateOrder(String),

    #[error("Order {order_id} references unknown product {product_id}")]
    UnknownProduct { order_id: String, product_id: String },

    #[error("Amount out of range while computing {operation}")]
    Overflow { operation: &'static str },
}

impl PricingError {
    /// Machine-readable code used in HTTP error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::Validation(_) | PricingError::NegativeAmount { .. } => "VALIDATION_ERROR",
            PricingError::DuplicateProduct(_) => "DUPLICATE_PRODUCT",
            PricingError::DuplicateOrder(_) => "DUPLICATE_ORDER",
            PricingError::UnknownProduct { .. } => "UNKNOWN_PRODUCT",
            PricingError::Overflow { .. } => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

impl From<validator::ValidationErrors> for PricingError {
    fn from(err: validator::ValidationErrors) -> Self {
        PricingError::Validation(err.to_string())
    }
}
