//! Unified error handling for ZPricing
//!
//! Every failure a resolution can hit is expressed as an `AppError`. The
//! not-found family carries the identifier (and currency, where relevant)
//! of the lookup that came back empty so the caller can diagnose it without
//! querying again.

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Lookup Errors ====================
    #[error("No charge found for rate plan: {rate_plan_id}")]
    ChargeNotFound { rate_plan_id: String },

    #[error("No tier found for charge: {charge_id}")]
    TierNotFound { charge_id: String },

    #[error("No price for currency '{currency}' on charge {charge_id}")]
    PriceNotFound { charge_id: String, currency: String },

    #[error("No discount percentage for currency '{currency}' on charge {charge_id}")]
    DiscountNotFound { charge_id: String, currency: String },

    #[error("Unsupported charge model '{model}' on charge {charge_id}")]
    UnsupportedChargeModel { charge_id: String, model: String },

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== External Service Errors ====================
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: status {0}")]
    Http(u16),

    #[error("Timeout: request took longer than {0}ms")]
    Timeout(u64),

    #[error("Query failed: {0}")]
    Query(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// True for the errors raised when a required lookup returned nothing
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ChargeNotFound { .. }
                | AppError::TierNotFound { .. }
                | AppError::PriceNotFound { .. }
                | AppError::DiscountNotFound { .. }
        )
    }

    /// Returns a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ChargeNotFound { .. } => "charge_not_found",
            AppError::TierNotFound { .. } => "tier_not_found",
            AppError::PriceNotFound { .. } => "price_not_found",
            AppError::DiscountNotFound { .. } => "discount_not_found",
            AppError::UnsupportedChargeModel { .. } => "unsupported_charge_model",
            AppError::Validation(_) => "validation_error",
            AppError::Connection(_) => "connection_error",
            AppError::Http(_) => "http_error",
            AppError::Timeout(_) => "timeout",
            AppError::Query(_) => "query_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family() {
        assert!(AppError::ChargeNotFound {
            rate_plan_id: "rp-1".to_string()
        }
        .is_not_found());
        assert!(AppError::PriceNotFound {
            charge_id: "c-1".to_string(),
            currency: "EUR".to_string()
        }
        .is_not_found());
        assert!(!AppError::UnsupportedChargeModel {
            charge_id: "c-1".to_string(),
            model: "Tiered Pricing".to_string()
        }
        .is_not_found());
        assert!(!AppError::Http(500).is_not_found());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::TierNotFound {
                charge_id: "c-1".to_string()
            }
            .error_code(),
            "tier_not_found"
        );
        assert_eq!(AppError::Timeout(50).error_code(), "timeout");
    }

    #[test]
    fn test_messages_name_the_lookup() {
        let err = AppError::DiscountNotFound {
            charge_id: "c-9".to_string(),
            currency: "GBP".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("GBP"));
        assert!(message.contains("c-9"));
    }
}
