//! Domain models for ZPricing
//!
//! Catalog records returned by the billing platform and the values exchanged
//! with callers of the resolver.

pub mod catalog;
pub mod pricing;

pub use catalog::{ChargeModel, ChargeRecord, QueryRecord, TierRecord};
pub use pricing::{PriceAndDiscountRequest, PriceAndDiscountResponse, RatePlanId};
