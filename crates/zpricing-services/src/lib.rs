//! Business logic services for ZPricing
//!
//! # Services
//!
//! - `PriceDiscountResolver` - resolves the unit price and percentage
//!   discount of a set of rate plans in one currency
//!
//! The resolver owns its query source behind an `Arc`, keeps no state
//! between calls, and is instrumented with tracing.

pub mod pricing;

pub use pricing::{PriceDiscountResolver, RatePlanValue};
