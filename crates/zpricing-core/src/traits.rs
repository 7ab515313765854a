//! Common traits for catalog access
//!
//! The resolver never talks to the billing platform directly; it goes
//! through `QueryService`, which the HTTP client and the in-memory catalog
//! both implement. `PricingService` is what the resolver itself offers.

use crate::error::AppError;
use crate::models::{PriceAndDiscountRequest, PriceAndDiscountResponse, QueryRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Executes a ZOQL statement against the billing catalog
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run `statement` and return every matching record, in the order the
    /// platform returned them. An empty result is `Ok(vec![])`, not an error.
    async fn query(&self, statement: &str) -> Result<Vec<QueryRecord>, AppError>;
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    async fn query(&self, statement: &str) -> Result<Vec<QueryRecord>, AppError> {
        (**self).query(statement).await
    }
}

/// Price/discount resolution service
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Resolve the price and discount of every rate plan in the request
    async fn resolve(
        &self,
        request: &PriceAndDiscountRequest,
    ) -> Result<PriceAndDiscountResponse, AppError>;
}
