//! Price and discount request/response values

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::{AppError, AppResult};

/// Identifier of a product rate plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatePlanId(String);

impl RatePlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RatePlanId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RatePlanId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RatePlanId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RatePlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request to price a set of rate plans in one currency
///
/// Always valid once constructed: the currency is a three-letter upper-case
/// code and there is at least one non-empty rate plan id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "RawPriceAndDiscountRequest")]
pub struct PriceAndDiscountRequest {
    #[validate(custom(function = "validate_currency_code"))]
    currency: String,

    #[validate(
        length(min = 1, message = "At least one rate plan is required"),
        custom(function = "validate_rate_plan_ids")
    )]
    rate_plan_ids: Vec<RatePlanId>,
}

#[derive(Deserialize)]
struct RawPriceAndDiscountRequest {
    currency: String,
    rate_plan_ids: Vec<RatePlanId>,
}

impl TryFrom<RawPriceAndDiscountRequest> for PriceAndDiscountRequest {
    type Error = AppError;

    fn try_from(raw: RawPriceAndDiscountRequest) -> AppResult<Self> {
        Self::new(raw.currency, raw.rate_plan_ids)
    }
}

fn validate_currency_code(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_code");
        err.message = Some("Currency must be a three-letter upper-case code".into());
        Err(err)
    }
}

fn validate_rate_plan_ids(ids: &[RatePlanId]) -> Result<(), ValidationError> {
    if ids.iter().any(|id| id.as_str().trim().is_empty()) {
        let mut err = ValidationError::new("rate_plan_id");
        err.message = Some("Rate plan ids must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl PriceAndDiscountRequest {
    /// Build a validated request
    pub fn new<I, T>(currency: impl Into<String>, rate_plan_ids: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RatePlanId>,
    {
        let request = Self {
            currency: currency.into(),
            rate_plan_ids: rate_plan_ids.into_iter().map(Into::into).collect(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Rate plans in the order they are resolved
    pub fn rate_plan_ids(&self) -> &[RatePlanId] {
        &self.rate_plan_ids
    }
}

/// Resolved price and discount
///
/// `price` comes from the last unit-priced plan of the request, `discount`
/// from the last percentage-discount plan. Either is absent when no plan of
/// that kind was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceAndDiscountResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    discount: Option<Decimal>,
}

impl PriceAndDiscountResponse {
    pub fn new(price: Option<Decimal>, discount: Option<Decimal>) -> Self {
        Self { price, discount }
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn discount(&self) -> Option<Decimal> {
        self.discount
    }
}
