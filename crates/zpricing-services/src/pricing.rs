//! Price and discount resolution
//!
//! For each rate plan: find its charge, branch on the charge model, find the
//! charge's tiers, and keep the value of the first tier in the requested
//! currency. Any miss aborts the whole request.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use zpricing_core::{
    models::{
        ChargeModel, ChargeRecord, PriceAndDiscountRequest, PriceAndDiscountResponse, RatePlanId,
        TierRecord,
    },
    traits::{PricingService, QueryService},
    AppError, AppResult,
};
use zpricing_query::statement::{charges_for_rate_plan, fields, tiers_for_charge};

/// Value resolved for a single rate plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePlanValue {
    /// Unit price of a "Per Unit Pricing" charge
    Price(Decimal),
    /// Percentage of a "Discount-Percentage" charge
    Discount(Decimal),
}

/// Resolver over any catalog query source
///
/// Holds no per-request state and can be shared across tasks.
pub struct PriceDiscountResolver<Q: QueryService + ?Sized> {
    query: Arc<Q>,
}

impl<Q: QueryService + ?Sized> Clone for PriceDiscountResolver<Q> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
        }
    }
}

impl<Q: QueryService + ?Sized> PriceDiscountResolver<Q> {
    /// Create a new resolver
    pub fn new(query: Arc<Q>) -> Self {
        Self { query }
    }

    /// Validate the inputs and resolve them
    pub async fn resolve_for<I, T>(
        &self,
        currency: &str,
        rate_plan_ids: I,
    ) -> AppResult<PriceAndDiscountResponse>
    where
        I: IntoIterator<Item = T>,
        T: Into<RatePlanId>,
    {
        let request = PriceAndDiscountRequest::new(currency, rate_plan_ids)?;
        self.resolve_request(&request).await
    }

    #[instrument(skip(self, request), fields(currency = %request.currency(), rate_plans = request.rate_plan_ids().len()))]
    async fn resolve_request(
        &self,
        request: &PriceAndDiscountRequest,
    ) -> AppResult<PriceAndDiscountResponse> {
        let currency = request.currency();
        let mut price = None;
        let mut discount = None;

        for rate_plan_id in request.rate_plan_ids() {
            match self.resolve_rate_plan(rate_plan_id, currency).await? {
                RatePlanValue::Price(value) => price = Some(value),
                RatePlanValue::Discount(value) => discount = Some(value),
            }
        }

        info!("Results, price: {:?} discount: {:?}", price, discount);

        Ok(PriceAndDiscountResponse::new(price, discount))
    }

    /// Resolve one rate plan in `currency`
    #[instrument(skip(self))]
    pub async fn resolve_rate_plan(
        &self,
        rate_plan_id: &RatePlanId,
        currency: &str,
    ) -> AppResult<RatePlanValue> {
        let charge = self.find_charge(rate_plan_id).await?;

        info!(
            "Looking up tiers for charge '{}' with charge model '{}'",
            charge.id, charge.charge_model
        );

        match &charge.charge_model {
            ChargeModel::PerUnitPricing => {
                let tier = self.find_tier(&charge, fields::PRICE, currency).await?;
                let price = tier.price.ok_or_else(|| {
                    error!("There is no price for the currency: '{}'", currency);
                    AppError::PriceNotFound {
                        charge_id: charge.id.clone(),
                        currency: currency.to_string(),
                    }
                })?;
                info!("Found price '{}' for currency '{}'", price, currency);
                Ok(RatePlanValue::Price(price))
            }
            ChargeModel::DiscountPercentage => {
                let tier = self
                    .find_tier(&charge, fields::DISCOUNT_PERCENTAGE, currency)
                    .await?;
                let discount = tier.discount_percentage.ok_or_else(|| {
                    error!(
                        "There is no discount percentage for the currency: '{}'",
                        currency
                    );
                    AppError::DiscountNotFound {
                        charge_id: charge.id.clone(),
                        currency: currency.to_string(),
                    }
                })?;
                info!("Found discount '{}' for currency '{}'", discount, currency);
                Ok(RatePlanValue::Discount(discount))
            }
            ChargeModel::Other(model) => {
                error!(
                    "Charge '{}' uses unsupported charge model '{}'",
                    charge.id, model
                );
                Err(AppError::UnsupportedChargeModel {
                    charge_id: charge.id.clone(),
                    model: model.clone(),
                })
            }
        }
    }

    /// First charge of the rate plan
    async fn find_charge(&self, rate_plan_id: &RatePlanId) -> AppResult<ChargeRecord> {
        info!(
            "Looking up ProductRatePlanCharge for ProductRatePlanId: '{}'",
            rate_plan_id
        );

        let statement = charges_for_rate_plan(rate_plan_id).to_string();
        let mut charges = self
            .query
            .query(&statement)
            .await?
            .into_iter()
            .filter_map(|record| record.into_charge());

        let charge = charges.next().ok_or_else(|| {
            error!(
                "There is no ProductRatePlanCharge with ProductRatePlanId '{}'",
                rate_plan_id
            );
            AppError::ChargeNotFound {
                rate_plan_id: rate_plan_id.to_string(),
            }
        })?;

        let ignored = charges.count();
        if ignored > 0 {
            debug!(
                "Rate plan '{}' has {} more charges; using '{}'",
                rate_plan_id, ignored, charge.id
            );
        }

        Ok(charge)
    }

    /// First tier of the charge in `currency`
    ///
    /// The model-specific value is checked by the caller, so a matching row
    /// with an empty value is still returned here.
    async fn find_tier(
        &self,
        charge: &ChargeRecord,
        value_field: &str,
        currency: &str,
    ) -> AppResult<TierRecord> {
        let statement = tiers_for_charge(&charge.id, value_field).to_string();
        let tiers: Vec<TierRecord> = self
            .query
            .query(&statement)
            .await?
            .into_iter()
            .filter_map(|record| record.into_tier())
            .collect();

        if tiers.is_empty() {
            error!(
                "There is no ProductRatePlanChargeTier with ProductRatePlanChargeId '{}'",
                charge.id
            );
            return Err(AppError::TierNotFound {
                charge_id: charge.id.clone(),
            });
        }

        tiers
            .into_iter()
            .find(|tier| tier.is_currency(currency))
            .ok_or_else(|| {
                error!(
                    "There is no tier for the currency: '{}' on charge '{}'",
                    currency, charge.id
                );
                match charge.charge_model {
                    ChargeModel::DiscountPercentage => AppError::DiscountNotFound {
                        charge_id: charge.id.clone(),
                        currency: currency.to_string(),
                    },
                    _ => AppError::PriceNotFound {
                        charge_id: charge.id.clone(),
                        currency: currency.to_string(),
                    },
                }
            })
    }
}

#[async_trait]
impl<Q: QueryService + ?Sized> PricingService for PriceDiscountResolver<Q> {
    async fn resolve(
        &self,
        request: &PriceAndDiscountRequest,
    ) -> AppResult<PriceAndDiscountResponse> {
        self.resolve_request(request).await
    }
}
