//! Product catalog records
//!
//! The billing platform answers catalog queries with generic records whose
//! concrete kind is carried in a `type` field. They are decoded straight into
//! the `QueryRecord` union so callers never downcast.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Charge model of a product rate plan charge
///
/// Only two models are priced by this crate. Anything else the platform
/// reports is kept verbatim in `Other` so it can be reported back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargeModel {
    /// Flat price per unit ("Per Unit Pricing")
    PerUnitPricing,
    /// Percentage off ("Discount-Percentage")
    DiscountPercentage,
    /// Any model the resolver does not price
    Other(String),
}

impl ChargeModel {
    pub const PER_UNIT_PRICING: &'static str = "Per Unit Pricing";
    pub const DISCOUNT_PERCENTAGE: &'static str = "Discount-Percentage";

    /// Vendor spelling of the model
    pub fn as_str(&self) -> &str {
        match self {
            ChargeModel::PerUnitPricing => Self::PER_UNIT_PRICING,
            ChargeModel::DiscountPercentage => Self::DISCOUNT_PERCENTAGE,
            ChargeModel::Other(raw) => raw,
        }
    }
}

impl From<String> for ChargeModel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            Self::PER_UNIT_PRICING => ChargeModel::PerUnitPricing,
            Self::DISCOUNT_PERCENTAGE => ChargeModel::DiscountPercentage,
            _ => ChargeModel::Other(raw),
        }
    }
}

impl From<&str> for ChargeModel {
    fn from(raw: &str) -> Self {
        ChargeModel::from(raw.to_string())
    }
}

impl From<ChargeModel> for String {
    fn from(model: ChargeModel) -> Self {
        match model {
            ChargeModel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ChargeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `ProductRatePlanCharge` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRecord {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "ChargeModel")]
    pub charge_model: ChargeModel,

    /// Owning rate plan; not always selected
    #[serde(
        rename = "ProductRatePlanId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_plan_id: Option<String>,
}

impl ChargeRecord {
    pub fn new(id: impl Into<String>, charge_model: ChargeModel) -> Self {
        Self {
            id: id.into(),
            charge_model,
            rate_plan_id: None,
        }
    }

    /// Attach the owning rate plan
    pub fn for_rate_plan(mut self, rate_plan_id: impl Into<String>) -> Self {
        self.rate_plan_id = Some(rate_plan_id.into());
        self
    }
}

/// A `ProductRatePlanChargeTier` row
///
/// Which value field is meaningful depends on the owning charge's model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "Currency")]
    pub currency: String,

    #[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    #[serde(
        rename = "DiscountPercentage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percentage: Option<Decimal>,

    /// Owning charge; not always selected
    #[serde(
        rename = "ProductRatePlanChargeId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub charge_id: Option<String>,
}

impl TierRecord {
    /// Tier carrying a unit price
    pub fn priced(currency: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            currency: currency.into(),
            price: Some(price),
            discount_percentage: None,
            charge_id: None,
        }
    }

    /// Tier carrying a discount percentage
    pub fn discounted(currency: impl Into<String>, discount_percentage: Decimal) -> Self {
        Self {
            id: None,
            currency: currency.into(),
            price: None,
            discount_percentage: Some(discount_percentage),
            charge_id: None,
        }
    }

    /// Attach the owning charge
    pub fn for_charge(mut self, charge_id: impl Into<String>) -> Self {
        self.charge_id = Some(charge_id.into());
        self
    }

    /// Exact, case-sensitive currency match
    #[inline]
    pub fn is_currency(&self, currency: &str) -> bool {
        self.currency == currency
    }
}

/// A record returned by a catalog query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueryRecord {
    #[serde(rename = "ProductRatePlanCharge")]
    Charge(ChargeRecord),

    #[serde(rename = "ProductRatePlanChargeTier")]
    Tier(TierRecord),
}

impl QueryRecord {
    pub fn as_charge(&self) -> Option<&ChargeRecord> {
        match self {
            QueryRecord::Charge(charge) => Some(charge),
            QueryRecord::Tier(_) => None,
        }
    }

    pub fn as_tier(&self) -> Option<&TierRecord> {
        match self {
            QueryRecord::Tier(tier) => Some(tier),
            QueryRecord::Charge(_) => None,
        }
    }

    pub fn into_charge(self) -> Option<ChargeRecord> {
        match self {
            QueryRecord::Charge(charge) => Some(charge),
            QueryRecord::Tier(_) => None,
        }
    }

    pub fn into_tier(self) -> Option<TierRecord> {
        match self {
            QueryRecord::Tier(tier) => Some(tier),
            QueryRecord::Charge(_) => None,
        }
    }
}

impl From<ChargeRecord> for QueryRecord {
    fn from(charge: ChargeRecord) -> Self {
        QueryRecord::Charge(charge)
    }
}

impl From<TierRecord> for QueryRecord {
    fn from(tier: TierRecord) -> Self {
        QueryRecord::Tier(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_charge_model_vendor_strings() {
        assert_eq!(
            ChargeModel::from("Per Unit Pricing"),
            ChargeModel::PerUnitPricing
        );
        assert_eq!(
            ChargeModel::from("Discount-Percentage"),
            ChargeModel::DiscountPercentage
        );
        assert_eq!(
            ChargeModel::from("Tiered Pricing"),
            ChargeModel::Other("Tiered Pricing".to_string())
        );
        assert_eq!(
            ChargeModel::from("per unit pricing"),
            ChargeModel::Other("per unit pricing".to_string())
        );
    }

    #[test]
    fn test_deserialize_charge_record() {
        let json = r#"{"type":"ProductRatePlanCharge","Id":"c-1","ChargeModel":"Per Unit Pricing"}"#;
        let record: QueryRecord = serde_json::from_str(json).unwrap();

        let charge = record.as_charge().unwrap();
        assert_eq!(charge.id, "c-1");
        assert_eq!(charge.charge_model, ChargeModel::PerUnitPricing);
        assert!(record.as_tier().is_none());
    }

    #[test]
    fn test_deserialize_tier_keeps_decimal_scale() {
        let json = r#"{"type":"ProductRatePlanChargeTier","Id":"t-1","Currency":"EUR","Price":"74.99"}"#;
        let record: QueryRecord = serde_json::from_str(json).unwrap();

        let tier = record.into_tier().unwrap();
        assert_eq!(tier.price, Some(dec!(74.99)));
        assert_eq!(tier.price.unwrap().to_string(), "74.99");
        assert!(tier.discount_percentage.is_none());
        assert!(tier.is_currency("EUR"));
        assert!(!tier.is_currency("eur"));
    }

    #[test]
    fn test_deserialize_numeric_discount() {
        let json = r#"{"type":"ProductRatePlanChargeTier","Currency":"EUR","DiscountPercentage":60}"#;
        let record: QueryRecord = serde_json::from_str(json).unwrap();

        let tier = record.into_tier().unwrap();
        assert_eq!(tier.discount_percentage.unwrap().to_string(), "60");
    }

    #[test]
    fn test_numeric_values_keep_vendor_scale() {
        let json = r#"{"type":"ProductRatePlanChargeTier","Currency":"EUR","Price":74.990,"DiscountPercentage":60.00}"#;
        let tier = serde_json::from_str::<QueryRecord>(json)
            .unwrap()
            .into_tier()
            .unwrap();

        assert_eq!(tier.price.unwrap().to_string(), "74.990");
        assert_eq!(tier.discount_percentage.unwrap().to_string(), "60.00");
    }

    #[test]
    fn test_numeric_values_keep_full_precision() {
        let json = r#"{"type":"ProductRatePlanChargeTier","Currency":"EUR","Price":1234567890.123456789}"#;
        let tier = serde_json::from_str::<QueryRecord>(json)
            .unwrap()
            .into_tier()
            .unwrap();

        assert_eq!(tier.price, Some(dec!(1234567890.123456789)));
        assert_eq!(tier.price.unwrap().to_string(), "1234567890.123456789");

        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let tier = serde_json::from_value::<QueryRecord>(value)
            .unwrap()
            .into_tier()
            .unwrap();
        assert_eq!(tier.price.unwrap().to_string(), "1234567890.123456789");
    }

    #[test]
    fn test_unknown_model_survives_round_trip() {
        let charge = ChargeRecord::new("c-2", ChargeModel::from("Volume Pricing"));
        let json = serde_json::to_string(&QueryRecord::from(charge.clone())).unwrap();
        assert!(json.contains("\"ChargeModel\":\"Volume Pricing\""));

        let back: QueryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QueryRecord::Charge(charge));
    }
}
