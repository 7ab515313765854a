//! ZOQL statement builder
//!
//! Renders the restricted `select ... from ... where Field = 'value'` form
//! the billing platform accepts, and parses that same form back for the
//! in-memory catalog.

use std::fmt;
use zpricing_core::models::RatePlanId;

/// Catalog object names
pub mod objects {
    pub const PRODUCT_RATE_PLAN_CHARGE: &str = "ProductRatePlanCharge";
    pub const PRODUCT_RATE_PLAN_CHARGE_TIER: &str = "ProductRatePlanChargeTier";
}

/// Catalog field names
pub mod fields {
    pub const ID: &str = "Id";
    pub const CHARGE_MODEL: &str = "ChargeModel";
    pub const CURRENCY: &str = "Currency";
    pub const PRICE: &str = "Price";
    pub const DISCOUNT_PERCENTAGE: &str = "DiscountPercentage";
    pub const PRODUCT_RATE_PLAN_ID: &str = "ProductRatePlanId";
    pub const PRODUCT_RATE_PLAN_CHARGE_ID: &str = "ProductRatePlanChargeId";
}

/// A single-object select with at most one equality filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoqlQuery {
    fields: Vec<String>,
    object: String,
    filter: Option<(String, String)>,
}

impl ZoqlQuery {
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            object: String::new(),
            filter: None,
        }
    }

    pub fn from(mut self, object: &str) -> Self {
        self.object = object.to_string();
        self
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filter = Some((field.to_string(), value.into()));
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    /// `(field, unescaped value)` of the where clause
    pub fn filter(&self) -> Option<(&str, &str)> {
        self.filter.as_ref().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    /// Case-insensitive check against the selected fields
    pub fn selects(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.eq_ignore_ascii_case(field))
    }

    /// Parse the subset of ZOQL this type renders
    ///
    /// Keywords are case-insensitive and the space before `=` is optional.
    /// Returns `None` for anything else (joins, `and`, unterminated literals).
    pub fn parse_simple(statement: &str) -> Option<Self> {
        let statement = statement.trim();
        let (head, literal) = match statement.find('\'') {
            Some(pos) => (&statement[..pos], Some(&statement[pos..])),
            None => (statement, None),
        };

        let lower = head.to_ascii_lowercase();
        if !lower.starts_with("select ") {
            return None;
        }
        let from_at = lower.find(" from ")?;

        let fields: Vec<String> = head
            .get("select ".len()..from_at)?
            .split(',')
            .map(|f| f.trim().to_string())
            .collect();
        if fields.iter().any(|f| f.is_empty() || f.contains(' ')) {
            return None;
        }

        let rest = &head[from_at + " from ".len()..];
        let rest_lower = &lower[from_at + " from ".len()..];

        let (object, filter) = match rest_lower.find(" where ") {
            Some(where_at) => {
                let condition = rest[where_at + " where ".len()..].trim();
                let field = condition.strip_suffix('=')?.trim();
                if field.is_empty() || field.contains(' ') {
                    return None;
                }
                let value = unescape_literal(literal?)?;
                (rest[..where_at].trim(), Some((field.to_string(), value)))
            }
            None => {
                if literal.is_some() {
                    return None;
                }
                (rest.trim(), None)
            }
        };

        if object.is_empty() || object.contains(' ') {
            return None;
        }

        Some(Self {
            fields,
            object: object.to_string(),
            filter,
        })
    }
}

impl fmt::Display for ZoqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select {} from {}", self.fields.join(", "), self.object)?;
        if let Some((field, value)) = &self.filter {
            write!(f, " where {} = '{}'", field, escape_literal(value))?;
        }
        Ok(())
    }
}

/// Escape a value for use inside a single-quoted ZOQL literal
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Read a quoted literal that must close at the end of the input
fn unescape_literal(literal: &str) -> Option<String> {
    let mut chars = literal.trim_end().chars();
    if chars.next()? != '\'' {
        return None;
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            '\'' => {
                return if chars.as_str().is_empty() {
                    Some(value)
                } else {
                    None
                };
            }
            _ => value.push(c),
        }
    }
    None
}

/// Charges belonging to a rate plan
pub fn charges_for_rate_plan(rate_plan_id: &RatePlanId) -> ZoqlQuery {
    ZoqlQuery::select(&[fields::ID, fields::CHARGE_MODEL])
        .from(objects::PRODUCT_RATE_PLAN_CHARGE)
        .where_eq(fields::PRODUCT_RATE_PLAN_ID, rate_plan_id.as_str())
}

/// Tiers of a charge with one value field (`Price` or `DiscountPercentage`)
pub fn tiers_for_charge(charge_id: &str, value_field: &str) -> ZoqlQuery {
    ZoqlQuery::select(&[fields::ID, value_field, fields::CURRENCY])
        .from(objects::PRODUCT_RATE_PLAN_CHARGE_TIER)
        .where_eq(fields::PRODUCT_RATE_PLAN_CHARGE_ID, charge_id)
}
