//! In-memory product catalog
//!
//! Answers the two lookups the resolver issues (charges by rate plan, tiers
//! by charge) from a fixed set of records. Used for fixtures, offline runs
//! and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument, warn};
use zpricing_core::{
    models::{ChargeRecord, QueryRecord, TierRecord},
    traits::QueryService,
    AppError, AppResult,
};

use crate::statement::{fields, objects, ZoqlQuery};

/// Fixture file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub charges: Vec<ChargeRecord>,
    #[serde(default)]
    pub tiers: Vec<TierRecord>,
}

/// Catalog held in memory
///
/// Charges must carry `rate_plan_id` and tiers `charge_id`; records without
/// an owner are never returned.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    charges: Vec<ChargeRecord>,
    tiers: Vec<TierRecord>,
    queries: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a charge owned by `rate_plan_id`
    pub fn with_charge(mut self, rate_plan_id: &str, charge: ChargeRecord) -> Self {
        self.charges.push(charge.for_rate_plan(rate_plan_id));
        self
    }

    /// Add a tier owned by `charge_id`
    pub fn with_tier(mut self, charge_id: &str, tier: TierRecord) -> Self {
        self.tiers.push(tier.for_charge(charge_id));
        self
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let catalog = Self {
            charges: snapshot.charges,
            tiers: snapshot.tiers,
            queries: AtomicUsize::new(0),
        };

        let orphans = catalog
            .charges
            .iter()
            .filter(|c| c.rate_plan_id.is_none())
            .count()
            + catalog.tiers.iter().filter(|t| t.charge_id.is_none()).count();
        if orphans > 0 {
            warn!("{} catalog records have no owner and will never match", orphans);
        }

        catalog
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a JSON fixture (`{"charges": [...], "tiers": [...]}`)
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Number of statements executed so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn charges_for(&self, rate_plan_id: &str) -> Vec<QueryRecord> {
        self.charges
            .iter()
            .filter(|c| c.rate_plan_id.as_deref() == Some(rate_plan_id))
            .cloned()
            .map(QueryRecord::Charge)
            .collect()
    }

    fn tiers_for(&self, charge_id: &str, query: &ZoqlQuery) -> Vec<QueryRecord> {
        let with_price = query.selects(fields::PRICE);
        let with_discount = query.selects(fields::DISCOUNT_PERCENTAGE);

        self.tiers
            .iter()
            .filter(|t| t.charge_id.as_deref() == Some(charge_id))
            .map(|t| {
                let mut tier = t.clone();
                if !with_price {
                    tier.price = None;
                }
                if !with_discount {
                    tier.discount_percentage = None;
                }
                QueryRecord::Tier(tier)
            })
            .collect()
    }
}

#[async_trait]
impl QueryService for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn query(&self, statement: &str) -> AppResult<Vec<QueryRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let query = ZoqlQuery::parse_simple(statement)
            .ok_or_else(|| AppError::Query(format!("unsupported statement: {}", statement)))?;

        let records = match (query.object(), query.filter()) {
            (object, Some((field, value)))
                if object.eq_ignore_ascii_case(objects::PRODUCT_RATE_PLAN_CHARGE)
                    && field.eq_ignore_ascii_case(fields::PRODUCT_RATE_PLAN_ID) =>
            {
                self.charges_for(value)
            }
            (object, Some((field, value)))
                if object.eq_ignore_ascii_case(objects::PRODUCT_RATE_PLAN_CHARGE_TIER)
                    && field.eq_ignore_ascii_case(fields::PRODUCT_RATE_PLAN_CHARGE_ID) =>
            {
                self.tiers_for(value, &query)
            }
            _ => {
                return Err(AppError::Query(format!(
                    "unsupported statement: {}",
                    statement
                )))
            }
        };

        debug!("In-memory catalog returned {} records", records.len());
        Ok(records)
    }
}
