//! Integration tests for price and discount resolution
//!
//! Runs the resolver against the in-memory catalog, including the EUR
//! fixture with one unit-priced and one percentage-discount plan.

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use zpricing_core::{
        models::{ChargeModel, ChargeRecord, PriceAndDiscountRequest, TierRecord},
        traits::{PricingService, QueryService},
        AppError,
    };
    use zpricing_query::InMemoryCatalog;
    use zpricing_services::PriceDiscountResolver;

    const UNIT_PLAN: &str = "2c92c0f9552e6022015530268f953190";
    const DISCOUNT_PLAN: &str = "2c92c0f8550f92e2015526a61cd65ad8";

    fn fixture() -> InMemoryCatalog {
        InMemoryCatalog::from_json_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/catalog.json"
        ))
        .unwrap()
    }

    fn resolver(catalog: InMemoryCatalog) -> (Arc<InMemoryCatalog>, PriceDiscountResolver<InMemoryCatalog>) {
        let catalog = Arc::new(catalog);
        (catalog.clone(), PriceDiscountResolver::new(catalog))
    }

    #[tokio::test]
    async fn test_unit_priced_plan_sets_price_only() {
        let (_, resolver) = resolver(fixture());

        let response = resolver.resolve_for("EUR", [UNIT_PLAN]).await.unwrap();

        assert_eq!(response.price(), Some(dec!(74.99)));
        assert_eq!(response.discount(), None);
    }

    #[tokio::test]
    async fn test_discount_plan_sets_discount_only() {
        let (_, resolver) = resolver(fixture());

        let response = resolver.resolve_for("EUR", [DISCOUNT_PLAN]).await.unwrap();

        assert_eq!(response.price(), None);
        assert_eq!(response.discount(), Some(dec!(60)));
    }

    #[tokio::test]
    async fn test_price_and_discount_together() {
        let (catalog, resolver) = resolver(fixture());
        let request = PriceAndDiscountRequest::new("EUR", [UNIT_PLAN, DISCOUNT_PLAN]).unwrap();

        assert!(request.rate_plan_ids().len() > 1);
        assert!(request.rate_plan_ids().len() < 3);

        let response = resolver.resolve(&request).await.unwrap();

        assert_eq!(response.price().unwrap().to_string(), "74.99");
        assert_eq!(response.discount().unwrap().to_string(), "60");
        assert_eq!(catalog.query_count(), 4);
    }

    #[tokio::test]
    async fn test_currency_selects_matching_tier() {
        let (_, resolver) = resolver(fixture());

        let response = resolver
            .resolve_for("USD", [UNIT_PLAN, DISCOUNT_PLAN])
            .await
            .unwrap();

        assert_eq!(response.price(), Some(dec!(89.99)));
        assert_eq!(response.discount(), Some(dec!(50)));
    }

    #[tokio::test]
    async fn test_missing_charge_fails_fast() {
        let (catalog, resolver) = resolver(fixture());

        let result = resolver
            .resolve_for("EUR", ["2c92c0f8000000000000000000000000", UNIT_PLAN])
            .await;

        let err = result.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, AppError::ChargeNotFound { .. }));
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_after_success_returns_no_partial_response() {
        let (_, resolver) = resolver(fixture());

        let result = resolver
            .resolve_for("EUR", [UNIT_PLAN, "unknown-plan"])
            .await;

        assert!(matches!(result, Err(AppError::ChargeNotFound { .. })));
    }

    #[tokio::test]
    async fn test_no_tier_in_requested_currency() {
        let (_, resolver) = resolver(fixture());

        let err = resolver
            .resolve_for("GBP", [UNIT_PLAN])
            .await
            .unwrap_err();

        match err {
            AppError::PriceNotFound { currency, .. } => assert_eq!(currency, "GBP"),
            other => panic!("expected PriceNotFound, got {:?}", other),
        }

        let err = resolver
            .resolve_for("GBP", [DISCOUNT_PLAN])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DiscountNotFound { ref currency, .. } if currency == "GBP"));
    }

    #[tokio::test]
    async fn test_charge_without_tiers() {
        let catalog = InMemoryCatalog::new()
            .with_charge("rp-1", ChargeRecord::new("c-1", ChargeModel::PerUnitPricing));
        let (_, resolver) = resolver(catalog);

        let err = resolver.resolve_for("EUR", ["rp-1"]).await.unwrap_err();

        match err {
            AppError::TierNotFound { charge_id } => assert_eq!(charge_id, "c-1"),
            other => panic!("expected TierNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_charge_model_is_rejected() {
        let catalog = InMemoryCatalog::new()
            .with_charge(
                "rp-1",
                ChargeRecord::new("c-1", ChargeModel::from("Tiered Pricing")),
            )
            .with_tier("c-1", TierRecord::discounted("EUR", dec!(10)));
        let (catalog, resolver) = resolver(catalog);

        let err = resolver.resolve_for("EUR", ["rp-1"]).await.unwrap_err();

        match err {
            AppError::UnsupportedChargeModel { charge_id, model } => {
                assert_eq!(charge_id, "c-1");
                assert_eq!(model, "Tiered Pricing");
            }
            other => panic!("expected UnsupportedChargeModel, got {:?}", other),
        }
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_later_plan_of_same_model_wins() {
        let catalog = InMemoryCatalog::new()
            .with_charge("rp-a", ChargeRecord::new("c-a", ChargeModel::PerUnitPricing))
            .with_tier("c-a", TierRecord::priced("EUR", dec!(10.00)))
            .with_charge("rp-b", ChargeRecord::new("c-b", ChargeModel::PerUnitPricing))
            .with_tier("c-b", TierRecord::priced("EUR", dec!(20.50)));
        let (_, resolver) = resolver(catalog);

        let response = resolver.resolve_for("EUR", ["rp-a", "rp-b"]).await.unwrap();
        assert_eq!(response.price(), Some(dec!(20.50)));

        let response = resolver.resolve_for("EUR", ["rp-b", "rp-a"]).await.unwrap();
        assert_eq!(response.price().unwrap().to_string(), "10.00");
    }

    #[tokio::test]
    async fn test_first_matching_tier_wins() {
        let catalog = InMemoryCatalog::new()
            .with_charge("rp-1", ChargeRecord::new("c-1", ChargeModel::PerUnitPricing))
            .with_tier("c-1", TierRecord::priced("EUR", dec!(1.00)))
            .with_tier("c-1", TierRecord::priced("EUR", dec!(2.00)));
        let (_, resolver) = resolver(catalog);

        let response = resolver.resolve_for("EUR", ["rp-1"]).await.unwrap();
        assert_eq!(response.price(), Some(dec!(1.00)));
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let (_, resolver) = resolver(fixture());

        let first = resolver
            .resolve_for("EUR", [UNIT_PLAN, DISCOUNT_PLAN])
            .await
            .unwrap();
        let second = resolver
            .resolve_for("EUR", [UNIT_PLAN, DISCOUNT_PLAN])
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            r#"{"price":"74.99","discount":"60"}"#
        );
    }

    #[tokio::test]
    async fn test_shared_resolver_across_tasks() {
        let source: Arc<dyn QueryService> = Arc::new(fixture());
        let resolver = PriceDiscountResolver::new(source);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move {
                    resolver
                        .resolve_for("EUR", [UNIT_PLAN, DISCOUNT_PLAN])
                        .await
                })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            assert_eq!(response.price(), Some(dec!(74.99)));
            assert_eq!(response.discount(), Some(dec!(60)));
        }
    }
}
