//! Property-based tests for liability and harvest plans over random
//! portfolios.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tax_engine::{HarvestingEngine, Holding, TaxCalculator, TaxCategory, TaxRules};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
}

// =============================================================================
// Generators
// =============================================================================

/// Price in paise, so every value carries two decimal places.
fn arb_price(max_rupees: i64) -> impl Strategy<Value = Decimal> {
    (1i64..=max_rupees * 100).prop_map(|paise| Decimal::new(paise, 2))
}

fn arb_holding() -> impl Strategy<Value = Holding> {
    (
        "[A-Z]{3,8}",
        1u32..2_000,
        arb_price(5_000),
        arb_price(10_000),
        0i64..1_500,
    )
        .prop_map(|(ticker, quantity, buy_price, current_price, days)| {
            Holding::new(
                format!("{ticker}-{days}"),
                ticker.clone(),
                ticker,
                quantity,
                buy_price,
                current_price,
                as_of() - Duration::days(days),
            )
        })
}

fn arb_portfolio(max_len: usize) -> impl Strategy<Value = Vec<Holding>> {
    proptest::collection::vec(arb_holding(), 0..=max_len)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Harvesting losses never increases the tax bill.
    #[test]
    fn prop_harvesting_never_increases_tax(holdings in arb_portfolio(25)) {
        let plan = HarvestingEngine::default().build_harvest_plan(&holdings, as_of());

        prop_assert!(plan.after.total_tax <= plan.before.total_tax);
        prop_assert!(plan.total_tax_saving >= Decimal::ZERO);
        prop_assert_eq!(plan.total_tax_saving, plan.before.total_tax - plan.after.total_tax);
    }

    /// Net figures are floored at zero and the exemption is applied exactly.
    #[test]
    fn prop_liability_invariants(holdings in arb_portfolio(25)) {
        let calc = TaxCalculator::india();
        let exemption = calc.rules().long_term_exemption;
        let liability = calc.compute_tax_liability(&calc.enrich(&holdings, as_of()));

        prop_assert!(liability.short_term_gains >= Decimal::ZERO);
        prop_assert!(liability.short_term_losses >= Decimal::ZERO);
        prop_assert!(liability.long_term_gains >= Decimal::ZERO);
        prop_assert!(liability.long_term_losses >= Decimal::ZERO);
        prop_assert!(liability.net_short_term >= Decimal::ZERO);
        prop_assert!(liability.net_long_term >= Decimal::ZERO);
        prop_assert!(liability.taxable_long_term <= liability.net_long_term);
        prop_assert_eq!(
            liability.taxable_long_term,
            (liability.net_long_term - exemption).max(Decimal::ZERO)
        );
        prop_assert_eq!(liability.total_tax, liability.short_term_tax + liability.long_term_tax);
    }

    /// The plan harvests every loss-making holding, highest saving first.
    #[test]
    fn prop_recommendations_cover_all_losses(holdings in arb_portfolio(25)) {
        let engine = HarvestingEngine::default();
        let enriched = engine.calculator().enrich(&holdings, as_of());
        let plan = engine.plan_for(&enriched);

        let losers = enriched.iter().filter(|h| h.is_loss()).count();
        let total_loss: Decimal = enriched.iter().map(|h| h.loss_amount()).sum();

        prop_assert_eq!(plan.recommendations.len(), losers);
        prop_assert_eq!(plan.total_loss_harvested, total_loss);
        for pair in plan.recommendations.windows(2) {
            prop_assert!(pair[0].tax_saving >= pair[1].tax_saving);
        }
    }

    /// Classification depends only on the holding period and is repeatable.
    #[test]
    fn prop_metrics_deterministic(holding in arb_holding()) {
        let calc = TaxCalculator::with_rules(TaxRules::india());
        let first = calc.compute_metrics(&holding, as_of());
        let second = calc.compute_metrics(&holding, as_of());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first.tax_category == TaxCategory::LongTerm,
            first.holding_period_days >= 365
        );
    }
}
