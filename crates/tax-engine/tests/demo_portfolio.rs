use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_engine::{
    HarvestingEngine, Holding, PortfolioSummary, TaxCalculator, TaxCategory, TaxJurisdiction,
    TaxRules,
};

const DEMO_PORTFOLIO: &str = include_str!("../../harvest-report/demo-portfolio.json");

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
}

fn demo_holdings() -> Vec<Holding> {
    let holdings: Vec<Holding> = serde_json::from_str(DEMO_PORTFOLIO).unwrap();
    for h in &holdings {
        h.validate(as_of()).unwrap();
    }
    holdings
}

#[test]
fn test_demo_portfolio_classification() {
    let calc = TaxCalculator::india();
    let enriched = calc.enrich(&demo_holdings(), as_of());

    let short_term: Vec<&str> = enriched
        .iter()
        .filter(|h| h.tax_category == TaxCategory::ShortTerm)
        .map(|h| h.holding.ticker.as_str())
        .collect();
    assert_eq!(short_term, vec!["RELIANCE", "WIPRO", "PAYTM", "ZOMATO"]);

    let reliance = &enriched[1];
    assert_eq!(reliance.holding_period_days, 242);
    assert_eq!(reliance.days_until_long_term, Some(123));

    let summary = PortfolioSummary::from_holdings(&enriched);
    assert_eq!(summary.number_of_holdings, 9);
    assert_eq!(summary.total_gain_loss, dec!(25800));
}

#[test]
fn test_demo_portfolio_plan() {
    let engine = HarvestingEngine::default();
    let plan = engine.build_harvest_plan(&demo_holdings(), as_of());

    let order: Vec<&str> = plan
        .recommendations
        .iter()
        .map(|r| r.holding.holding.ticker.as_str())
        .collect();
    assert_eq!(order, vec!["PAYTM", "WIPRO", "ZOMATO", "TECHM"]);
    assert_eq!(plan.recommendations[0].tax_saving, dec!(9600));
    assert_eq!(plan.recommendations[3].tax_saving, dec!(1875));
    assert_eq!(plan.total_loss_harvested, dec!(88000));

    let before = &plan.before.liability;
    assert_eq!(before.short_term_gains, dec!(17500));
    assert_eq!(before.short_term_losses, dec!(73000));
    assert_eq!(before.net_short_term, Decimal::ZERO);
    assert_eq!(before.long_term_gains, dec!(96300));
    assert_eq!(before.long_term_losses, dec!(15000));
    assert_eq!(before.net_long_term, dec!(81300));

    // Within the ₹1.25 lakh exemption either way.
    assert_eq!(plan.before.total_tax, Decimal::ZERO);
    assert_eq!(plan.after.liability.net_long_term, dec!(25800));
    assert_eq!(plan.total_tax_saving, Decimal::ZERO);
}

#[test]
fn test_demo_portfolio_without_exemption() {
    let rules = TaxRules {
        jurisdiction: TaxJurisdiction::Custom,
        long_term_exemption: Decimal::ZERO,
        ..TaxRules::india()
    };
    let engine = HarvestingEngine::new(TaxCalculator::with_rules(rules));
    let plan = engine.build_harvest_plan(&demo_holdings(), as_of());

    assert_eq!(plan.before.long_term_tax, dec!(10162.5));
    assert_eq!(plan.after.long_term_tax, dec!(3225));
    assert_eq!(plan.total_tax_saving, dec!(6937.5));
}
