//! Tax Engine
//!
//! Indian capital-gains tax (STCG/LTCG) for a portfolio of listed equity,
//! plus tax-loss harvesting recommendations with before/after scenarios.
//! Everything here is pure: the evaluation date is always passed in.

pub mod error;
pub mod format;
pub mod harvester;
pub mod holding;
pub mod rules;
pub mod summary;
pub mod tax_calculator;

pub use error::{Result, TaxError};
pub use harvester::{
    HarvestPlan, HarvestingConfig, HarvestingEngine, HarvestingRecommendation, TaxScenario,
};
pub use holding::{EnrichedHolding, Holding, TaxCategory};
pub use rules::{TaxJurisdiction, TaxRules};
pub use summary::PortfolioSummary;
pub use tax_calculator::{TaxCalculator, TaxLiability};
