//! Tax-Loss Harvesting Engine
//!
//! Ranks loss-making holdings by the tax they would save and builds a plan
//! comparing liability before and after harvesting them.

use crate::error::Result;
use crate::holding::{EnrichedHolding, Holding};
use crate::rules::parse_var;
use crate::tax_calculator::{TaxCalculator, TaxLiability};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const CURRENT_SCENARIO_LABEL: &str = "Current Tax Liability";
pub const HARVESTED_SCENARIO_LABEL: &str = "After Loss Harvesting";
const REBUY_SUGGESTION: &str = "Rebuy tomorrow at market price to maintain position";

/// A suggestion to sell one loss-making holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestingRecommendation {
    /// Holding to sell
    pub holding: EnrichedHolding,
    /// Unrealized loss (positive number)
    pub loss_amount: Decimal,
    /// Tax saved by realizing this loss on its own
    pub tax_saving: Decimal,
    /// What to sell and at what price
    pub action: String,
    /// When to buy back
    pub rebuy_suggestion: String,
}

/// Headline figures of one tax scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxScenario {
    /// Scenario name
    pub label: String,
    /// Net short-term gain taxed
    pub taxable_short_term: Decimal,
    /// Long-term gain taxed after the exemption
    pub taxable_long_term: Decimal,
    /// Short-term tax
    pub short_term_tax: Decimal,
    /// Long-term tax
    pub long_term_tax: Decimal,
    /// Total tax
    pub total_tax: Decimal,
    /// Full breakdown the headline figures were taken from
    pub liability: TaxLiability,
}

impl TaxScenario {
    pub fn new(label: impl Into<String>, liability: TaxLiability) -> Self {
        Self {
            label: label.into(),
            taxable_short_term: liability.net_short_term,
            taxable_long_term: liability.taxable_long_term,
            short_term_tax: liability.short_term_tax,
            long_term_tax: liability.long_term_tax,
            total_tax: liability.total_tax,
            liability,
        }
    }
}

/// Recommendations plus the before/after comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPlan {
    /// Highest saving first
    pub recommendations: Vec<HarvestingRecommendation>,
    /// Sum of recommended losses
    pub total_loss_harvested: Decimal,
    /// before.total_tax − after.total_tax
    pub total_tax_saving: Decimal,
    /// Liability today
    pub before: TaxScenario,
    /// Liability after selling every recommendation
    pub after: TaxScenario,
}

/// Harvesting engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestingConfig {
    /// Minimum loss to consider (in rupees)
    pub min_loss_threshold: Decimal,
    /// Whether to include short-term losses
    pub include_short_term: bool,
    /// Whether to include long-term losses
    pub include_long_term: bool,
    /// Maximum number of recommendations to return (None = all)
    pub max_recommendations: Option<usize>,
}

impl Default for HarvestingConfig {
    fn default() -> Self {
        Self {
            min_loss_threshold: Decimal::ZERO,
            include_short_term: true,
            include_long_term: true,
            max_recommendations: None,
        }
    }
}

impl HarvestingConfig {
    /// Load from `HARVEST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_recommendations: usize = parse_var(&lookup, "HARVEST_MAX_RECOMMENDATIONS", 0)?;

        Ok(Self {
            min_loss_threshold: parse_var(&lookup, "HARVEST_MIN_LOSS", defaults.min_loss_threshold)?,
            include_short_term: parse_var(
                &lookup,
                "HARVEST_INCLUDE_SHORT_TERM",
                defaults.include_short_term,
            )?,
            include_long_term: parse_var(
                &lookup,
                "HARVEST_INCLUDE_LONG_TERM",
                defaults.include_long_term,
            )?,
            max_recommendations: (max_recommendations > 0).then_some(max_recommendations),
        })
    }
}

/// Engine for finding tax-loss harvesting opportunities
#[derive(Debug, Clone, Default)]
pub struct HarvestingEngine {
    calculator: TaxCalculator,
    config: HarvestingConfig,
}

impl HarvestingEngine {
    /// Create a new harvesting engine
    pub fn new(calculator: TaxCalculator) -> Self {
        Self {
            calculator,
            config: HarvestingConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(calculator: TaxCalculator, config: HarvestingConfig) -> Self {
        Self { calculator, config }
    }

    /// Set configuration
    pub fn set_config(&mut self, config: HarvestingConfig) {
        self.config = config;
    }

    pub fn calculator(&self) -> &TaxCalculator {
        &self.calculator
    }

    pub fn config(&self) -> &HarvestingConfig {
        &self.config
    }

    /// Recommend selling every holding currently at a loss, highest
    /// isolated tax saving first. Equal savings keep input order.
    pub fn generate_recommendations(
        &self,
        holdings: &[EnrichedHolding],
    ) -> Vec<HarvestingRecommendation> {
        self.rank(holdings)
            .into_iter()
            .map(|(_, recommendation)| recommendation)
            .collect()
    }

    /// Compare liability today with liability after harvesting every
    /// recommended holding.
    pub fn build_harvest_plan(&self, holdings: &[Holding], as_of: NaiveDate) -> HarvestPlan {
        let enriched = self.calculator.enrich(holdings, as_of);
        self.plan_for(&enriched)
    }

    /// Same as [`HarvestingEngine::build_harvest_plan`] for holdings that
    /// are already enriched.
    pub fn plan_for(&self, holdings: &[EnrichedHolding]) -> HarvestPlan {
        let ranked = self.rank(holdings);
        let harvested_idx: HashSet<usize> = ranked.iter().map(|(idx, _)| *idx).collect();

        let (harvested, remaining): (Vec<_>, Vec<_>) = holdings
            .iter()
            .enumerate()
            .partition(|(idx, _)| harvested_idx.contains(idx));
        let harvested: Vec<EnrichedHolding> = harvested.into_iter().map(|(_, h)| h.clone()).collect();
        let remaining: Vec<EnrichedHolding> = remaining.into_iter().map(|(_, h)| h.clone()).collect();

        let before = self.calculator.compute_tax_liability(holdings);
        let after = self
            .calculator
            .compute_harvested_liability(&remaining, &harvested);

        let recommendations: Vec<HarvestingRecommendation> =
            ranked.into_iter().map(|(_, r)| r).collect();
        let total_loss_harvested: Decimal = recommendations.iter().map(|r| r.loss_amount).sum();
        let total_tax_saving = before.total_tax - after.total_tax;

        if total_tax_saving < Decimal::ZERO {
            tracing::warn!(
                "Harvesting increased tax from {} to {}",
                before.total_tax,
                after.total_tax
            );
        }
        debug_assert!(total_tax_saving >= Decimal::ZERO);

        tracing::debug!(
            "Harvest plan: {} holdings, {} to sell, loss {}, tax {} -> {}",
            holdings.len(),
            recommendations.len(),
            total_loss_harvested,
            before.total_tax,
            after.total_tax
        );

        HarvestPlan {
            recommendations,
            total_loss_harvested,
            total_tax_saving,
            before: TaxScenario::new(CURRENT_SCENARIO_LABEL, before),
            after: TaxScenario::new(HARVESTED_SCENARIO_LABEL, after),
        }
    }

    /// Filtered, sorted recommendations paired with their input position.
    fn rank(&self, holdings: &[EnrichedHolding]) -> Vec<(usize, HarvestingRecommendation)> {
        let mut ranked: Vec<(usize, HarvestingRecommendation)> = holdings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_loss() && self.is_eligible(h))
            .map(|(idx, h)| (idx, self.recommend(h)))
            .collect();

        ranked.sort_by(|(_, a), (_, b)| b.tax_saving.cmp(&a.tax_saving));

        if let Some(max) = self.config.max_recommendations {
            ranked.truncate(max);
        }
        ranked
    }

    fn is_eligible(&self, holding: &EnrichedHolding) -> bool {
        let term_allowed = if holding.tax_category.is_long_term() {
            self.config.include_long_term
        } else {
            self.config.include_short_term
        };
        term_allowed && holding.loss_amount() >= self.config.min_loss_threshold
    }

    fn recommend(&self, holding: &EnrichedHolding) -> HarvestingRecommendation {
        HarvestingRecommendation {
            loss_amount: holding.loss_amount(),
            tax_saving: self.calculator.isolated_saving(holding),
            action: format!(
                "Sell {} shares at ₹{:.2}",
                holding.holding.quantity, holding.holding.current_price
            ),
            rebuy_suggestion: REBUY_SUGGESTION.to_string(),
            holding: holding.clone(),
        }
    }
}
