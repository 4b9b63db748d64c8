//! Tax Calculator
//!
//! Capital-gains liability for a set of holdings, with and without
//! harvested losses.

use crate::holding::{EnrichedHolding, Holding, TaxCategory};
use crate::rules::TaxRules;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gain and loss magnitudes per holding period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct GainBuckets {
    pub short_term_gains: Decimal,
    pub short_term_losses: Decimal,
    pub long_term_gains: Decimal,
    pub long_term_losses: Decimal,
}

impl GainBuckets {
    pub fn from_holdings<'a, I>(holdings: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrichedHolding>,
    {
        holdings
            .into_iter()
            .fold(Self::default(), |buckets, h| buckets.record(h.tax_category, h.gain_loss))
    }

    /// Add a signed gain/loss. Zero counts toward losses and changes nothing.
    pub fn record(mut self, category: TaxCategory, gain_loss: Decimal) -> Self {
        match (category, gain_loss > Decimal::ZERO) {
            (TaxCategory::ShortTerm, true) => self.short_term_gains += gain_loss,
            (TaxCategory::ShortTerm, false) => self.short_term_losses += gain_loss.abs(),
            (TaxCategory::LongTerm, true) => self.long_term_gains += gain_loss,
            (TaxCategory::LongTerm, false) => self.long_term_losses += gain_loss.abs(),
        }
        self
    }

    pub fn record_loss(self, category: TaxCategory, loss: Decimal) -> Self {
        self.record(category, -loss.abs())
    }
}

/// Capital-gains tax owed on a set of holdings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLiability {
    /// Sum of short-term gains
    pub short_term_gains: Decimal,
    /// Sum of short-term loss magnitudes
    pub short_term_losses: Decimal,
    /// Sum of long-term gains
    pub long_term_gains: Decimal,
    /// Sum of long-term loss magnitudes
    pub long_term_losses: Decimal,
    /// max(0, short-term gains − short-term losses)
    pub net_short_term: Decimal,
    /// max(0, long-term gains − long-term losses), after any offset
    pub net_long_term: Decimal,
    /// max(0, net long-term − exemption)
    pub taxable_long_term: Decimal,
    /// Tax on net short-term gains
    pub short_term_tax: Decimal,
    /// Tax on taxable long-term gains
    pub long_term_tax: Decimal,
    /// Short-term plus long-term tax
    pub total_tax: Decimal,
}

/// Tax calculator for a specific set of rules
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    rules: TaxRules,
}

impl TaxCalculator {
    /// Create a calculator with custom rules
    pub fn with_rules(rules: TaxRules) -> Self {
        Self { rules }
    }

    /// Calculator for Indian listed equity
    pub fn india() -> Self {
        Self::with_rules(TaxRules::india())
    }

    /// Get the tax rules
    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Value and classify a single holding as of `as_of`.
    pub fn compute_metrics(&self, holding: &Holding, as_of: NaiveDate) -> EnrichedHolding {
        EnrichedHolding::evaluate(holding, as_of, self.rules.long_term_threshold_days)
    }

    pub fn enrich(&self, holdings: &[Holding], as_of: NaiveDate) -> Vec<EnrichedHolding> {
        holdings
            .iter()
            .map(|h| self.compute_metrics(h, as_of))
            .collect()
    }

    /// Liability with gains and losses netted within each holding period.
    /// Short-term losses are not applied to long-term gains here.
    pub fn compute_tax_liability(&self, holdings: &[EnrichedHolding]) -> TaxLiability {
        let buckets = GainBuckets::from_holdings(holdings);
        let net_short_term = (buckets.short_term_gains - buckets.short_term_losses).max(Decimal::ZERO);
        let net_long_term = (buckets.long_term_gains - buckets.long_term_losses).max(Decimal::ZERO);

        self.assess(buckets, net_short_term, net_long_term)
    }

    /// Liability after selling every holding in `harvested`.
    ///
    /// Harvested losses join the loss buckets of their holding period. After
    /// netting within each period, short-term loss left over is applied to
    /// long-term gains. Long-term losses only ever reduce long-term gains.
    pub fn compute_harvested_liability(
        &self,
        remaining: &[EnrichedHolding],
        harvested: &[EnrichedHolding],
    ) -> TaxLiability {
        let buckets = harvested
            .iter()
            .fold(GainBuckets::from_holdings(remaining), |buckets, h| {
                buckets.record_loss(h.tax_category, h.loss_amount())
            });

        let (net_short_term, excess_short_term_loss) =
            if buckets.short_term_losses > buckets.short_term_gains {
                (Decimal::ZERO, buckets.short_term_losses - buckets.short_term_gains)
            } else {
                (buckets.short_term_gains - buckets.short_term_losses, Decimal::ZERO)
            };

        let net_long_term = (buckets.long_term_gains - buckets.long_term_losses).max(Decimal::ZERO);
        let net_long_term = (net_long_term - excess_short_term_loss).max(Decimal::ZERO);

        self.assess(buckets, net_short_term, net_long_term)
    }

    /// Saving from realizing one loss on its own, ignoring other holdings.
    pub fn isolated_saving(&self, holding: &EnrichedHolding) -> Decimal {
        holding.loss_amount() * self.rules.rate_for(holding.tax_category)
    }

    fn assess(
        &self,
        buckets: GainBuckets,
        net_short_term: Decimal,
        net_long_term: Decimal,
    ) -> TaxLiability {
        let taxable_long_term = (net_long_term - self.rules.long_term_exemption).max(Decimal::ZERO);
        let short_term_tax = net_short_term * self.rules.short_term_rate;
        let long_term_tax = taxable_long_term * self.rules.long_term_rate;

        TaxLiability {
            short_term_gains: buckets.short_term_gains,
            short_term_losses: buckets.short_term_losses,
            long_term_gains: buckets.long_term_gains,
            long_term_losses: buckets.long_term_losses,
            net_short_term,
            net_long_term,
            taxable_long_term,
            short_term_tax,
            long_term_tax,
            total_tax: short_term_tax + long_term_tax,
        }
    }
}
