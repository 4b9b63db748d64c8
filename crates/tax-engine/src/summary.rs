use crate::holding::EnrichedHolding;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Portfolio-level valuation totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Sum of invested values
    pub total_invested: Decimal,
    /// Sum of current values
    pub total_current: Decimal,
    /// Current minus invested
    pub total_gain_loss: Decimal,
    /// 0 when nothing is invested
    pub total_gain_loss_percentage: Decimal,
    /// Holdings counted
    pub number_of_holdings: usize,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: &[EnrichedHolding]) -> Self {
        let total_invested: Decimal = holdings.iter().map(|h| h.invested_value).sum();
        let total_current: Decimal = holdings.iter().map(|h| h.current_value).sum();
        let total_gain_loss = total_current - total_invested;
        let total_gain_loss_percentage = total_gain_loss
            .checked_div(total_invested)
            .map(|ratio| ratio * dec!(100))
            .unwrap_or(Decimal::ZERO);

        Self {
            total_invested,
            total_current,
            total_gain_loss,
            total_gain_loss_percentage,
            number_of_holdings: holdings.len(),
        }
    }
}
