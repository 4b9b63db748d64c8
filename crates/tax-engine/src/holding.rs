//! Holdings
//!
//! Raw holdings as supplied by the portfolio layer, and the enriched view
//! with valuation and tax classification as of an evaluation date.

use crate::error::{Result, TaxError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

/// Holding period classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// Held for less than the long-term threshold
    #[serde(rename = "STCG")]
    ShortTerm,
    /// Held for at least the long-term threshold
    #[serde(rename = "LTCG")]
    LongTerm,
}

impl TaxCategory {
    /// Classify a holding period against the long-term threshold.
    pub fn from_holding_days(days: i64, threshold_days: u32) -> Self {
        if days >= i64::from(threshold_days) {
            Self::LongTerm
        } else {
            Self::ShortTerm
        }
    }

    pub fn is_long_term(&self) -> bool {
        matches!(self, TaxCategory::LongTerm)
    }
}

impl std::fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxCategory::ShortTerm => write!(f, "STCG"),
            TaxCategory::LongTerm => write!(f, "LTCG"),
        }
    }
}

/// A position in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Unique ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub ticker: String,
    /// Number of shares
    pub quantity: u32,
    /// Purchase price per share
    pub buy_price: Decimal,
    /// Latest market price per share
    pub current_price: Decimal,
    /// Purchase date
    #[serde(deserialize_with = "deserialize_buy_date")]
    pub buy_date: NaiveDate,
}

impl Holding {
    /// Create a new holding
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        ticker: impl Into<String>,
        quantity: u32,
        buy_price: Decimal,
        current_price: Decimal,
        buy_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ticker: ticker.into(),
            quantity,
            buy_price,
            current_price,
            buy_date,
        }
    }

    /// Parse an ISO date (`2024-03-31`) or ISO date-time
    /// (`2024-03-31T09:15:00Z`) into a calendar date.
    pub fn parse_buy_date(raw: &str) -> Result<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Ok(timestamp.date_naive());
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(timestamp.date());
        }
        Err(TaxError::InvalidDate(raw.to_string()))
    }

    /// Reject holdings the calculators cannot value meaningfully.
    pub fn validate(&self, as_of: NaiveDate) -> Result<()> {
        if self.quantity == 0 {
            return Err(TaxError::InvalidQuantity {
                ticker: self.ticker.clone(),
            });
        }
        if self.buy_price <= Decimal::ZERO {
            return Err(TaxError::InvalidPrice {
                ticker: self.ticker.clone(),
                field: "buy price",
                value: self.buy_price,
            });
        }
        if self.current_price < Decimal::ZERO {
            return Err(TaxError::InvalidPrice {
                ticker: self.ticker.clone(),
                field: "current price",
                value: self.current_price,
            });
        }
        if self.buy_date > as_of {
            return Err(TaxError::FutureBuyDate {
                ticker: self.ticker.clone(),
                buy_date: self.buy_date,
                as_of,
            });
        }
        Ok(())
    }
}

fn deserialize_buy_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Holding::parse_buy_date(&raw).map_err(serde::de::Error::custom)
}

/// A holding with valuation and tax classification as of an evaluation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    /// buy price × quantity
    pub invested_value: Decimal,
    /// current price × quantity
    pub current_value: Decimal,
    /// Unrealized gain (positive) or loss (negative)
    pub gain_loss: Decimal,
    /// Gain/loss relative to invested value, 0 when nothing was invested
    pub gain_loss_percentage: Decimal,
    /// Whole days between buy date and evaluation date
    pub holding_period_days: i64,
    pub tax_category: TaxCategory,
    /// Days left until long-term treatment (None once long-term)
    pub days_until_long_term: Option<i64>,
}

impl EnrichedHolding {
    /// Value `holding` as of `as_of`. A buy date after `as_of` is treated
    /// as bought on `as_of`.
    pub fn evaluate(holding: &Holding, as_of: NaiveDate, threshold_days: u32) -> Self {
        let quantity = Decimal::from(holding.quantity);
        let invested_value = holding.buy_price * quantity;
        let current_value = holding.current_price * quantity;
        let gain_loss = current_value - invested_value;
        let gain_loss_percentage = gain_loss
            .checked_div(invested_value)
            .map(|ratio| ratio * dec!(100))
            .unwrap_or(Decimal::ZERO);

        let holding_period_days = (as_of - holding.buy_date).num_days().max(0);
        let tax_category = TaxCategory::from_holding_days(holding_period_days, threshold_days);
        let days_until_long_term = match tax_category {
            TaxCategory::LongTerm => None,
            TaxCategory::ShortTerm => Some(i64::from(threshold_days) - holding_period_days),
        };

        Self {
            holding: holding.clone(),
            invested_value,
            current_value,
            gain_loss,
            gain_loss_percentage,
            holding_period_days,
            tax_category,
            days_until_long_term,
        }
    }

    pub fn is_loss(&self) -> bool {
        self.gain_loss < Decimal::ZERO
    }

    /// Loss magnitude (0 for holdings at a gain)
    pub fn loss_amount(&self) -> Decimal {
        if self.is_loss() {
            -self.gain_loss
        } else {
            Decimal::ZERO
        }
    }
}
