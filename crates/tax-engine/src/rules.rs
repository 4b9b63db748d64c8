//! Tax Rules
//!
//! Capital-gains rates, the long-term exemption and the holding-period
//! threshold. Everything the calculators need to know about a jurisdiction
//! lives here so rule changes never touch the algorithms.

use crate::error::{Result, TaxError};
use crate::holding::TaxCategory;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Short-term capital gains rate on listed equity (20%)
pub const INDIA_STCG_RATE: Decimal = dec!(0.20);
/// Long-term capital gains rate on listed equity (12.5%)
pub const INDIA_LTCG_RATE: Decimal = dec!(0.125);
/// Long-term gains exempt from tax each year (₹1.25 lakh)
pub const INDIA_LTCG_EXEMPTION: Decimal = dec!(125000);
/// Days a holding must be held to count as long-term (12 months)
pub const INDIA_LONG_TERM_THRESHOLD_DAYS: u32 = 365;

/// Supported tax jurisdictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxJurisdiction {
    /// India - STCG/LTCG on listed equity
    India,
    /// Custom rates loaded from configuration
    Custom,
}

impl Default for TaxJurisdiction {
    fn default() -> Self {
        Self::India
    }
}

impl std::fmt::Display for TaxJurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxJurisdiction::India => write!(f, "India"),
            TaxJurisdiction::Custom => write!(f, "Custom"),
        }
    }
}

/// Tax rules for a jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRules {
    /// Jurisdiction
    pub jurisdiction: TaxJurisdiction,
    /// Rate applied to net short-term gains
    pub short_term_rate: Decimal,
    /// Rate applied to taxable long-term gains
    pub long_term_rate: Decimal,
    /// Long-term gains exempt before the long-term rate applies
    pub long_term_exemption: Decimal,
    /// Days to qualify for long-term treatment
    pub long_term_threshold_days: u32,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self::india()
    }
}

impl TaxRules {
    /// Rules for listed equity in India
    pub fn india() -> Self {
        Self {
            jurisdiction: TaxJurisdiction::India,
            short_term_rate: INDIA_STCG_RATE,
            long_term_rate: INDIA_LTCG_RATE,
            long_term_exemption: INDIA_LTCG_EXEMPTION,
            long_term_threshold_days: INDIA_LONG_TERM_THRESHOLD_DAYS,
        }
    }

    /// Get rules for a jurisdiction
    pub fn for_jurisdiction(jurisdiction: TaxJurisdiction) -> Self {
        match jurisdiction {
            TaxJurisdiction::India => Self::india(),
            TaxJurisdiction::Custom => Self {
                jurisdiction: TaxJurisdiction::Custom,
                ..Self::india()
            },
        }
    }

    /// Load rules from `TAX_*` environment variables, falling back to the
    /// Indian defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TaxRules::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::india();
        let mut rules = Self {
            jurisdiction: TaxJurisdiction::India,
            short_term_rate: parse_var(&lookup, "TAX_STCG_RATE", defaults.short_term_rate)?,
            long_term_rate: parse_var(&lookup, "TAX_LTCG_RATE", defaults.long_term_rate)?,
            long_term_exemption: parse_var(
                &lookup,
                "TAX_LTCG_EXEMPTION",
                defaults.long_term_exemption,
            )?,
            long_term_threshold_days: parse_var(
                &lookup,
                "TAX_LTCG_THRESHOLD_DAYS",
                defaults.long_term_threshold_days,
            )?,
        };
        if rules != defaults {
            rules.jurisdiction = TaxJurisdiction::Custom;
        }
        rules.validate()?;
        Ok(rules)
    }

    /// Check that rates are fractions and the exemption/threshold are sane.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("short_term_rate", self.short_term_rate),
            ("long_term_rate", self.long_term_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TaxError::InvalidRules(format!(
                    "{name} must be between 0 and 1, got {rate}"
                )));
            }
        }
        if self.long_term_exemption < Decimal::ZERO {
            return Err(TaxError::InvalidRules(format!(
                "long_term_exemption must not be negative, got {}",
                self.long_term_exemption
            )));
        }
        if self.long_term_threshold_days == 0 {
            return Err(TaxError::InvalidRules(
                "long_term_threshold_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Rate used when estimating the saving of a single realized loss.
    pub fn rate_for(&self, category: TaxCategory) -> Decimal {
        match category {
            TaxCategory::ShortTerm => self.short_term_rate,
            TaxCategory::LongTerm => self.long_term_rate,
        }
    }
}

/// Parse `key` via `lookup`, using `default` when unset or blank.
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| TaxError::InvalidRules(format!("{key} has invalid value '{raw}'"))),
        _ => Ok(default),
    }
}
