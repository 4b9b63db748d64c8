//! Rupee formatting with Indian digit grouping (lakhs and crores).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const CRORE: Decimal = dec!(10000000);
const LAKH: Decimal = dec!(100000);
const THOUSAND: Decimal = dec!(1000);

/// `₹1,23,456.78`; negatives as `-₹1,234.00`.
pub fn format_inr(amount: Decimal) -> String {
    format_with_decimals(amount, 2)
}

/// Like [`format_inr`] with an explicit `+` on gains.
pub fn format_inr_signed(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", format_inr(amount))
    } else {
        format_inr(amount)
    }
}

/// Short form for headlines: `₹1.25Cr`, `₹3.40L`, `₹12.5K`, `₹950`.
pub fn format_inr_compact(amount: Decimal) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let abs = amount.abs();

    if abs >= CRORE {
        format!("{sign}₹{:.2}Cr", round(abs / CRORE, 2))
    } else if abs >= LAKH {
        format!("{sign}₹{:.2}L", round(abs / LAKH, 2))
    } else if abs >= THOUSAND {
        format!("{sign}₹{:.1}K", round(abs / THOUSAND, 1))
    } else {
        format_with_decimals(amount, 0)
    }
}

fn format_with_decimals(amount: Decimal, decimals: u32) -> String {
    let rounded = round(amount.abs(), decimals);
    let sign = if amount < Decimal::ZERO && !rounded.is_zero() { "-" } else { "" };

    let text = format!("{:.*}", decimals as usize, rounded);
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    match fraction {
        Some(fraction) => format!("{sign}₹{}.{}", group_indian(integer), fraction),
        None => format!("{sign}₹{}", group_indian(integer)),
    }
}

fn round(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Last three digits, then groups of two: 12345678 -> 1,23,45,678
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(dec!(0)), "₹0.00");
        assert_eq!(format_inr(dec!(950)), "₹950.00");
        assert_eq!(format_inr(dec!(1234.5)), "₹1,234.50");
        assert_eq!(format_inr(dec!(123456.789)), "₹1,23,456.79");
        assert_eq!(format_inr(dec!(12345678)), "₹1,23,45,678.00");
        assert_eq!(format_inr(dec!(-4000)), "-₹4,000.00");
    }

    #[test]
    fn test_format_inr_signed() {
        assert_eq!(format_inr_signed(dec!(6000)), "+₹6,000.00");
        assert_eq!(format_inr_signed(dec!(-6000)), "-₹6,000.00");
        assert_eq!(format_inr_signed(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn test_format_inr_compact() {
        assert_eq!(format_inr_compact(dec!(25000000)), "₹2.50Cr");
        assert_eq!(format_inr_compact(dec!(125000)), "₹1.25L");
        assert_eq!(format_inr_compact(dec!(12340)), "₹12.3K");
        assert_eq!(format_inr_compact(dec!(950.4)), "₹950");
        assert_eq!(format_inr_compact(dec!(-340000)), "-₹3.40L");
    }
}
