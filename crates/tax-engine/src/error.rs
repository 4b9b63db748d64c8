use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaxError {
    #[error("Invalid quantity for {ticker}: quantity must be positive")]
    InvalidQuantity { ticker: String },

    #[error("Invalid {field} for {ticker}: {value}")]
    InvalidPrice {
        ticker: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Buy date {buy_date} for {ticker} is after evaluation date {as_of}")]
    FutureBuyDate {
        ticker: String,
        buy_date: NaiveDate,
        as_of: NaiveDate,
    },

    #[error("Invalid tax rules: {0}")]
    InvalidRules(String),
}

pub type Result<T> = std::result::Result<T, TaxError>;
