//! Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A quote was offered with a rate that cannot price anything
    #[error("Invalid exchange rate: {0} (must be positive)")]
    InvalidRate(rust_decimal::Decimal),

    /// Currency code outside the supported set
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}
