//! Error Types
//!
//! Feed errors never reach a resolver caller: they are consumed while
//! falling through the source list and surface only in logs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport failure: unreachable host, timeout, TLS, bad JSON body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Unexpected status: {0}")]
    BadStatus(reqwest::StatusCode),

    /// Provider body parsed but held no rate where its schema puts one
    #[error("No usable rate in response body")]
    MalformedBody,

    /// Provider offered a rate no market would quote
    #[error("Implausible rate: {0}")]
    ImplausibleRate(rust_decimal::Decimal),
}
