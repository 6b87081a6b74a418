//! Unit Converter
//!
//! Pure arithmetic between fiat amounts and satoshi counts, plus the
//! display formatting both units use everywhere in the app. Owns no state;
//! every function is a plain function of its inputs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{Currency, PriceQuote};

/// Satoshis per bitcoin - sats are the smallest indivisible unit
pub const SATS_PER_BITCOIN: u64 = 100_000_000;

/// Convert a fiat amount to satoshis at the quoted rate.
///
/// `round(amount / rate * 100_000_000)`, rounding half away from zero
/// (standard round-to-nearest). A zero or negative amount is zero sats;
/// results beyond `u64::MAX` saturate.
pub fn fiat_to_sats(amount: Decimal, quote: &PriceQuote) -> u64 {
    if amount <= Decimal::ZERO {
        return 0;
    }

    let btc = amount / quote.rate_fiat_per_btc;
    (btc * Decimal::from(SATS_PER_BITCOIN))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Convert a satoshi count to a fiat amount at the quoted rate.
///
/// Full precision; display rounding is [`format_fiat`]'s job.
pub fn sats_to_fiat(sats: u64, quote: &PriceQuote) -> Decimal {
    Decimal::from(sats) / Decimal::from(SATS_PER_BITCOIN) * quote.rate_fiat_per_btc
}

/// Render a satoshi count with thousands separators: `1,234,567`
pub fn format_sats(sats: u64) -> String {
    group_digits(&sats.to_string())
}

/// Render a non-negative fiat amount in the standard two-decimal currency
/// format: `$1,234.50`
pub fn format_fiat(amount: Decimal, currency: Currency) -> String {
    let cents = (amount.max(Decimal::ZERO) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u128()
        .unwrap_or(u128::MAX);

    format!(
        "{}{}.{:02}",
        currency.symbol(),
        group_digits(&(cents / 100).to_string()),
        cents % 100
    )
}

/// Insert a comma every three digits, right to left
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
