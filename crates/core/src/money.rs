//! Money

use std::num::TryFromIntError;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every price in the store is quoted and charged in.
pub const STORE_CURRENCY: &Currency = iso::AED;

/// Fils per dirham.
const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Number of decimal places of a major-unit amount.
const MAJOR_UNIT_SCALE: u32 = 2;

/// Errors raised while converting between amount representations.
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    /// The amount is negative and cannot be charged.
    #[error("amount {0} is negative")]
    Negative(Decimal),

    /// The amount does not fit the target integer type.
    #[error("amount is out of range")]
    OutOfRange,
}

impl From<TryFromIntError> for AmountError {
    fn from(_error: TryFromIntError) -> Self {
        Self::OutOfRange
    }
}

/// Convert a decimal major-unit amount (e.g. `251.00`) into minor units,
/// rounding to the nearest fils with midpoints away from zero.
///
/// # Errors
///
/// - [`AmountError::Negative`]: the amount is below zero.
/// - [`AmountError::OutOfRange`]: the rounded amount does not fit a `u64`.
pub fn minor_units_from_decimal(amount: Decimal) -> Result<u64, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }

    let minor = amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or(AmountError::OutOfRange)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    minor.to_u64().ok_or(AmountError::OutOfRange)
}

/// Convert minor units back into a decimal major-unit amount with two places.
#[must_use]
pub fn decimal_from_minor_units(minor: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), MAJOR_UNIT_SCALE)
}

/// Wrap a minor-unit amount as [`Money`] in the store currency.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn store_money(minor: u64) -> Result<Money<'static, Currency>, AmountError> {
    Ok(Money::from_minor(i64::try_from(minor)?, STORE_CURRENCY))
}

/// Read minor units back out of [`Money`].
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when the amount is negative.
pub fn money_minor_units(money: &Money<'_, Currency>) -> Result<u64, AmountError> {
    Ok(u64::try_from(money.to_minor_units())?)
}

/// Human readable amount, e.g. `AED 101.00`.
#[must_use]
pub fn format_amount(minor: u64) -> String {
    let major_units = minor / MINOR_UNITS_PER_MAJOR;
    let fractional = minor % MINOR_UNITS_PER_MAJOR;

    format!(
        "{} {major_units}.{fractional:02}",
        STORE_CURRENCY.iso_alpha_code
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn converts_decimal_amounts_to_fils() -> TestResult {
        assert_eq!(minor_units_from_decimal(Decimal::from_str("101.00")?)?, 10_100);
        assert_eq!(minor_units_from_decimal(Decimal::from_str("0.005")?)?, 1);
        assert_eq!(minor_units_from_decimal(Decimal::from_str("19.994")?)?, 1_999);

        Ok(())
    }

    #[test]
    fn negative_amounts_are_rejected() -> TestResult {
        let result = minor_units_from_decimal(Decimal::from_str("-1.00")?);

        assert!(matches!(result, Err(AmountError::Negative(_))));

        Ok(())
    }

    #[test]
    fn minor_units_round_trip_through_decimal() -> TestResult {
        let decimal = decimal_from_minor_units(25_050);

        assert_eq!(decimal, Decimal::from_str("250.50")?);
        assert_eq!(minor_units_from_decimal(decimal)?, 25_050);

        Ok(())
    }

    #[test]
    fn formats_amounts_with_currency_code() {
        assert_eq!(format_amount(10_100), "AED 101.00");
        assert_eq!(format_amount(5), "AED 0.05");
    }

    #[test]
    fn store_money_uses_store_currency() -> TestResult {
        let money = store_money(10_100)?;

        assert_eq!(money.currency(), STORE_CURRENCY);
        assert_eq!(money_minor_units(&money)?, 10_100);

        Ok(())
    }
}
