//! Decimal prices and their conversion to payment-provider minor units.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Errors converting a [`Price`] to minor units.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    #[error("price {0} is too large")]
    OutOfRange(Decimal),
}

/// A price in a currency's standard unit (rupees, not paise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub amount: Decimal,
    pub currency_code: CurrencyCode,
}

impl Price {
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Amount in the currency's minor unit (e.g. `500` INR becomes `50000` paise).
    ///
    /// Fractions of a minor unit are rounded half-to-even.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts and
    /// [`PriceError::OutOfRange`] when the result does not fit in an `i64`.
    pub fn to_minor_units(&self) -> Result<i64, PriceError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(PriceError::Negative(self.amount));
        }

        self.amount
            .checked_mul(self.currency_code.minor_per_major())
            .map(|minor| minor.round())
            .and_then(|minor| minor.to_i64())
            .ok_or(PriceError::OutOfRange(self.amount))
    }
}

/// ISO 4217 currency codes accepted by the checkout gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Lowercase code as expected by Stripe (`"inr"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::INR => "inr",
        }
    }

    /// Number of minor units in one major unit.
    #[must_use]
    pub const fn minor_per_major(&self) -> Decimal {
        match self {
            Self::INR => Decimal::ONE_HUNDRED,
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
