//! Monetary amounts kept as whole cents.
//!
//! Decimal prices coming from the catalog are converted with
//! [`Money::ceil_from_decimal`], which always rounds up to the next cent.
//! Item costs and order totals are computed from those cents only, so
//! repeated summation never drifts.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Serialize, Serializer};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Round `amount` up to the nearest cent.
    ///
    /// `5.301` becomes `5.31`, `5.30` stays `5.30`. Negative amounts are
    /// rounded toward positive infinity as well.
    pub fn ceil_from_decimal(amount: &BigDecimal) -> Result<Self, DomainError> {
        let cents = (amount * BigDecimal::from(100)).with_scale_round(0, RoundingMode::Ceiling);
        cents
            .to_i64()
            .map(Money)
            .ok_or_else(|| DomainError::validation(format!("amount {} is out of range", amount)))
    }

    /// Convert a caller-supplied amount in major units, rounding to the
    /// nearest cent. Used for totals that are stored verbatim.
    pub fn from_major_units(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(
                "total must be a non-negative number",
            ));
        }
        let cents = (amount * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(DomainError::validation("total is out of range"));
        }
        Ok(Money(cents as i64))
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn to_decimal(self) -> BigDecimal {
        BigDecimal::new(self.0.into(), 2)
    }

    pub fn to_major_units(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major_units())
    }
}

/// Cost of `quantity` units at `unit_price`, rounded up to the cent.
pub fn item_cost(unit_price: &BigDecimal, quantity: i32) -> Result<Money, DomainError> {
    Money::ceil_from_decimal(&(unit_price * BigDecimal::from(quantity)))
}
