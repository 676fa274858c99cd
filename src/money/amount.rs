//! Exact currency amount
//!
//! Every monetary value in the engine is an [`Amount`]: a `rust_decimal`
//! value (28 significant digits) kept at cent scale. Multiplication and
//! division results are rounded half-up ("kaufmännisch") to cents, so sums of
//! amounts are exact and independent of summation order.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Number of decimal places kept for currency values
pub const CENT_SCALE: u32 = 2;

/// The single rounding mode used at every boundary: round half up (away from zero)
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round a decimal half-up to `dp` places and pin the scale so output is stable
/// (`5` becomes `5.00` for `dp = 2`).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, ROUNDING);
    rounded.rescale(dp);
    rounded
}

/// Division that yields zero instead of failing when the divisor is zero.
/// Plans under construction routinely contain zero totals.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `part / whole × 100`, rounded half-up to two places; zero when `whole` is zero
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    round_half_up(safe_div(part, whole) * Decimal::ONE_HUNDRED, 2)
}

/// Largest magnitude an amount can hold (one quadrillion euros).
/// Arithmetic past it saturates instead of overflowing.
pub const AMOUNT_LIMIT: Decimal = dec!(1000000000000000.00);

/// Clamp a checked result into `±AMOUNT_LIMIT`; `None` saturates towards the
/// sign the overflowing operation was heading to
fn saturate(value: Option<Decimal>, overflow_negative: bool) -> Decimal {
    match value {
        Some(v) if v.abs() <= AMOUNT_LIMIT => v,
        Some(v) if v.is_sign_negative() => -AMOUNT_LIMIT,
        Some(_) => AMOUNT_LIMIT,
        None if overflow_negative => -AMOUNT_LIMIT,
        None => AMOUNT_LIMIT,
    }
}

/// Currency amount in euros, always at cent precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde(deserialize_with = "deserialize_cents")] Decimal);

fn deserialize_cents<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer).map(|d| Amount::new(d).0)
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(dec!(0.00));

    /// Create from any decimal, rounding half-up to cents
    pub fn new(value: Decimal) -> Self {
        Self(round_half_up(saturate(Some(value), false), CENT_SCALE))
    }

    /// Create from whole euros
    pub fn euros(value: i64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Create from integer cents
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, CENT_SCALE))
    }

    /// Underlying decimal value
    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Negative values become zero
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }

    /// Multiply by a scalar (quantity, rate, factor), rounded to cents
    pub fn times(self, factor: Decimal) -> Self {
        let negative = self.0.is_sign_negative() != factor.is_sign_negative();
        Self::new(saturate(self.0.checked_mul(factor), negative))
    }

    /// Divide by a scalar, rounded to cents; zero divisor yields zero
    pub fn divided_by(self, divisor: Decimal) -> Self {
        Self::new(safe_div(self.0, divisor))
    }

    /// Unrounded quotient of two amounts; zero when `other` is zero
    pub fn ratio(self, other: Amount) -> Decimal {
        safe_div(self.0, other.0)
    }

    /// This amount as a percentage of `whole` (2 dp); zero when `whole` is zero
    pub fn percent_of(self, whole: Amount) -> Decimal {
        percent(self.0, whole.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Zero prints unsigned; width and alignment are honoured
        let text = if self.0.is_zero() {
            "0.00".to_string()
        } else {
            format!("{:.2}", self.0)
        };
        f.pad(&text)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl Add for Amount {
    type Output = Amount;
    fn add(self, rhs: Amount) -> Amount {
        Amount(saturate(self.0.checked_add(rhs.0), rhs.0.is_sign_negative()))
    }
}

impl Sub for Amount {
    type Output = Amount;
    fn sub(self, rhs: Amount) -> Amount {
        Amount(saturate(self.0.checked_sub(rhs.0), !rhs.0.is_sign_negative()))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        *self = *self - rhs;
    }
}

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Mul<Decimal> for Amount {
    type Output = Amount;
    fn mul(self, rhs: Decimal) -> Amount {
        self.times(rhs)
    }
}

impl Div<Decimal> for Amount {
    type Output = Amount;
    fn div(self, rhs: Decimal) -> Amount {
        self.divided_by(rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + *a)
    }
}
