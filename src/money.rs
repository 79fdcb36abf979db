//! Fixed-point currency amounts
//!
//! Balances are carried as whole cents so that month-over-month arithmetic is exact.
//! Any amount derived from a percentage is rounded to the nearest cent (half away
//! from zero) at the moment it is computed. The `checked_*` operations return
//! `None` instead of leaving the `i64` cent range.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

const CENTS_PER_UNIT: i64 = 100;

/// Round a cent amount computed in floating point, `None` outside the `i64` range
fn round_cents(cents: f64) -> Option<i64> {
    let cents = cents.round();
    if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

/// Exact decimal parse of `[-+]digits[.digits]` into cents
///
/// Digits past the second decimal round the last cent half away from zero.
fn parse_cents(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut cents: i64 = 0;
    for digit in whole.bytes() {
        cents = cents.checked_mul(10)?.checked_add(i64::from(digit - b'0'))?;
    }
    cents = cents.checked_mul(CENTS_PER_UNIT)?;

    let mut decimals = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = decimals.next().unwrap_or(0);
    let hundredths = decimals.next().unwrap_or(0);
    cents = cents.checked_add(tenths * 10 + hundredths)?;
    if decimals.next().is_some_and(|d| d >= 5) {
        cents = cents.checked_add(1)?;
    }

    Some(if negative { -cents } else { cents })
}

/// A currency amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Convert a major-unit amount (e.g. dollars) rounding to the nearest cent
    ///
    /// Saturates at the representable range; see [`Money::checked_from_major`].
    pub fn from_major(amount: f64) -> Self {
        Money((amount * CENTS_PER_UNIT as f64).round() as i64)
    }

    pub fn checked_from_major(amount: f64) -> Option<Self> {
        round_cents(amount * CENTS_PER_UNIT as f64).map(Money)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Multiply by a whole unit count
    pub fn checked_scale(self, units: u64) -> Option<Money> {
        let units = i64::try_from(units).ok()?;
        self.0.checked_mul(units).map(Money)
    }

    /// Like [`Money::checked_scale`], clamped to the representable range
    pub fn saturating_scale(self, units: u64) -> Money {
        let units = i64::try_from(units).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(units))
    }

    /// `pct` percent of this amount, rounded to the cent
    pub fn checked_percent_of(self, pct: f64) -> Option<Money> {
        round_cents(self.0 as f64 * pct / 100.0).map(Money)
    }

    /// Number of whole `price` amounts that fit in this amount, never negative
    pub fn whole_multiples_of(self, price: Money) -> u64 {
        if price.0 <= 0 || self.0 <= 0 {
            return 0;
        }
        (self.0 / price.0) as u64
    }

    /// Amount formatted without the currency sign, e.g. `-1234.50`
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        let text = format!("{}${}.{:02}", sign, grouped, abs % 100);
        f.pad(&text)
    }
}

/// Error parsing a currency string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoneyError(String);

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid currency amount: {:?}", self.0)
    }
}

impl std::error::Error for ParseMoneyError {}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts `1234.5`, `$1,234.50`, `-3`, `-$3.00`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
            .collect();

        parse_cents(&cleaned)
            .map(Money)
            .ok_or_else(|| ParseMoneyError(s.to_string()))
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

// Stored as an exact decimal string (`"1234.50"`) so large balances read back unchanged
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_plain_string())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a currency amount as a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTS_PER_UNIT)
            .map(Money)
            .ok_or_else(|| E::custom("currency amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("currency amount out of range"))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::checked_from_major(v).ok_or_else(|| E::custom("currency amount out of range"))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
