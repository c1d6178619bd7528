//! Money and percentage types
//!
//! Both are fixed-point with two decimal places: `Money` stores cents and
//! `Percent` stores hundredths of a percent. Every place that rounds a money
//! value goes through [`round_div`], which rounds half away from zero, so
//! repeated rounding never drifts between the split calculator and the
//! balance engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Divide and round half away from zero
///
/// `denominator` must be non-zero.
pub fn round_div(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
///
/// The currency itself is an opaque label carried next to the amount; no
/// conversion ever happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from input: 10,000,000,000.00
    ///
    /// Far below `i64::MAX` so that summing many expenses can't overflow in
    /// practice; the balance engine still checks every addition.
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use splitbook::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum amounts, or `None` on overflow
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, m| acc.checked_add(m))
    }

    /// Whether the amount lies within `-MAX_AMOUNT..=MAX_AMOUNT`
    pub fn is_within_limit(&self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_AMOUNT.0.unsigned_abs()
    }

    /// Divide into `parts` and round to the cent
    ///
    /// Returns `None` when `parts` is zero.
    pub fn divide_rounded(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        let cents = round_div(i128::from(self.0), parts as i128);
        i64::try_from(cents).ok().map(Self)
    }

    /// The given percentage of this amount, rounded to the cent
    pub fn percentage(&self, percent: Percent) -> Self {
        let cents = round_div(
            i128::from(self.0) * i128::from(percent.hundredths()),
            10_000,
        );
        // |percent| is bounded by input validation, so this fits back into i64
        Self(i64::try_from(cents).unwrap_or(if cents > 0 { i64::MAX } else { i64::MIN }))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "10.5". More than
    /// two decimals are rounded half away from zero ("10.555" -> 10.56).
    /// Amounts beyond [`Money::MAX_AMOUNT`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let cents = parse_hundredths(rest)
            .ok_or_else(|| MoneyParseError::InvalidFormat(trimmed.to_string()))?;
        let money = Self(if negative { -cents } else { cents });
        if !money.is_within_limit() {
            return Err(MoneyParseError::OutOfRange(trimmed.to_string()));
        }

        Ok(money)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }

    /// Format as a bare decimal ("10.50", "-0.05"), for exports
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }
}

/// Parse an unsigned decimal into hundredths, rounding half away from zero
fn parse_hundredths(s: &str) -> Option<i64> {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let digits: Vec<i64> = frac.bytes().map(|b| i64::from(b - b'0')).collect();
    let tenths = digits.first().copied().unwrap_or(0);
    let hundredths = digits.get(1).copied().unwrap_or(0);
    let round_up = digits.get(2).is_some_and(|d| *d >= 5);

    whole
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// A percentage with two decimals, stored as hundredths of a percent
///
/// `Percent::from_hundredths(3333)` is 33.33%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    /// 100.00%
    pub const WHOLE: Percent = Percent(10_000);

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub const fn from_whole(percent: i64) -> Self {
        Self(percent * 100)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Whether the percentage lies within -100.00%..=100.00%
    pub fn is_within_limit(&self) -> bool {
        self.0.unsigned_abs() <= Self::WHOLE.0.unsigned_abs()
    }

    /// Sum percentages, or `None` on overflow
    pub fn checked_sum<I: IntoIterator<Item = Self>>(percents: I) -> Option<Self> {
        percents
            .into_iter()
            .try_fold(Self::zero(), |acc, p| acc.checked_add(p))
    }

    /// Parse "50", "33.33" or "12.5%"; extra decimals round half away from zero
    ///
    /// Anything beyond 100.00% either way is rejected: no single share can
    /// take more than the whole expense.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_suffix('%').unwrap_or(rest);

        let hundredths = parse_hundredths(rest)
            .ok_or_else(|| MoneyParseError::InvalidFormat(trimmed.to_string()))?;
        let percent = Self(if negative { -hundredths } else { hundredths });
        if !percent.is_within_limit() {
            return Err(MoneyParseError::OutOfRange(trimmed.to_string()));
        }

        Ok(percent)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}%", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Percent {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::iter::Sum for Percent {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Percent::zero(), |acc, p| acc + p)
    }
}

/// Error type for money and percentage parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
