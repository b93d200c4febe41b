//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! [`RawAmount`] normalization for numeric input arriving from forms.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    R$ 10,00 = 1000 centavos (i64)                                       │
//! │    Every comparison in the engine is exact; the 1-centavo               │
//! │    reconciliation tolerance only applies against user-typed input       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comanda_core::money::{Money, RawAmount};
//!
//! // Create from centavos (preferred)
//! let price = Money::from_centavos(1099); // R$ 10,99
//!
//! // Normalize form input (never fails, never NaN)
//! let typed = RawAmount::Text("1.234,50".to_string());
//! assert_eq!(typed.to_money(), Money::from_centavos(123_450));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results (net value, remaining balance)
///   may dip below zero; stored business values never do
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every monetary value in the engine flows through this type. Raw form
/// input must be normalized via [`RawAmount::to_money`] before arithmetic;
/// comparing raw strings is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let price = Money::from_centavos(1099); // R$ 10,99
    /// assert_eq!(price.centavos(), 1099);
    /// ```
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99, absolute).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let unit_price = Money::from_centavos(2500); // R$ 25,00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.centavos(), 5000); // R$ 50,00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the value as Brazilian currency: `1234.5` → `"R$ 1.234,50"`.
    ///
    /// Purely presentational. Formatted strings are never compared; they are
    /// rendered in the UI and interpolated into validation messages.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// assert_eq!(Money::from_centavos(123_450).format_brl(), "R$ 1.234,50");
    /// assert_eq!(Money::from_centavos(-550).format_brl(), "-R$ 5,50");
    /// ```
    pub fn format_brl(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let reais = abs / 100;
        let centavos = abs % 100;

        // Group the integer part in threes with '.' separators.
        let digits = reais.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{sign}R$ {grouped},{centavos:02}")
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display delegates to the BRL presentation format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_brl())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals; order-independent by construction.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Raw Amount Normalization
// =============================================================================

/// A numeric form field exactly as the boundary delivers it: absent, a JSON
/// number, or a string typed with `,` or `.` separators (possibly a fully
/// formatted `"R$ 1.234,50"`).
///
/// ## Normalization Contract
/// [`RawAmount::to_money`] never fails and never produces NaN: null, empty,
/// and unparseable input all normalize to zero. Field-shape validation
/// (positivity, ceilings, decimal places) happens downstream on the
/// normalized value plus [`RawAmount::has_at_most_two_decimals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Field absent or explicit null.
    Missing,
    /// Plain JSON number.
    Number(f64),
    /// User-typed or pre-formatted string.
    Text(String),
}

impl Default for RawAmount {
    fn default() -> Self {
        RawAmount::Missing
    }
}

impl RawAmount {
    /// Normalizes the raw input into [`Money`].
    ///
    /// ## Rules
    /// - null / empty / unparseable → `R$ 0,00` (never an error)
    /// - numbers are rounded half-away-from-zero to centavos
    /// - strings accept `,` or `.` as decimal separator; when both appear the
    ///   last one is the decimal separator and the rest group thousands
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::{Money, RawAmount};
    ///
    /// assert_eq!(RawAmount::Missing.to_money(), Money::zero());
    /// assert_eq!(RawAmount::Text("abc".into()).to_money(), Money::zero());
    /// assert_eq!(RawAmount::Text("10,5".into()).to_money(), Money::from_centavos(1050));
    /// assert_eq!(RawAmount::Text("R$ 1.234,50".into()).to_money(), Money::from_centavos(123_450));
    /// assert_eq!(RawAmount::Number(99.9).to_money(), Money::from_centavos(9990));
    /// ```
    pub fn to_money(&self) -> Money {
        match self {
            RawAmount::Missing => Money::zero(),
            RawAmount::Number(n) => {
                if !n.is_finite() {
                    return Money::zero();
                }
                Money::from_centavos((n * 100.0).round() as i64)
            }
            RawAmount::Text(s) => parse_brl_text(s),
        }
    }

    /// True iff rounding the raw value to 2 decimals does not change it.
    ///
    /// Guards against ambiguous input such as `10.005`: normalization rounds
    /// it, but the field is still rejected so the user sees exactly what was
    /// stored. Absent input and unparseable text are vacuously fine (they
    /// normalize to zero and fail positivity checks instead).
    pub fn has_at_most_two_decimals(&self) -> bool {
        match self {
            RawAmount::Missing => true,
            RawAmount::Number(n) => {
                if !n.is_finite() {
                    return false;
                }
                (n * 100.0).round() / 100.0 == *n
            }
            RawAmount::Text(s) => text_decimal_places(s) <= 2,
        }
    }

    /// True when no value was supplied at all (absent, null, or blank text).
    pub fn is_blank(&self) -> bool {
        match self {
            RawAmount::Missing => true,
            RawAmount::Number(_) => false,
            RawAmount::Text(s) => s.trim().is_empty(),
        }
    }
}

/// Parses user-typed currency text into centavos.
///
/// Accepts `"1234.50"`, `"1234,50"`, `"1.234,50"`, `"1,234.50"` and formatted
/// `"R$ 1.234,50"`. Anything without digits parses to zero.
fn parse_brl_text(input: &str) -> Money {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Money::zero();
    }

    let negative = trimmed.starts_with('-');

    // Keep digits and separators only; drops "R$", spaces, stray symbols.
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.chars().all(|c| !c.is_ascii_digit()) {
        return Money::zero();
    }

    // The last separator present is the decimal point; every other separator
    // groups thousands. A single '.' or ',' is always decimal.
    let decimal_pos = cleaned.rfind(|c| c == ',' || c == '.');
    let (int_part, frac_part) = match decimal_pos {
        Some(pos) => (&cleaned[..pos], &cleaned[pos + 1..]),
        None => (cleaned.as_str(), ""),
    };

    let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let frac_digits: String = frac_part.chars().filter(|c| c.is_ascii_digit()).collect();

    // Accumulate in i128 so absurdly long input cannot overflow.
    let mut centavos: i128 = 0;
    for c in int_digits.chars() {
        centavos = centavos * 10 + (c as u8 - b'0') as i128;
    }
    centavos *= 100;

    let mut frac = frac_digits.chars();
    if let Some(tenths) = frac.next() {
        centavos += (tenths as u8 - b'0') as i128 * 10;
    }
    if let Some(hundredths) = frac.next() {
        centavos += (hundredths as u8 - b'0') as i128;
    }
    if let Some(thousandths) = frac.next() {
        // Round half away from zero on the third decimal.
        if (thousandths as u8 - b'0') >= 5 {
            centavos += 1;
        }
    }

    if negative {
        centavos = -centavos;
    }
    Money::from_centavos(centavos.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

/// Counts decimal places in currency text using the same separator rule as
/// [`parse_brl_text`]. Unparseable text reports zero places.
fn text_decimal_places(input: &str) -> usize {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    match cleaned.rfind(|c| c == ',' || c == '.') {
        Some(pos) => cleaned[pos + 1..]
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count(),
        None => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(Money::from_centavos(1099).format_brl(), "R$ 10,99");
        assert_eq!(Money::from_centavos(500).format_brl(), "R$ 5,00");
        assert_eq!(Money::from_centavos(0).format_brl(), "R$ 0,00");
        assert_eq!(Money::from_centavos(123_450).format_brl(), "R$ 1.234,50");
        assert_eq!(
            Money::from_centavos(987_654_321).format_brl(),
            "R$ 9.876.543,21"
        );
        assert_eq!(Money::from_centavos(-550).format_brl(), "-R$ 5,50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centavos(1000);
        let b = Money::from_centavos(500);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        assert_eq!((a * 3).centavos(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.centavos(), 500);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let values = [
            Money::from_centavos(199),
            Money::from_centavos(2500),
            Money::from_centavos(3),
        ];
        let forward: Money = values.iter().copied().sum();
        let backward: Money = values.iter().rev().copied().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.centavos(), 2702);
    }

    #[test]
    fn test_to_money_null_and_garbage() {
        assert_eq!(RawAmount::Missing.to_money(), Money::zero());
        assert_eq!(RawAmount::Text("".into()).to_money(), Money::zero());
        assert_eq!(RawAmount::Text("   ".into()).to_money(), Money::zero());
        assert_eq!(RawAmount::Text("abc".into()).to_money(), Money::zero());
        assert_eq!(RawAmount::Number(f64::NAN).to_money(), Money::zero());
        assert_eq!(RawAmount::Number(f64::INFINITY).to_money(), Money::zero());
    }

    #[test]
    fn test_to_money_separators() {
        assert_eq!(
            RawAmount::Text("1234.50".into()).to_money().centavos(),
            123_450
        );
        assert_eq!(
            RawAmount::Text("1234,50".into()).to_money().centavos(),
            123_450
        );
        assert_eq!(
            RawAmount::Text("1.234,50".into()).to_money().centavos(),
            123_450
        );
        assert_eq!(
            RawAmount::Text("1,234.50".into()).to_money().centavos(),
            123_450
        );
        assert_eq!(RawAmount::Text("10,5".into()).to_money().centavos(), 1050);
        assert_eq!(RawAmount::Text("10".into()).to_money().centavos(), 1000);
    }

    #[test]
    fn test_to_money_formatted_round_trip() {
        // formatCurrency output must normalize back to the same value
        let original = Money::from_centavos(123_450);
        let reparsed = RawAmount::Text(original.format_brl()).to_money();
        assert_eq!(reparsed, original);

        let negative = Money::from_centavos(-550);
        let reparsed = RawAmount::Text(negative.format_brl()).to_money();
        assert_eq!(reparsed, negative);
    }

    #[test]
    fn test_to_money_rounds_third_decimal() {
        assert_eq!(RawAmount::Text("10.005".into()).to_money().centavos(), 1001);
        assert_eq!(RawAmount::Text("10.004".into()).to_money().centavos(), 1000);
        assert_eq!(RawAmount::Number(10.005).to_money().centavos(), 1001);
    }

    #[test]
    fn test_has_at_most_two_decimals() {
        assert!(RawAmount::Missing.has_at_most_two_decimals());
        assert!(RawAmount::Number(10.0).has_at_most_two_decimals());
        assert!(RawAmount::Number(10.05).has_at_most_two_decimals());
        assert!(!RawAmount::Number(10.005).has_at_most_two_decimals());
        assert!(RawAmount::Text("10,05".into()).has_at_most_two_decimals());
        assert!(!RawAmount::Text("10,055".into()).has_at_most_two_decimals());
        assert!(RawAmount::Text("1.234,50".into()).has_at_most_two_decimals());
        assert!(RawAmount::Text("garbage".into()).has_at_most_two_decimals());
    }

    #[test]
    fn test_is_blank() {
        assert!(RawAmount::Missing.is_blank());
        assert!(RawAmount::Text("  ".into()).is_blank());
        assert!(!RawAmount::Text("0".into()).is_blank());
        assert!(!RawAmount::Number(0.0).is_blank());
    }

    #[test]
    fn test_raw_amount_deserializes_from_json_shapes() {
        let n: RawAmount = serde_json::from_str("12.5").unwrap();
        assert_eq!(n.to_money().centavos(), 1250);

        let s: RawAmount = serde_json::from_str("\"12,50\"").unwrap();
        assert_eq!(s.to_money().centavos(), 1250);

        let null: RawAmount = serde_json::from_str("null").unwrap();
        assert_eq!(null, RawAmount::Missing);
    }
}
