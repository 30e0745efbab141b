//! Fixed-point price with 4 total digits and 2 decimal places.
//!
//! Stored as a whole number of hundredths, so `12.34` is persisted as `1234`.
//! Valid values are `0.00..=99.99`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

pub const MAX_DIGITS: u32 = 4;
pub const DECIMAL_PLACES: u32 = 2;
const SCALE: i32 = 10_i32.pow(DECIMAL_PLACES);
const MAX_CENTS: i32 = 10_i32.pow(MAX_DIGITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(i32);

impl Price {
    pub const ZERO: Price = Price(0);
    pub const MAX: Price = Price(MAX_CENTS);

    pub fn from_cents(cents: i32) -> Result<Self, FieldError> {
        if !(0..=MAX_CENTS).contains(&cents) {
            return Err(out_of_range());
        }
        Ok(Price(cents))
    }

    pub fn cents(self) -> i32 {
        self.0
    }
}

fn out_of_range() -> FieldError {
    FieldError::new(
        "price",
        format!(
            "ensure there are no more than {MAX_DIGITS} digits in total and {DECIMAL_PLACES} decimal places (0.00 to 99.99)"
        ),
    )
}

fn invalid() -> FieldError {
    FieldError::new("price", "a valid decimal number is required")
}

impl FromStr for Price {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let cents = parse_magnitude(digits)?;
        // "-0" and "-0.00" are zero; anything else negative is out of range.
        if negative && cents != 0 {
            return Err(out_of_range());
        }
        Price::from_cents(cents)
    }
}

/// Unsigned `digits[.digits]` as hundredths.
fn parse_magnitude(s: &str) -> Result<i32, FieldError> {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let frac_significant = frac.trim_end_matches('0');
    if frac_significant.len() > DECIMAL_PLACES as usize {
        return Err(out_of_range());
    }
    let whole_significant = whole.trim_start_matches('0');
    if whole_significant.len() > (MAX_DIGITS - DECIMAL_PLACES) as usize {
        return Err(out_of_range());
    }

    let whole_value: i32 = if whole_significant.is_empty() {
        0
    } else {
        whole_significant.parse().map_err(|_| invalid())?
    };
    let mut frac_value: i32 = 0;
    for (idx, digit) in frac_significant.bytes().enumerate() {
        let place = 10_i32.pow(DECIMAL_PLACES - 1 - idx as u32);
        frac_value += i32::from(digit - b'0') * place;
    }

    Ok(whole_value * SCALE + frac_value)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl TryFrom<String> for Price {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_two_decimals() {
        let cases = [
            ("0", "0.00"),
            ("0.5", "0.50"),
            ("12.5", "12.50"),
            ("12.50", "12.50"),
            ("99.99", "99.99"),
            ("007.10", "7.10"),
            (".75", "0.75"),
            ("3.", "3.00"),
            ("1.2300", "1.23"),
            ("-0.00", "0.00"),
        ];
        for (input, expected) in cases {
            let price: Price = input.parse().unwrap();
            assert_eq!(price.to_string(), expected, "input {input}");
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        for input in ["100", "100.00", "99.999", "1.234", "-1", "-0.01", "1000"] {
            let err = input.parse::<Price>().unwrap_err();
            assert_eq!(err.field, "price");
        }
    }

    #[test]
    fn rejects_non_numeric_values() {
        for input in [
            "", ".", "abc", "1,50", "1.2.3", "+1", "1e2", "-", "--0", "- 0", "-- 0.00", "---0",
            "-+1", "-.",
        ] {
            assert!(input.parse::<Price>().is_err(), "input {input:?}");
        }
    }

    #[test]
    fn cents_bounds() {
        assert_eq!(Price::from_cents(9999).unwrap(), Price::MAX);
        assert!(Price::from_cents(10_000).is_err());
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let price: Price = "4.2".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"4.20\"");
        let back: Price = serde_json::from_str("\"4.20\"").unwrap();
        assert_eq!(back, price);
        assert!(serde_json::from_str::<Price>("\"150.00\"").is_err());
    }
}
