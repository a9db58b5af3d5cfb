//! Text to `Decimal64`.

use std::str::FromStr;

use thiserror::Error;

use crate::decimal::{Decimal64, POW10};

/// Malformed decimal text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("empty decimal string")]
    Empty,
    #[error("decimal string has no digits")]
    NoDigits,
    #[error("missing or invalid exponent in decimal string")]
    InvalidExponent,
    #[error("unexpected character {0:?} in decimal string")]
    InvalidChar(char),
}

// Digits beyond this coefficient are only tracked through the exponent;
// normalization keeps 16 of them anyway.
const COEFFICIENT_CAP: u128 = POW10[34];
const EXPONENT_CAP: i32 = 10_000;

impl Decimal64 {
    /// Parses `[-]digits[.digits][(e|E)[+|-]digits]`, or `inf`, `-inf`, `nan`.
    ///
    /// Surrounding whitespace is ignored. At least one mantissa digit is
    /// required and the whole input must be consumed.
    ///
    /// ```
    /// use messgen_decimal::Decimal64;
    ///
    /// assert_eq!(Decimal64::from_string(" 123.40 ").unwrap().to_string(), "123.4");
    /// assert_eq!(Decimal64::from_string("0.5e-1").unwrap().to_string(), "0.5e-1");
    /// assert!(Decimal64::from_string("123e").is_err());
    /// assert!(Decimal64::from_string("1.2.3").is_err());
    /// ```
    pub fn from_string(text: &str) -> Result<Decimal64, ParseDecimalError> {
        let text = text.trim();
        match text {
            "" => return Err(ParseDecimalError::Empty),
            "inf" => return Ok(Self::INFINITY),
            "-inf" => return Ok(Self::NEG_INFINITY),
            "nan" => return Ok(Self::NAN),
            _ => {}
        }

        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };
        let bytes = body.as_bytes();
        let mut i = 0;
        let mut coefficient: u128 = 0;
        let mut exponent: i32 = 0;
        let mut has_digits = false;

        while i < bytes.len() && bytes[i].is_ascii_digit() {
            if coefficient < COEFFICIENT_CAP {
                coefficient = coefficient * 10 + (bytes[i] - b'0') as u128;
            } else {
                exponent += 1;
            }
            has_digits = true;
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                if coefficient < COEFFICIENT_CAP {
                    coefficient = coefficient * 10 + (bytes[i] - b'0') as u128;
                    exponent -= 1;
                }
                has_digits = true;
                i += 1;
            }
        }
        if !has_digits {
            return Err(ParseDecimalError::NoDigits);
        }

        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            i += 1;
            let exp_negative = match bytes.get(i) {
                Some(b'-') => {
                    i += 1;
                    true
                }
                Some(b'+') => {
                    i += 1;
                    false
                }
                _ => false,
            };
            let start = i;
            let mut value: i32 = 0;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                value = (value * 10 + (bytes[i] - b'0') as i32).min(EXPONENT_CAP);
                i += 1;
            }
            if i == start {
                return Err(ParseDecimalError::InvalidExponent);
            }
            exponent += if exp_negative { -value } else { value };
        }

        if let Some(c) = body[i..].chars().next() {
            return Err(ParseDecimalError::InvalidChar(c));
        }
        Ok(Self::from_wide(negative, coefficient, exponent))
    }
}

impl FromStr for Decimal64 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}
