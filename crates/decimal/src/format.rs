//! `Decimal64` to text.

use std::fmt;

use crate::decimal::Decimal64;

impl fmt::Display for Decimal64 {
    /// Shortest text that parses back to the same value.
    ///
    /// Trailing zeros are absorbed into the exponent. Values with leading
    /// fractional zeros keep them in an exponent suffix: `0.05` prints as
    /// `0.5e-1`, `0.000123` as `0.123e-3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.write_str("nan");
        }
        if self.is_infinite() {
            return f.write_str(if self.is_sign_negative() { "-inf" } else { "inf" });
        }
        let (negative, mut coefficient, mut exponent) = self.parts();
        if coefficient == 0 {
            return f.write_str("0");
        }
        while exponent < 0 && coefficient % 10 == 0 {
            coefficient /= 10;
            exponent += 1;
        }
        if negative {
            f.write_str("-")?;
        }

        let digits = coefficient.to_string();
        if exponent >= 0 {
            f.write_str(&digits)?;
            for _ in 0..exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let frac_len = exponent.unsigned_abs() as usize;
        if digits.len() > frac_len {
            let (int, frac) = digits.split_at(digits.len() - frac_len);
            write!(f, "{int}.{frac}")
        } else if digits.len() == frac_len {
            write!(f, "0.{digits}")
        } else {
            write!(f, "0.{digits}e-{}", frac_len - digits.len())
        }
    }
}

impl fmt::Debug for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal64({self})")
    }
}
