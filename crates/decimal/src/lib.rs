//! Fixed-point `decimal64` for messgen wire formats.
//!
//! A [`Decimal64`] is `sign × coefficient × 10^exponent` packed into 64 bits
//! using the BID64 layout:
//!
//! ```text
//!  63  62 ........ 53  52 ................................ 0
//! [s ][ biased exp   ][ coefficient (53 bits)              ]
//!
//!  63  62 61  60 ...... 51  50 ........................... 0
//! [s ][ 1  1][ biased exp ][ coefficient low bits (51)     ]   coefficient = 2^53 | low
//! ```
//!
//! The second form is selected by bits 62..61 being `11` and carries
//! coefficients from `2^53` up to `10^16 - 1`. The exponent bias is 398.
//! `0x7800…` (with sign) is infinity and `0x7C00…` is NaN; both are part
//! of the wire contract.
//!
//! This profile keeps exponents within [`MIN_EXPONENT`]..=[`MAX_EXPONENT`] and
//! coefficients at or below [`MAX_COEFFICIENT`]. Every operation renormalizes
//! into that envelope, saturating to signed infinity on overflow and flushing
//! to zero on underflow.
//!
//! # Example
//!
//! ```
//! use messgen_decimal::{Decimal64, RoundMode};
//!
//! let tick: Decimal64 = "0.01".parse().unwrap();
//! let price = Decimal64::from_double(123.456, tick, RoundMode::Mid);
//! assert_eq!(price.to_string(), "123.46");
//! assert_eq!(price + Decimal64::from_integer(1), "124.46".parse().unwrap());
//! ```

mod decimal;
mod format;
mod ops;
mod parse;
mod round;
#[cfg(feature = "serde")]
mod serde_impl;

pub use decimal::{Decimal64, MAX_COEFFICIENT, MAX_EXPONENT, MIN_EXPONENT};
pub use parse::ParseDecimalError;
pub use round::RoundMode;
