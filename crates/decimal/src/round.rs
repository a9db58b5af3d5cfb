//! Quantizing binary floats onto a decimal tick grid.

use crate::decimal::{Decimal64, POW10, POW10_F64};

/// Direction used when a value falls between two tick multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundMode {
    /// Toward negative infinity.
    Down,
    /// To the nearest multiple, halves away from zero.
    Mid,
    /// Toward positive infinity.
    Up,
}

impl Decimal64 {
    /// Quantizes `value` to a multiple of `tick`.
    ///
    /// The result carries the tick's exponent, so `from_double(1.0, 0.01)`
    /// is stored as `100e-2`. NaN and infinite inputs map to the matching
    /// special value. A tick that is not a positive finite number yields NaN.
    ///
    /// ```
    /// use messgen_decimal::{Decimal64, RoundMode};
    ///
    /// let tick = Decimal64::from_integer(1);
    /// assert_eq!(Decimal64::from_double(10.5, tick, RoundMode::Down), Decimal64::from_integer(10));
    /// assert_eq!(Decimal64::from_double(10.5, tick, RoundMode::Mid), Decimal64::from_integer(11));
    /// assert_eq!(Decimal64::from_double(-10.5, tick, RoundMode::Down), Decimal64::from_integer(-11));
    /// ```
    pub fn from_double(value: f64, tick: Decimal64, mode: RoundMode) -> Decimal64 {
        if value.is_nan() {
            return Self::NAN;
        }
        if value.is_infinite() {
            return if value < 0.0 {
                Self::NEG_INFINITY
            } else {
                Self::INFINITY
            };
        }
        let (tick_coefficient, tick_exponent) = match tick.decompose() {
            Some((false, coefficient, exponent)) if coefficient != 0 => (coefficient, exponent),
            _ => return Self::NAN,
        };

        let scaled = if tick_exponent >= 0 {
            value / POW10_F64[tick_exponent as usize]
        } else {
            value * POW10_F64[(-tick_exponent) as usize]
        };
        let steps = scaled / tick_coefficient as f64;
        let rounded = match mode {
            RoundMode::Down => steps.floor(),
            RoundMode::Mid => steps.round(),
            RoundMode::Up => steps.ceil(),
        };

        let negative = rounded < 0.0;
        // f64 carries ~17 significant digits, so digits past 10^22 are noise
        // and can be folded into the exponent before the u128 multiply.
        let mut count = rounded.abs() as u128;
        let mut exponent = tick_exponent;
        while count > POW10[22] {
            count /= 10;
            exponent += 1;
        }
        Self::from_wide(negative, count * tick_coefficient as u128, exponent)
    }
}
