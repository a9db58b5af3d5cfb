//! Bit layout, normalization and conversions.

/// Largest coefficient this profile stores (16 decimal digits).
pub const MAX_COEFFICIENT: u64 = 9_999_999_999_999_999;
/// Smallest stored exponent.
pub const MIN_EXPONENT: i32 = -19;
/// Largest stored exponent.
pub const MAX_EXPONENT: i32 = 19;

const SIGN_MASK: u64 = 1 << 63;
const SELECTOR_MASK: u64 = 0b11 << 61;
const INF_MASK: u64 = 0b11110 << 58;
const NAN_MASK: u64 = 0b11111 << 58;
const EXPONENT_BIAS: i32 = 398;
const EXPONENT_FIELD: u64 = 0x3ff;
const SMALL_COEFFICIENT_MASK: u64 = (1 << 53) - 1;
const LARGE_COEFFICIENT_MASK: u64 = (1 << 51) - 1;
const LARGE_COEFFICIENT_BASE: u64 = 1 << 53;

pub(crate) const POW10: [u128; 39] = {
    let mut table = [1u128; 39];
    let mut i = 1;
    while i < 39 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
};

pub(crate) const POW10_F64: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// BID64 decimal floating point value.
///
/// Equality and ordering are numeric: `1.0 == 1`, `-0 == 0`, and NaN is
/// unordered with everything including itself.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Decimal64(u64);

impl Decimal64 {
    pub const ZERO: Decimal64 = Decimal64::pack(false, 0, 0);
    pub const ONE: Decimal64 = Decimal64::pack(false, 1, 0);
    pub const INFINITY: Decimal64 = Decimal64(INF_MASK);
    pub const NEG_INFINITY: Decimal64 = Decimal64(SIGN_MASK | INF_MASK);
    pub const NAN: Decimal64 = Decimal64(NAN_MASK);
    /// Largest finite value, `9999999999999999e19`.
    pub const MAX: Decimal64 = Decimal64::pack(false, MAX_COEFFICIENT, MAX_EXPONENT);
    /// Smallest finite value.
    pub const MIN: Decimal64 = Decimal64::pack(true, MAX_COEFFICIENT, MAX_EXPONENT);

    /// Packs already-normalized parts; `coefficient` must be at most
    /// [`MAX_COEFFICIENT`] and `exponent` within range.
    const fn pack(negative: bool, coefficient: u64, exponent: i32) -> Decimal64 {
        let sign = if negative { SIGN_MASK } else { 0 };
        let biased = (exponent + EXPONENT_BIAS) as u64;
        if coefficient < LARGE_COEFFICIENT_BASE {
            Decimal64(sign | (biased << 53) | coefficient)
        } else {
            Decimal64(sign | SELECTOR_MASK | (biased << 51) | (coefficient & LARGE_COEFFICIENT_MASK))
        }
    }

    /// Builds `(-1)^negative × coefficient × 10^exponent`, rounding half away
    /// from zero when the coefficient has to lose digits.
    pub fn from_parts(negative: bool, coefficient: u64, exponent: i32) -> Decimal64 {
        Self::from_wide(negative, coefficient as u128, exponent)
    }

    pub(crate) fn from_wide(negative: bool, mut coefficient: u128, mut exponent: i32) -> Decimal64 {
        if coefficient == 0 {
            return Self::pack(negative, 0, exponent.clamp(MIN_EXPONENT, MAX_EXPONENT));
        }

        let excess_digits = digit_count(coefficient).saturating_sub(16) as i64;
        let below_range = MIN_EXPONENT as i64 - exponent as i64;
        let drop = excess_digits.max(below_range).max(0);
        if drop > 0 {
            if drop >= POW10.len() as i64 {
                return Self::pack(negative, 0, MIN_EXPONENT);
            }
            let divisor = POW10[drop as usize];
            let remainder = coefficient % divisor;
            coefficient /= divisor;
            if remainder >= divisor - remainder {
                coefficient += 1;
            }
            exponent = (exponent as i64 + drop) as i32;
            if coefficient > MAX_COEFFICIENT as u128 {
                coefficient /= 10;
                exponent += 1;
            }
            if coefficient == 0 {
                return Self::pack(negative, 0, exponent.clamp(MIN_EXPONENT, MAX_EXPONENT));
            }
        }

        while exponent > MAX_EXPONENT && coefficient * 10 <= MAX_COEFFICIENT as u128 {
            coefficient *= 10;
            exponent -= 1;
        }
        if exponent > MAX_EXPONENT {
            return if negative {
                Self::NEG_INFINITY
            } else {
                Self::INFINITY
            };
        }
        Self::pack(negative, coefficient as u64, exponent)
    }

    /// Splits a finite value into `(negative, coefficient, exponent)`.
    /// Returns `None` for NaN and infinities.
    pub fn decompose(self) -> Option<(bool, u64, i32)> {
        if self.is_special() {
            None
        } else {
            Some(self.parts())
        }
    }

    /// Field extraction for a value known to be finite.
    pub(crate) fn parts(self) -> (bool, u64, i32) {
        let bits = self.0;
        let negative = bits & SIGN_MASK != 0;
        if bits & SELECTOR_MASK == SELECTOR_MASK {
            let exponent = ((bits >> 51) & EXPONENT_FIELD) as i32 - EXPONENT_BIAS;
            let coefficient = LARGE_COEFFICIENT_BASE | (bits & LARGE_COEFFICIENT_MASK);
            (negative, coefficient, exponent)
        } else {
            let exponent = ((bits >> 53) & EXPONENT_FIELD) as i32 - EXPONENT_BIAS;
            (negative, bits & SMALL_COEFFICIENT_MASK, exponent)
        }
    }

    #[inline]
    pub(crate) const fn with_sign_flipped(self) -> Decimal64 {
        Decimal64(self.0 ^ SIGN_MASK)
    }

    /// Raw wire bits.
    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Interprets wire bits. Values outside this profile's envelope are
    /// renormalized; non-canonical large coefficients decode as zero.
    pub fn from_bits(bits: u64) -> Decimal64 {
        let raw = Decimal64(bits);
        if raw.is_nan() {
            return Self::NAN;
        }
        if raw.is_infinite() {
            return Decimal64((bits & SIGN_MASK) | INF_MASK);
        }
        let (negative, coefficient, exponent) = raw.parts();
        if coefficient > MAX_COEFFICIENT {
            return Self::pack(negative, 0, exponent.clamp(MIN_EXPONENT, MAX_EXPONENT));
        }
        Self::from_parts(negative, coefficient, exponent)
    }

    pub fn from_integer(value: i64) -> Decimal64 {
        Self::from_wide(value < 0, value.unsigned_abs() as u128, 0)
    }

    #[inline]
    fn is_special(self) -> bool {
        self.0 & INF_MASK == INF_MASK
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.0 & NAN_MASK == NAN_MASK
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        self.is_special() && !self.is_nan()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        !self.is_special()
    }

    #[inline]
    pub fn is_sign_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    pub fn is_zero(self) -> bool {
        matches!(self.decompose(), Some((_, 0, _)))
    }

    /// Nearest `f64`. Infinities and NaN map to their float counterparts.
    pub fn to_double(self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        let sign = if self.is_sign_negative() { -1.0 } else { 1.0 };
        if self.is_infinite() {
            return sign * f64::INFINITY;
        }
        let (_, coefficient, exponent) = self.parts();
        let magnitude = coefficient as f64;
        let scaled = if exponent >= 0 {
            magnitude * POW10_F64[exponent as usize]
        } else {
            magnitude / POW10_F64[(-exponent) as usize]
        };
        sign * scaled
    }

    /// Integer part, truncated toward zero and saturated to the `i64` range.
    /// NaN yields `0`.
    pub fn to_integer(self) -> i64 {
        if self.is_nan() {
            return 0;
        }
        let negative = self.is_sign_negative();
        if self.is_infinite() {
            return if negative { i64::MIN } else { i64::MAX };
        }
        let (_, coefficient, exponent) = self.parts();
        let magnitude = if exponent >= 0 {
            coefficient as u128 * POW10[exponent as usize]
        } else {
            coefficient as u128 / POW10[(-exponent) as usize]
        };
        let signed = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        signed.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl Default for Decimal64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Decimal64 {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i32> for Decimal64 {
    fn from(value: i32) -> Self {
        Self::from_integer(value as i64)
    }
}

pub(crate) fn digit_count(mut value: u128) -> u32 {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}
