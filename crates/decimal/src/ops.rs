//! Arithmetic and ordering.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::decimal::{Decimal64, POW10};

/// Largest exponent gap bridged by scaling the coarser operand up; a
/// 16-digit coefficient times `10^20` still fits in `i128`.
const MAX_ALIGN: i32 = 20;

impl Decimal64 {
    fn signed_parts(self) -> (i128, i32) {
        let (negative, coefficient, exponent) = self.parts();
        let c = coefficient as i128;
        (if negative { -c } else { c }, exponent)
    }

    /// -1 for negative infinity, 1 for positive infinity, 0 otherwise.
    fn infinity_rank(self) -> i8 {
        match (self.is_infinite(), self.is_sign_negative()) {
            (false, _) => 0,
            (true, true) => -1,
            (true, false) => 1,
        }
    }

    fn checked_add(self, rhs: Decimal64) -> Decimal64 {
        if self.is_nan() || rhs.is_nan() {
            return Self::NAN;
        }
        match (self.infinity_rank(), rhs.infinity_rank()) {
            (0, 0) => {}
            (a, b) if a != 0 && b != 0 && a != b => return Self::NAN,
            (0, _) => return rhs,
            _ => return self,
        }

        let (a, ea) = self.signed_parts();
        let (b, eb) = rhs.signed_parts();
        let (a, b, exponent) = if ea >= eb {
            align(a, ea, b, eb)
        } else {
            let (b, a, e) = align(b, eb, a, ea);
            (a, b, e)
        };
        let sum = a + b;
        Self::from_wide(sum < 0, sum.unsigned_abs(), exponent)
    }

    fn checked_mul_int(self, rhs: i64) -> Decimal64 {
        if self.is_nan() {
            return Self::NAN;
        }
        let negative = self.is_sign_negative() != (rhs < 0);
        if self.is_infinite() {
            return match (rhs, negative) {
                (0, _) => Self::NAN,
                (_, true) => Self::NEG_INFINITY,
                (_, false) => Self::INFINITY,
            };
        }
        let (_, coefficient, exponent) = self.parts();
        let product = coefficient as u128 * rhs.unsigned_abs() as u128;
        Self::from_wide(negative, product, exponent)
    }
}

/// Rescales so both coefficients share one exponent; `ea >= eb`.
fn align(a: i128, ea: i32, b: i128, eb: i32) -> (i128, i128, i32) {
    let gap = ea - eb;
    let up = gap.min(MAX_ALIGN);
    let a = a * POW10[up as usize] as i128;
    let down = (gap - up) as usize;
    let b = if down == 0 {
        b
    } else if down >= POW10.len() {
        0
    } else {
        b / POW10[down] as i128
    };
    (a, b, ea - up)
}

/// Compares `ca × 10^ea` with `cb × 10^eb` for non-negative coefficients.
fn cmp_magnitude(ca: u64, ea: i32, cb: u64, eb: i32) -> Ordering {
    if ca == 0 || cb == 0 {
        return ca.cmp(&cb);
    }
    if ea >= eb {
        let gap = ea - eb;
        if gap > MAX_ALIGN {
            return Ordering::Greater;
        }
        (ca as u128 * POW10[gap as usize]).cmp(&(cb as u128))
    } else {
        cmp_magnitude(cb, eb, ca, ea).reverse()
    }
}

impl PartialOrd for Decimal64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        let (ra, rb) = (self.infinity_rank(), other.infinity_rank());
        if ra != 0 || rb != 0 {
            return Some(ra.cmp(&rb));
        }

        let (na, ca, ea) = self.parts();
        let (nb, cb, eb) = other.parts();
        let sign = |negative: bool, c: u64| match (c, negative) {
            (0, _) => 0i8,
            (_, true) => -1,
            (_, false) => 1,
        };
        let (sa, sb) = (sign(na, ca), sign(nb, cb));
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        let magnitude = cmp_magnitude(ca, ea, cb, eb);
        Some(if sa < 0 { magnitude.reverse() } else { magnitude })
    }
}

impl PartialEq for Decimal64 {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Neg for Decimal64 {
    type Output = Decimal64;

    fn neg(self) -> Decimal64 {
        if self.is_nan() {
            return self;
        }
        self.with_sign_flipped()
    }
}

impl Add for Decimal64 {
    type Output = Decimal64;

    fn add(self, rhs: Decimal64) -> Decimal64 {
        self.checked_add(rhs)
    }
}

impl Sub for Decimal64 {
    type Output = Decimal64;

    fn sub(self, rhs: Decimal64) -> Decimal64 {
        self.checked_add(-rhs)
    }
}

impl Mul<i64> for Decimal64 {
    type Output = Decimal64;

    fn mul(self, rhs: i64) -> Decimal64 {
        self.checked_mul_int(rhs)
    }
}

impl AddAssign for Decimal64 {
    fn add_assign(&mut self, rhs: Decimal64) {
        *self = *self + rhs;
    }
}

impl SubAssign for Decimal64 {
    fn sub_assign(&mut self, rhs: Decimal64) {
        *self = *self - rhs;
    }
}

impl MulAssign<i64> for Decimal64 {
    fn mul_assign(&mut self, rhs: i64) {
        *self = *self * rhs;
    }
}
