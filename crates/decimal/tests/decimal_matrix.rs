//! Rounding, text and arithmetic matrix for `Decimal64`.

use messgen_decimal::{Decimal64, RoundMode, MAX_COEFFICIENT, MAX_EXPONENT, MIN_EXPONENT};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn dec(s: &str) -> Decimal64 {
    s.parse()
        .unwrap_or_else(|e| panic!("failed to parse {s:?}: {e}"))
}

fn quantize(value: f64, tick: &str) -> [Decimal64; 3] {
    let tick = dec(tick);
    [
        Decimal64::from_double(value, tick, RoundMode::Down),
        Decimal64::from_double(value, tick, RoundMode::Mid),
        Decimal64::from_double(value, tick, RoundMode::Up),
    ]
}

fn decs(values: [&str; 3]) -> [Decimal64; 3] {
    values.map(dec)
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[test]
fn rounding_integer_tick() {
    assert_eq!(quantize(10.5, "1"), decs(["10", "11", "11"]));
    assert_eq!(quantize(-10.5, "1"), decs(["-11", "-11", "-10"]));
    assert_eq!(quantize(-10.4, "1")[1], dec("-10"));
    assert_eq!(quantize(10.4, "1")[1], dec("10"));
}

#[test]
fn rounding_half_tick() {
    assert_eq!(quantize(10.25, "0.5"), decs(["10", "10.5", "10.5"]));
    assert_eq!(quantize(-10.25, "0.5"), decs(["-10.5", "-10.5", "-10"]));
    assert_eq!(quantize(10.249999, "0.5")[1], dec("10"));
    assert_eq!(quantize(-10.249999, "0.5")[1], dec("-10"));
}

#[test]
fn rounding_extreme_ticks() {
    assert_eq!(
        quantize(0.0000012345, "1e-7"),
        decs(["0.0000012", "0.0000012", "0.0000013"])
    );
    assert_eq!(
        quantize(9.876e10, "1e8"),
        decs(["9.87e10", "9.88e10", "9.88e10"])
    );
}

#[test]
fn rounding_precision() {
    assert_eq!(quantize(123.456, "0.01"), decs(["123.45", "123.46", "123.46"]));
    assert_eq!(quantize(123000.0, "100"), decs(["123000", "123000", "123000"]));
}

#[test]
fn rounding_near_zero() {
    assert_eq!(quantize(0.01, "0.1"), decs(["0", "0", "0.1"]));
    assert_eq!(quantize(-0.01, "0.1"), decs(["-0.1", "0", "0"]));
    assert_eq!(quantize(0.0, "0.01"), decs(["0", "0", "0"]));
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

#[test]
fn parse_leading_and_trailing_zeros() {
    assert_eq!(dec("00.123"), dec("0.123"));
    assert_eq!(dec("000123"), dec("123"));
    assert_eq!(dec("123.40"), dec("123.4"));
    assert_eq!(dec("  123  "), dec("123"));
    assert_eq!(dec("-0.0"), Decimal64::ZERO);
}

#[test]
fn parse_exponents() {
    assert_eq!(dec("0.5e-1"), dec("0.05"));
    assert_eq!(dec("1.234e-10").to_string(), "0.1234e-9");
    assert_eq!(dec("12.34E9").to_string(), "12340000000");
    assert_eq!(dec("5e+2"), dec("500"));
}

#[test]
fn parse_specials() {
    assert_eq!(dec("inf"), Decimal64::INFINITY);
    assert_eq!(dec("-inf"), Decimal64::NEG_INFINITY);
    assert!(dec("nan").is_nan());
}

#[test]
fn parse_rejects_malformed() {
    for bad in ["", "abc", "123e", "e10", "123.456.789", "12 34", "1e1.5", "--1", "0x10"] {
        assert!(bad.parse::<Decimal64>().is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn format_after_rounding() {
    let d = Decimal64::from_double(0.1234567890123456, dec("1e-7"), RoundMode::Mid);
    assert_eq!(d.to_string(), "0.1234568");
    let d = Decimal64::from_double(9.9999, dec("0.001"), RoundMode::Mid);
    assert_eq!(d.to_string(), "10");
    let d = Decimal64::from_double(-0.05, dec("0.01"), RoundMode::Mid);
    assert_eq!(d.to_string(), "-0.5e-1");
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn arithmetic_matrix() {
    assert_eq!(dec("5.5") * 2, dec("11"));
    assert_eq!(dec("5.5") * -2, dec("-11"));
    assert_eq!(dec("5.5") * 3, dec("16.5"));
    assert_eq!(dec("10.5") + dec("20.25"), dec("30.75"));
    assert_eq!(dec("10.5") + dec("-15.75"), dec("-5.25"));
    assert_eq!(dec("10.5") - dec("20.25"), dec("-9.75"));
}

#[test]
fn integer_conversions() {
    assert_eq!(Decimal64::from_integer(-42).to_integer(), -42);
    assert_eq!(dec("-42.9").to_integer(), -42);
    assert_eq!(Decimal64::from_integer(i64::MAX).to_string(), "9223372036854776000");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn finite_decimal() -> impl Strategy<Value = Decimal64> {
    (any::<bool>(), 0..=MAX_COEFFICIENT, MIN_EXPONENT..=MAX_EXPONENT)
        .prop_map(|(negative, coefficient, exponent)| {
            Decimal64::from_parts(negative, coefficient, exponent)
        })
}

proptest! {
    #[test]
    fn bits_roundtrip(d in finite_decimal()) {
        let back = Decimal64::from_bits(d.to_bits());
        prop_assert_eq!(back.to_bits(), d.to_bits());
        prop_assert_eq!(back, d);
    }

    #[test]
    fn text_roundtrip(d in finite_decimal()) {
        let text = d.to_string();
        let back: Decimal64 = text.parse().unwrap();
        prop_assert_eq!(back, d, "text {}", text);
    }

    #[test]
    fn add_then_sub_is_identity_for_same_exponent(
        a in -1_000_000_000i64..1_000_000_000,
        b in -1_000_000_000i64..1_000_000_000,
        exponent in -6i32..6,
    ) {
        let x = Decimal64::from_parts(a < 0, a.unsigned_abs(), exponent);
        let y = Decimal64::from_parts(b < 0, b.unsigned_abs(), exponent);
        prop_assert_eq!((x + y) - y, x);
    }
}

#[test]
fn seeded_mid_rounding_stays_within_half_tick() {
    let mut rng = StdRng::seed_from_u64(0x6d65_7373);
    for _ in 0..2_000 {
        let digits = rng.gen_range(0..8u32);
        let tick = Decimal64::from_parts(false, 1, -(digits as i32));
        let tick_value = tick.to_double();
        let value: f64 = rng.gen_range(-1.0e6..1.0e6);
        let rounded = Decimal64::from_double(value, tick, RoundMode::Mid);
        let error = (rounded.to_double() - value).abs();
        assert!(
            error <= tick_value * 0.5 + 1e-9,
            "{value} rounded to {rounded} with tick {tick}"
        );
        let down = Decimal64::from_double(value, tick, RoundMode::Down);
        let up = Decimal64::from_double(value, tick, RoundMode::Up);
        assert!(down <= rounded && rounded <= up);
    }
}
