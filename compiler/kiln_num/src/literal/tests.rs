use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_decimal_exponent_is_float() {
    assert_eq!(parse_literal("1.5e2"), Ok(Numeric::Float(150.0)));
    assert_eq!(parse_literal("2E-1"), Ok(Numeric::Float(0.2)));
    assert_eq!(parse_literal(".5"), Ok(Numeric::Float(0.5)));
    assert_eq!(parse_literal("3."), Ok(Numeric::Float(3.0)));
}

#[test]
fn test_integers_are_exact() {
    assert_eq!(parse_literal("1_000_000"), Ok(Numeric::Int(1_000_000)));
    assert_eq!(parse_literal("-0x1F"), Ok(Numeric::Int(-31)));
    assert_eq!(parse_literal("0b1010"), Ok(Numeric::Int(10)));
    assert_eq!(
        parse_literal("340282366920938463463374607431768211455"),
        Ok(Numeric::Wide(WideInt::from_u128(u128::MAX)))
    );
    assert_eq!(
        parse_literal("0xffffffffffffffffffffffffffffffff"),
        Ok(Numeric::Wide(WideInt::from_u128(u128::MAX)))
    );
}

#[test]
fn test_integer_beyond_256_bits_overflows() {
    let text = format!("0x1{}", "0".repeat(64));
    assert!(matches!(parse_literal(&text), Err(NumError::Overflow { .. })));
}

#[test]
fn test_hex_and_binary_floats() {
    assert_eq!(parse_literal("0x1p4"), Ok(Numeric::Float(16.0)));
    assert_eq!(parse_literal("0x1.8p1"), Ok(Numeric::Float(3.0)));
    assert_eq!(parse_literal("0xAp-2"), Ok(Numeric::Float(2.5)));
    assert_eq!(parse_literal("0b1.1"), Ok(Numeric::Float(1.5)));
    assert_eq!(parse_literal("0b1.01e2"), Ok(Numeric::Float(5.0)));
    assert_eq!(parse_literal("-0b11p-1"), Ok(Numeric::Float(-1.5)));
}

#[test]
fn test_long_float_mantissas_keep_their_scale() {
    let hex_fraction = format!("0x1.{}p0", "0".repeat(64));
    assert_eq!(parse_literal(&hex_fraction), Ok(Numeric::Float(1.0)));
    let hex_integer = format!("0x1{}.0p0", "0".repeat(70));
    assert_eq!(parse_literal(&hex_integer), Ok(Numeric::Float(2f64.powi(280))));

    let binary_fraction = format!("0b0.{}p0", "1".repeat(260));
    assert_eq!(parse_literal(&binary_fraction), Ok(Numeric::Float(1.0)));
    let binary_integer = format!("0b1{}.0", "0".repeat(300));
    assert_eq!(parse_literal(&binary_integer), Ok(Numeric::Float(2f64.powi(300))));
    let tiny = format!("-0b0.{}1", "0".repeat(299));
    assert_eq!(parse_literal(&tiny), Ok(Numeric::Float(-(2f64.powi(-300)))));
}

#[test]
fn test_hex_exponent_marker_is_not_a_digit_split() {
    // `e` is a hex digit, not an exponent marker
    assert_eq!(parse_literal("0x1e2"), Ok(Numeric::Int(0x1e2)));
}

#[test]
fn test_special_values() {
    assert_eq!(parse_literal("inf"), Ok(Numeric::PosInf));
    assert_eq!(parse_literal("-inf"), Ok(Numeric::NegInf));
    assert_eq!(parse_literal("nan"), Ok(Numeric::NaN));
    assert_eq!(parse_literal("-nan"), Ok(Numeric::NaN));
    assert_eq!(parse_literal("1e999"), Ok(Numeric::PosInf));
}

#[test]
fn test_malformed_literals() {
    for text in ["", "-", "0x", "1e", "1e+", "12a", "0b102", "1.2.3", "0x1.g"] {
        assert!(
            matches!(parse_literal(text), Err(NumError::LiteralSyntax { .. })),
            "{text:?} should be rejected"
        );
    }
}

#[test]
fn test_split_literal_parts() {
    let parts = split_literal("-0x1_F.8p+3");
    assert_eq!(
        parts,
        Ok(LiteralParts {
            radix: Radix::Hexadecimal,
            negative: true,
            integer: "1_F",
            fraction: Some("8"),
            exponent: Some("+3"),
        })
    );
    let value = parts.and_then(|parts| parse_parts(&parts));
    assert_eq!(value, Ok(Numeric::Float(-252.0)));
}

#[test]
fn test_parse_in_radix_without_prefix() {
    assert_eq!(parse_in_radix("ff", Radix::Hexadecimal), Ok(Numeric::Int(255)));
    assert_eq!(parse_in_radix("-101", Radix::Binary), Ok(Numeric::Int(-5)));
    assert!(parse_in_radix("19", Radix::Binary).is_err());
}

#[test]
fn test_radix_from_value() {
    assert_eq!(Radix::from_value(16), Ok(Radix::Hexadecimal));
    assert_eq!(Radix::from_value(8), Err(NumError::InvalidRadix(8)));
    assert_eq!(Radix::Hexadecimal.exponent_base(), 2);
    assert_eq!(Radix::Decimal.exponent_base(), 10);
}
