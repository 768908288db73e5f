//! Rendering numeric values back to text.

use crate::{IntWidth, NumError, NumResult, Numeric, Radix};

/// Significant digits tried last by [`to_decimal_scientific`] when the
/// caller has no preference. 17 digits round-trip every `f64`.
pub const DEFAULT_MAX_DIGITS: usize = 17;

/// Render `value` in `radix`.
///
/// With a `width`, integers are first wrapped into that width's range.
/// Decimal output then shows the wrapped (signed or unsigned) value while
/// binary and hexadecimal output show the raw two's-complement bit pattern.
/// Without a width the exact integer is rendered, with a leading `-` when
/// negative. No base prefix is emitted; digits are lowercase.
///
/// Non-integers only render in decimal.
pub fn to_text(value: &Numeric, radix: Radix, width: Option<IntWidth>) -> NumResult<String> {
    let Some(integer) = value.to_wide() else {
        return match radix {
            Radix::Decimal => Ok(value.to_string()),
            Radix::Binary | Radix::Hexadecimal => Err(NumError::NotInteger(value.to_string())),
        };
    };
    let Some(width) = width else {
        return Ok(integer.to_str_radix(radix.value()));
    };
    Ok(match radix {
        Radix::Decimal => width.wrap(&integer).to_string(),
        Radix::Binary => format!("{:b}", width.bit_pattern(&integer)),
        Radix::Hexadecimal => format!("{:x}", width.bit_pattern(&integer)),
    })
}

/// Shortest decimal rendering of `value` that parses back to the same double.
///
/// Tries 15 significant digits, then 16, then `max_digits`. The result always
/// carries a float marker (`.`, an exponent, or a non-finite name) so it never
/// reads back as an integer.
pub fn to_decimal_scientific(value: f64, max_digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let mut text = String::new();
    for precision in [15, 16, max_digits.max(1)] {
        text = format_general(value, precision);
        if text.parse::<f64>().is_ok_and(|parsed| parsed == value) {
            break;
        }
    }
    if !text.contains(['.', 'e']) {
        text.push_str(".0");
    }
    text
}

/// `%.{precision}g`: fixed notation for moderate exponents, scientific
/// otherwise, trailing zeros removed.
fn format_general(value: f64, precision: usize) -> String {
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let precision = i64::try_from(precision).unwrap_or(i64::MAX);

    if exponent < -4 || exponent >= precision {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }
    let decimals = usize::try_from(precision - 1 - exponent).unwrap_or(0);
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
