//! Numeric literal parsing.
//!
//! A literal is split into a sign, a base, integer digits, optional fraction
//! digits and an optional exponent, then evaluated:
//! - integers (no fraction, no exponent) accumulate exactly in a [`WideInt`]
//! - decimal floats go through the host float parser
//! - hexadecimal floats scale an exact mantissa by a binary exponent
//! - binary floats are evaluated digit by digit: `int + frac / 2^len`,
//!   then scaled by `2^exp`
//!
//! The sign is stripped before digit parsing and re-applied as a final
//! negation. `_` separators are accepted anywhere among the digits.

use crate::{NumError, NumResult, Numeric, WideInt};

/// A supported literal base.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn value(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    pub fn from_value(value: u32) -> NumResult<Self> {
        match value {
            2 => Ok(Radix::Binary),
            10 => Ok(Radix::Decimal),
            16 => Ok(Radix::Hexadecimal),
            other => Err(NumError::InvalidRadix(other)),
        }
    }

    /// Base the exponent scales by (`e` is decimal, `p` is binary).
    pub fn exponent_base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Binary | Radix::Hexadecimal => 2,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Radix::Binary => "0b",
            Radix::Decimal => "",
            Radix::Hexadecimal => "0x",
        }
    }

    fn exponent_markers(self) -> &'static [char] {
        match self {
            Radix::Decimal => &['e', 'E'],
            Radix::Hexadecimal => &['p', 'P'],
            Radix::Binary => &['e', 'E', 'p', 'P'],
        }
    }
}

/// The grammar fragments of a numeric literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LiteralParts<'a> {
    pub radix: Radix,
    pub negative: bool,
    pub integer: &'a str,
    pub fraction: Option<&'a str>,
    /// Exponent digits including an optional leading sign.
    pub exponent: Option<&'a str>,
}

/// Parse full literal text (`-0x1F`, `1_000`, `1.5e2`, `0b1.1p3`, `inf`, `nan`).
pub fn parse_literal(text: &str) -> NumResult<Numeric> {
    if let Some(special) = special_value(text) {
        return Ok(special);
    }
    parse_parts(&split_literal(text)?)
}

/// Parse digits already known to be in `radix` (no base prefix).
pub fn parse_in_radix(text: &str, radix: Radix) -> NumResult<Numeric> {
    if let Some(special) = special_value(text) {
        return Ok(special);
    }
    let (negative, body) = strip_sign(text);
    parse_parts(&split_digits(text, negative, radix, body)?)
}

/// Split literal text into its grammar fragments, validating each one.
pub fn split_literal(text: &str) -> NumResult<LiteralParts<'_>> {
    let (negative, body) = strip_sign(text);
    let (radix, digits) = if let Some(rest) = strip_prefix_ci(body, "0x") {
        (Radix::Hexadecimal, rest)
    } else if let Some(rest) = strip_prefix_ci(body, "0b") {
        (Radix::Binary, rest)
    } else {
        (Radix::Decimal, body)
    };
    split_digits(text, negative, radix, digits)
}

/// Evaluate validated literal fragments.
pub fn parse_parts(parts: &LiteralParts<'_>) -> NumResult<Numeric> {
    let literal = || render_parts(parts);
    let value = match (parts.fraction, parts.exponent) {
        (None, None) => Numeric::Wide(accumulate(parts.integer, parts.radix, &literal)?),
        _ => match parts.radix {
            Radix::Decimal => host_decimal(parts, &literal)?,
            Radix::Hexadecimal => hex_float(parts, &literal)?,
            Radix::Binary => digitwise_float(parts, &literal)?,
        },
    };
    Ok(if parts.negative { value.negate() } else { value })
}

fn special_value(text: &str) -> Option<Numeric> {
    let (negative, body) = strip_sign(text);
    if body.eq_ignore_ascii_case("inf") {
        Some(if negative { Numeric::NegInf } else { Numeric::PosInf })
    } else if body.eq_ignore_ascii_case("nan") {
        Some(Numeric::NaN)
    } else {
        None
    }
}

fn strip_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn split_digits<'a>(
    text: &str,
    negative: bool,
    radix: Radix,
    digits: &'a str,
) -> NumResult<LiteralParts<'a>> {
    let (mantissa, exponent) = match digits.find(radix.exponent_markers()) {
        Some(at) => (&digits[..at], Some(&digits[at + 1..])),
        None => (digits, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };

    let digit_count = check_digits(text, integer, radix)? + match fraction {
        Some(fraction) => check_digits(text, fraction, radix)?,
        None => 0,
    };
    if digit_count == 0 {
        return Err(NumError::syntax(text, "expected at least one digit"));
    }
    if let Some(exponent) = exponent {
        let unsigned = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if check_digits(text, unsigned, Radix::Decimal)? == 0 {
            return Err(NumError::syntax(text, "exponent has no digits"));
        }
    }

    Ok(LiteralParts {
        radix,
        negative,
        integer,
        fraction,
        exponent,
    })
}

/// Count the digits of `part`, rejecting anything invalid for `radix`.
fn check_digits(text: &str, part: &str, radix: Radix) -> NumResult<usize> {
    let mut count = 0;
    for c in part.chars() {
        if c == '_' {
            continue;
        }
        if !c.is_digit(radix.value()) {
            return Err(NumError::syntax(text, "invalid digit for base"));
        }
        count += 1;
    }
    Ok(count)
}

fn render_parts(parts: &LiteralParts<'_>) -> String {
    let mut out = String::new();
    if parts.negative {
        out.push('-');
    }
    out.push_str(parts.radix.prefix());
    out.push_str(parts.integer);
    if let Some(fraction) = parts.fraction {
        out.push('.');
        out.push_str(fraction);
    }
    if let Some(exponent) = parts.exponent {
        out.push(if parts.radix == Radix::Decimal { 'e' } else { 'p' });
        out.push_str(exponent);
    }
    out
}

fn digits_of(part: &str) -> impl Iterator<Item = char> + '_ {
    part.chars().filter(|&c| c != '_')
}

/// Multiply-by-base-then-add-digit over the whole digit string.
fn accumulate(part: &str, radix: Radix, literal: &dyn Fn() -> String) -> NumResult<WideInt> {
    let mut acc = WideInt::ZERO;
    for c in digits_of(part) {
        let digit = c
            .to_digit(radix.value())
            .ok_or_else(|| NumError::syntax(&literal(), "invalid digit for base"))?;
        acc = acc
            .checked_mul_add_small(radix.value(), digit)
            .ok_or_else(|| NumError::overflow(literal(), format!("{} bits", WideInt::BITS)))?;
    }
    Ok(acc)
}

fn exponent_value(parts: &LiteralParts<'_>, literal: &dyn Fn() -> String) -> NumResult<i64> {
    let Some(exponent) = parts.exponent else {
        return Ok(0);
    };
    let cleaned: String = digits_of(exponent).collect();
    // Exponents this large saturate every f64 anyway.
    Ok(cleaned
        .parse::<i64>()
        .map_err(|_| NumError::syntax(&literal(), "invalid exponent"))?
        .clamp(-100_000, 100_000))
}

fn host_decimal(parts: &LiteralParts<'_>, literal: &dyn Fn() -> String) -> NumResult<Numeric> {
    let mut text: String = digits_of(parts.integer).collect();
    if text.is_empty() {
        text.push('0');
    }
    if let Some(fraction) = parts.fraction {
        text.push('.');
        text.extend(digits_of(fraction));
        if text.ends_with('.') {
            text.push('0');
        }
    }
    if let Some(exponent) = parts.exponent {
        text.push('e');
        text.extend(digits_of(exponent));
    }
    text.parse::<f64>()
        .map(Numeric::from_f64)
        .map_err(|_| NumError::syntax(&literal(), "not a valid float"))
}

fn hex_float(parts: &LiteralParts<'_>, literal: &dyn Fn() -> String) -> NumResult<Numeric> {
    let fraction = parts.fraction.unwrap_or("");
    let mut all_digits = String::from(parts.integer);
    all_digits.push_str(fraction);
    let (mantissa, dropped) = accumulate_mantissa(&all_digits, Radix::Hexadecimal, literal)?;
    let exponent =
        exponent_value(parts, literal)? + 4 * dropped - 4 * count_i64(digits_of(fraction).count());
    Ok(Numeric::from_f64(scale_pow2(mantissa.to_f64(), exponent)))
}

/// Binary float: `int + frac / 2^len`, then scaled by `2^exp`.
fn digitwise_float(parts: &LiteralParts<'_>, literal: &dyn Fn() -> String) -> NumResult<Numeric> {
    let (integer, dropped) = accumulate_mantissa(parts.integer, Radix::Binary, literal)?;
    let mut value = scale_pow2(integer.to_f64(), dropped);
    if let Some(fraction) = parts.fraction {
        let (fraction_value, dropped) = accumulate_mantissa(fraction, Radix::Binary, literal)?;
        let kept = count_i64(digits_of(fraction).count()) - dropped;
        value += scale_pow2(fraction_value.to_f64(), -kept);
    }
    Ok(Numeric::from_f64(scale_pow2(value, exponent_value(parts, literal)?)))
}

/// Float mantissa: exact while it fits in a [`WideInt`], after which the
/// remaining digits are counted instead of accumulated. The kept bits
/// exceed f64 precision several times over.
fn accumulate_mantissa(
    part: &str,
    radix: Radix,
    literal: &dyn Fn() -> String,
) -> NumResult<(WideInt, i64)> {
    let mut acc = WideInt::ZERO;
    let mut dropped = 0i64;
    for c in digits_of(part) {
        let digit = c
            .to_digit(radix.value())
            .ok_or_else(|| NumError::syntax(&literal(), "invalid digit for base"))?;
        if dropped > 0 {
            dropped += 1;
            continue;
        }
        match acc.checked_mul_add_small(radix.value(), digit) {
            Some(next) => acc = next,
            None => dropped = 1,
        }
    }
    Ok((acc, dropped))
}

fn count_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX / 8)
}

/// `value * 2^exponent` without overflowing the intermediate power.
fn scale_pow2(mut value: f64, mut exponent: i64) -> f64 {
    const STEP: i64 = 1000;
    let up = 2f64.powi(1000);
    let down = 2f64.powi(-1000);
    while exponent > STEP {
        value *= up;
        exponent -= STEP;
    }
    while exponent < -STEP {
        value *= down;
        exponent += STEP;
    }
    let remaining = i32::try_from(exponent).unwrap_or(0);
    value * 2f64.powi(remaining)
}

#[cfg(test)]
mod tests;
