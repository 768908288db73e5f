//! The tagged numeric value.
//!
//! [`Numeric`] is what literal parsing produces and what compile-time
//! arithmetic operates on. Integer values are exact; float values are host
//! doubles. Mixed integer/float arithmetic coerces the integer side to float.

use std::cmp::Ordering;
use std::fmt;

use crate::radix::{to_decimal_scientific, DEFAULT_MAX_DIGITS};
use crate::{NumError, NumResult, WideInt};

/// Coarse classification of a [`Numeric`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer,
    Float,
    NaN,
    PosInf,
    NegInf,
}

impl NumericKind {
    pub fn name(self) -> &'static str {
        match self {
            NumericKind::Integer => "integer",
            NumericKind::Float => "float",
            NumericKind::NaN => "nan",
            NumericKind::PosInf => "inf",
            NumericKind::NegInf => "-inf",
        }
    }
}

/// How an integer is fitted into a machine width.
///
/// There is no implicit default at conversion sites: callers name the mode.
/// `Checked` is what typed declarations and `narrow` use; `Wrap` is only
/// reached through explicit wrapping conversions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum NarrowMode {
    /// Fail with [`NumError::Overflow`] when the value is out of range.
    #[default]
    Checked,
    /// Two's-complement modular reduction into the width.
    Wrap,
}

/// A machine integer width (1 to 128 bits, signed or unsigned).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntWidth {
    bits: u8,
    signed: bool,
}

impl IntWidth {
    pub const I8: IntWidth = IntWidth::fixed(8, true);
    pub const I16: IntWidth = IntWidth::fixed(16, true);
    pub const I32: IntWidth = IntWidth::fixed(32, true);
    pub const I64: IntWidth = IntWidth::fixed(64, true);
    pub const I128: IntWidth = IntWidth::fixed(128, true);
    pub const U8: IntWidth = IntWidth::fixed(8, false);
    pub const U16: IntWidth = IntWidth::fixed(16, false);
    pub const U32: IntWidth = IntWidth::fixed(32, false);
    pub const U64: IntWidth = IntWidth::fixed(64, false);
    pub const U128: IntWidth = IntWidth::fixed(128, false);

    const fn fixed(bits: u8, signed: bool) -> Self {
        IntWidth { bits, signed }
    }

    /// `None` unless `1 <= bits <= 128`.
    pub fn new(bits: u32, signed: bool) -> Option<Self> {
        match u8::try_from(bits) {
            Ok(bits @ 1..=128) => Some(IntWidth { bits, signed }),
            _ => None,
        }
    }

    #[inline]
    pub fn bits(self) -> u32 {
        u32::from(self.bits)
    }

    #[inline]
    pub fn is_signed(self) -> bool {
        self.signed
    }

    fn mask(self) -> u128 {
        if self.bits == 128 {
            u128::MAX
        } else {
            (1u128 << self.bits) - 1
        }
    }

    pub fn min(self) -> WideInt {
        if self.signed {
            WideInt::from_u128(1u128 << (self.bits - 1)).negate()
        } else {
            WideInt::ZERO
        }
    }

    pub fn max(self) -> WideInt {
        if self.signed {
            WideInt::from_u128((1u128 << (self.bits - 1)) - 1)
        } else {
            WideInt::from_u128(self.mask())
        }
    }

    pub fn contains(self, value: &WideInt) -> bool {
        *value >= self.min() && *value <= self.max()
    }

    /// Reduce `value` modulo `2^bits` into this width's range.
    pub fn wrap(self, value: &WideInt) -> WideInt {
        let mask = self.mask();
        let mut low = value.low_u128() & mask;
        if value.is_negative() {
            low = low.wrapping_neg() & mask;
        }
        if self.signed && low & (1u128 << (self.bits - 1)) != 0 {
            // High bit set: the value is `low - 2^bits`.
            WideInt::from_u128(low.wrapping_neg() & mask).negate()
        } else {
            WideInt::from_u128(low)
        }
    }

    /// The unsigned bit pattern of `value` in this width.
    pub fn bit_pattern(self, value: &WideInt) -> u128 {
        let wrapped = self.wrap(value);
        if wrapped.is_negative() {
            wrapped.low_u128().wrapping_neg() & self.mask()
        } else {
            wrapped.low_u128()
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.signed {
            write!(f, "int{}", self.bits)
        } else {
            write!(f, "uint{}", self.bits)
        }
    }
}

/// Arbitrary-precision tagged numeric value.
///
/// Integers live either in a native `i64` (`Int`) or in a 256-bit
/// [`WideInt`] (`Wide`). Both represent the same kind; [`Numeric::compress`]
/// moves a wide value into the native form when it fits. `Float` is always
/// finite: non-finite results are normalised into `NaN`, `PosInf`, `NegInf`.
#[derive(Copy, Clone, Debug)]
pub enum Numeric {
    Int(i64),
    Wide(WideInt),
    Float(f64),
    NaN,
    PosInf,
    NegInf,
}

#[derive(Copy, Clone, Debug)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        }
    }
}

impl Numeric {
    pub const ZERO: Numeric = Numeric::Int(0);

    /// Build from a host double, classifying non-finite values.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Numeric::NaN
        } else if value == f64::INFINITY {
            Numeric::PosInf
        } else if value == f64::NEG_INFINITY {
            Numeric::NegInf
        } else {
            Numeric::Float(value)
        }
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            Numeric::Int(_) | Numeric::Wide(_) => NumericKind::Integer,
            Numeric::Float(_) => NumericKind::Float,
            Numeric::NaN => NumericKind::NaN,
            Numeric::PosInf => NumericKind::PosInf,
            Numeric::NegInf => NumericKind::NegInf,
        }
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Numeric::Int(_) | Numeric::Wide(_))
    }

    /// Exact integer value, `None` for every float kind.
    pub fn to_wide(&self) -> Option<WideInt> {
        match *self {
            Numeric::Int(v) => Some(WideInt::from(v)),
            Numeric::Wide(v) => Some(v),
            _ => None,
        }
    }

    /// Native value if this is an integer within `i64` range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(v) => Some(*v),
            Numeric::Wide(v) => v.to_i64(),
            _ => None,
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "float coercion is lossy by definition")]
    pub fn to_f64(&self) -> f64 {
        match self {
            Numeric::Int(v) => *v as f64,
            Numeric::Wide(v) => v.to_f64(),
            Numeric::Float(v) => *v,
            Numeric::NaN => f64::NAN,
            Numeric::PosInf => f64::INFINITY,
            Numeric::NegInf => f64::NEG_INFINITY,
        }
    }

    /// Use the native representation when the integer fits in `i64`;
    /// otherwise return the value unchanged. Idempotent.
    #[must_use]
    pub fn compress(self) -> Self {
        match self {
            Numeric::Wide(v) => v.to_i64().map_or(self, Numeric::Int),
            other => other,
        }
    }

    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Numeric::Int(v) => v.checked_neg().map_or_else(
                || Numeric::Wide(WideInt::from(v).negate()),
                Numeric::Int,
            ),
            Numeric::Wide(v) => Numeric::Wide(v.negate()),
            Numeric::Float(v) => Numeric::Float(-v),
            Numeric::NaN => Numeric::NaN,
            Numeric::PosInf => Numeric::NegInf,
            Numeric::NegInf => Numeric::PosInf,
        }
    }

    pub fn add(self, rhs: Self) -> NumResult<Self> {
        self.arith(rhs, ArithOp::Add)
    }

    pub fn sub(self, rhs: Self) -> NumResult<Self> {
        self.arith(rhs, ArithOp::Sub)
    }

    pub fn mul(self, rhs: Self) -> NumResult<Self> {
        self.arith(rhs, ArithOp::Mul)
    }

    /// Truncating division between integers, float division otherwise.
    pub fn div(self, rhs: Self) -> NumResult<Self> {
        self.arith(rhs, ArithOp::Div)
    }

    /// Truncating remainder between integers, float remainder otherwise.
    pub fn rem(self, rhs: Self) -> NumResult<Self> {
        self.arith(rhs, ArithOp::Rem)
    }

    fn arith(self, rhs: Self, op: ArithOp) -> NumResult<Self> {
        match (self, rhs) {
            (Numeric::Int(a), Numeric::Int(b)) => {
                let native = match op {
                    ArithOp::Add => a.checked_add(b),
                    ArithOp::Sub => a.checked_sub(b),
                    ArithOp::Mul => a.checked_mul(b),
                    ArithOp::Div | ArithOp::Rem if b == 0 => return Err(NumError::DivisionByZero),
                    ArithOp::Div => a.checked_div(b),
                    ArithOp::Rem => a.checked_rem(b),
                };
                match native {
                    Some(v) => Ok(Numeric::Int(v)),
                    None => Self::wide_arith(WideInt::from(a), WideInt::from(b), op),
                }
            }
            _ => match (self.to_wide(), rhs.to_wide()) {
                (Some(a), Some(b)) => Self::wide_arith(a, b, op),
                _ => Ok(Self::float_arith(self.to_f64(), rhs.to_f64(), op)),
            },
        }
    }

    fn wide_arith(a: WideInt, b: WideInt, op: ArithOp) -> NumResult<Self> {
        let result = match op {
            ArithOp::Add => a.checked_add(b),
            ArithOp::Sub => a.checked_sub(b),
            ArithOp::Mul => a.checked_mul(b),
            ArithOp::Div => Some(a.checked_div_rem(b).ok_or(NumError::DivisionByZero)?.0),
            ArithOp::Rem => Some(a.checked_div_rem(b).ok_or(NumError::DivisionByZero)?.1),
        };
        result.map(Numeric::Wide).ok_or_else(|| {
            NumError::overflow(
                format!("{a} {} {b}", op.symbol()),
                format!("{} bits", WideInt::BITS),
            )
        })
    }

    fn float_arith(a: f64, b: f64, op: ArithOp) -> Self {
        Self::from_f64(match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Rem => a % b,
        })
    }

    /// Numeric ordering across kinds; `None` when either side is NaN.
    pub fn cmp_value(&self, other: &Self) -> Option<Ordering> {
        match (self.to_wide(), other.to_wide()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Language-level equality: `1 == 1.0` holds, `nan == nan` does not.
    pub fn value_eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Some(Ordering::Equal)
    }

    /// Fit an integer into `width`.
    pub fn narrow(self, width: IntWidth, mode: NarrowMode) -> NumResult<Self> {
        let Some(value) = self.to_wide() else {
            return Err(NumError::NotInteger(self.to_string()));
        };
        match mode {
            NarrowMode::Checked if !width.contains(&value) => {
                Err(NumError::overflow(value.to_string(), width.to_string()))
            }
            NarrowMode::Checked => Ok(Numeric::Wide(value).compress()),
            NarrowMode::Wrap => Ok(Numeric::Wide(width.wrap(&value)).compress()),
        }
    }

    /// Narrowest of `int64`, `int128`, `uint128` holding this integer.
    pub fn literal_width(&self) -> Option<IntWidth> {
        let value = self.to_wide()?;
        [IntWidth::I64, IntWidth::I128, IntWidth::U128]
            .into_iter()
            .find(|width| width.contains(&value))
    }
}

impl PartialEq for Numeric {
    /// Structural equality: kinds must match, then values compare.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Numeric::Float(a), Numeric::Float(b)) => a == b,
            _ if self.is_integer() && other.is_integer() => self.to_wide() == other.to_wide(),
            _ => !self.is_integer() && self.kind() == other.kind(),
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Int(value)
    }
}

impl From<WideInt> for Numeric {
    fn from(value: WideInt) -> Self {
        Numeric::Wide(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::from_f64(value)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{v}"),
            Numeric::Wide(v) => write!(f, "{v}"),
            Numeric::Float(v) => f.write_str(&to_decimal_scientific(*v, DEFAULT_MAX_DIGITS)),
            Numeric::NaN => f.write_str("nan"),
            Numeric::PosInf => f.write_str("inf"),
            Numeric::NegInf => f.write_str("-inf"),
        }
    }
}
