//! Fixed 256-bit signed-magnitude integer.
//!
//! Wide enough to hold every `int128`/`uint128` value with a full 128 bits
//! of headroom for carries in intermediate arithmetic. All arithmetic is
//! checked: results that need more than 256 magnitude bits return `None`.

use std::cmp::Ordering;
use std::fmt;

const LIMBS: usize = 4;

/// Little-endian magnitude limbs.
type Mag = [u64; LIMBS];

/// 256-bit signed-magnitude integer.
///
/// Invariant: zero is never negative, so derived equality and hashing are
/// value-based.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct WideInt {
    negative: bool,
    mag: Mag,
}

impl WideInt {
    /// Magnitude bits available.
    pub const BITS: u32 = 256;

    pub const ZERO: WideInt = WideInt {
        negative: false,
        mag: [0; LIMBS],
    };

    pub const ONE: WideInt = WideInt {
        negative: false,
        mag: [1, 0, 0, 0],
    };

    #[inline]
    fn from_parts(negative: bool, mag: Mag) -> Self {
        let zero = mag.iter().all(|&limb| limb == 0);
        WideInt {
            negative: negative && !zero,
            mag,
        }
    }

    #[expect(clippy::cast_possible_truncation, reason = "splitting u128 into limbs")]
    pub fn from_u128(value: u128) -> Self {
        Self::from_parts(false, [value as u64, (value >> 64) as u64, 0, 0])
    }

    pub fn from_i128(value: i128) -> Self {
        let magnitude = Self::from_u128(value.unsigned_abs());
        Self::from_parts(value < 0, magnitude.mag)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mag.iter().all(|&limb| limb == 0)
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::from_parts(!self.negative, self.mag)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self::from_parts(false, self.mag)
    }

    /// Number of significant magnitude bits (0 for zero).
    pub fn bit_len(&self) -> u32 {
        for (i, &limb) in self.mag.iter().enumerate().rev() {
            if limb != 0 {
                #[expect(clippy::cast_possible_truncation, reason = "i < 4")]
                let base = (i as u32) * 64;
                return base + 64 - limb.leading_zeros();
            }
        }
        0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        if self.negative == rhs.negative {
            return mag_add(&self.mag, &rhs.mag).map(|mag| Self::from_parts(self.negative, mag));
        }
        // Opposite signs: subtract the smaller magnitude from the larger.
        match mag_cmp(&self.mag, &rhs.mag) {
            Ordering::Less => Some(Self::from_parts(rhs.negative, mag_sub(&rhs.mag, &self.mag).0)),
            _ => Some(Self::from_parts(self.negative, mag_sub(&self.mag, &rhs.mag).0)),
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs.negate())
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        mag_mul(&self.mag, &rhs.mag).map(|mag| Self::from_parts(self.negative != rhs.negative, mag))
    }

    /// Truncating division: the quotient rounds toward zero and the
    /// remainder takes the sign of the dividend. `None` on a zero divisor.
    pub fn checked_div_rem(self, rhs: Self) -> Option<(Self, Self)> {
        if rhs.is_zero() {
            return None;
        }
        let (quot, rem) = mag_div_rem(&self.mag, &rhs.mag);
        Some((
            Self::from_parts(self.negative != rhs.negative, quot),
            Self::from_parts(self.negative, rem),
        ))
    }

    /// `self * mul + add` on the magnitude, keeping the sign.
    ///
    /// The digit accumulation step of literal parsing.
    pub fn checked_mul_add_small(self, mul: u32, add: u32) -> Option<Self> {
        mag_mul_small(&self.mag, u64::from(mul), u64::from(add))
            .map(|mag| Self::from_parts(self.negative, mag))
    }

    /// `base^exp`, or `None` past 256 bits. Builds large test fixtures.
    #[cfg(test)]
    pub(crate) fn checked_pow(base: u32, exp: u32) -> Option<Self> {
        let mut acc = Self::ONE;
        for _ in 0..exp {
            acc = acc.checked_mul_add_small(base, 0)?;
        }
        Some(acc)
    }

    /// Divide the magnitude by a small divisor, returning the magnitude
    /// quotient (sign preserved) and the remainder digit.
    pub(crate) fn div_rem_small(self, divisor: u32) -> (Self, u32) {
        let (quot, rem) = mag_div_rem_small(&self.mag, u64::from(divisor));
        #[expect(clippy::cast_possible_truncation, reason = "remainder < divisor")]
        (Self::from_parts(self.negative, quot), rem as u32)
    }

    /// Low 128 bits of the magnitude (sign ignored).
    pub fn low_u128(&self) -> u128 {
        u128::from(self.mag[0]) | (u128::from(self.mag[1]) << 64)
    }

    pub fn to_i64(&self) -> Option<i64> {
        if self.bit_len() > 64 {
            return None;
        }
        let magnitude = i128::from(self.mag[0]);
        let value = if self.negative { -magnitude } else { magnitude };
        i64::try_from(value).ok()
    }

    pub fn to_i128(&self) -> Option<i128> {
        if self.bit_len() > 128 {
            return None;
        }
        let magnitude = self.low_u128();
        if self.negative {
            if magnitude == 1u128 << 127 {
                return Some(i128::MIN);
            }
            i128::try_from(magnitude).ok().map(|m| -m)
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.negative || self.bit_len() > 128 {
            return None;
        }
        Some(self.low_u128())
    }

    /// Nearest `f64` (rounding may occur above 2^53).
    #[expect(clippy::cast_precision_loss, reason = "float coercion is lossy by definition")]
    pub fn to_f64(&self) -> f64 {
        const LIMB_SCALE: f64 = 18_446_744_073_709_551_616.0; // 2^64
        let magnitude = self
            .mag
            .iter()
            .rev()
            .fold(0.0_f64, |acc, &limb| acc * LIMB_SCALE + limb as f64);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Render in `radix` (2..=36), lowercase digits, leading `-` when negative.
    pub fn to_str_radix(&self, radix: u32) -> String {
        debug_assert!((2..=36).contains(&radix));
        if self.is_zero() {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        let mut rest = self.abs();
        while !rest.is_zero() {
            let (quot, digit) = rest.div_rem_small(radix);
            digits.push(char::from_digit(digit, radix).unwrap_or('?'));
            rest = quot;
        }
        if self.negative {
            digits.push('-');
        }
        digits.iter().rev().collect()
    }
}

impl Ord for WideInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => mag_cmp(&self.mag, &other.mag),
            (true, true) => mag_cmp(&other.mag, &self.mag),
        }
    }
}

impl PartialOrd for WideInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for WideInt {
    fn from(value: i64) -> Self {
        Self::from_i128(i128::from(value))
    }
}

impl From<u64> for WideInt {
    fn from(value: u64) -> Self {
        Self::from_u128(u128::from(value))
    }
}

impl From<i128> for WideInt {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<u128> for WideInt {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::Display for WideInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_radix(10))
    }
}

impl fmt::Debug for WideInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideInt({self})")
    }
}

// Magnitude helpers

fn mag_cmp(a: &Mag, b: &Mag) -> Ordering {
    for i in (0..LIMBS).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

fn mag_add(a: &Mag, b: &Mag) -> Option<Mag> {
    let mut out = [0u64; LIMBS];
    let mut carry = false;
    for i in 0..LIMBS {
        let (sum, c1) = a[i].overflowing_add(b[i]);
        let (sum, c2) = sum.overflowing_add(u64::from(carry));
        out[i] = sum;
        carry = c1 || c2;
    }
    if carry {
        None
    } else {
        Some(out)
    }
}

/// `a - b` modulo 2^256, with the final borrow.
fn mag_sub(a: &Mag, b: &Mag) -> (Mag, bool) {
    let mut out = [0u64; LIMBS];
    let mut borrow = false;
    for i in 0..LIMBS {
        let (diff, b1) = a[i].overflowing_sub(b[i]);
        let (diff, b2) = diff.overflowing_sub(u64::from(borrow));
        out[i] = diff;
        borrow = b1 || b2;
    }
    (out, borrow)
}

#[expect(clippy::cast_possible_truncation, reason = "taking low limb of u128 product")]
fn mag_mul(a: &Mag, b: &Mag) -> Option<Mag> {
    let mut wide = [0u64; LIMBS * 2];
    for i in 0..LIMBS {
        if a[i] == 0 {
            continue;
        }
        let mut carry: u128 = 0;
        for j in 0..LIMBS {
            let cur = u128::from(wide[i + j]) + u128::from(a[i]) * u128::from(b[j]) + carry;
            wide[i + j] = cur as u64;
            carry = cur >> 64;
        }
        let mut k = i + LIMBS;
        while carry != 0 && k < LIMBS * 2 {
            let cur = u128::from(wide[k]) + carry;
            wide[k] = cur as u64;
            carry = cur >> 64;
            k += 1;
        }
    }
    if wide[LIMBS..].iter().any(|&limb| limb != 0) {
        return None;
    }
    let mut out = [0u64; LIMBS];
    out.copy_from_slice(&wide[..LIMBS]);
    Some(out)
}

#[expect(clippy::cast_possible_truncation, reason = "taking low limb of u128 product")]
fn mag_mul_small(a: &Mag, mul: u64, add: u64) -> Option<Mag> {
    let mut out = [0u64; LIMBS];
    let mut carry = u128::from(add);
    for i in 0..LIMBS {
        let cur = u128::from(a[i]) * u128::from(mul) + carry;
        out[i] = cur as u64;
        carry = cur >> 64;
    }
    if carry == 0 {
        Some(out)
    } else {
        None
    }
}

#[expect(clippy::cast_possible_truncation, reason = "quotient limb < 2^64")]
fn mag_div_rem_small(a: &Mag, divisor: u64) -> (Mag, u64) {
    let mut quot = [0u64; LIMBS];
    let mut rem: u128 = 0;
    for i in (0..LIMBS).rev() {
        let cur = (rem << 64) | u128::from(a[i]);
        quot[i] = (cur / u128::from(divisor)) as u64;
        rem = cur % u128::from(divisor);
    }
    (quot, rem as u64)
}

/// Shift-subtract long division. `b` must be non-zero.
fn mag_div_rem(a: &Mag, b: &Mag) -> (Mag, Mag) {
    if mag_cmp(a, b) == Ordering::Less {
        return ([0; LIMBS], *a);
    }
    let mut quot = [0u64; LIMBS];
    let mut rem = [0u64; LIMBS];
    for bit in (0..LIMBS * 64).rev() {
        let overflow = rem[LIMBS - 1] >> 63 == 1;
        for i in (1..LIMBS).rev() {
            rem[i] = (rem[i] << 1) | (rem[i - 1] >> 63);
        }
        rem[0] = (rem[0] << 1) | ((a[bit / 64] >> (bit % 64)) & 1);
        if overflow || mag_cmp(&rem, b) != Ordering::Less {
            rem = mag_sub(&rem, b).0;
            quot[bit / 64] |= 1 << (bit % 64);
        }
    }
    (quot, rem)
}
