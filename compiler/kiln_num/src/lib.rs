//! Kiln Num - Arbitrary-precision numeric values for literal handling and
//! constant folding.
//!
//! This crate contains the numeric model shared by the lexer, the preprocessor
//! evaluator, and the analysis passes:
//! - [`WideInt`]: 256-bit signed-magnitude integer, wide enough for every
//!   128-bit machine integer plus carry headroom
//! - [`Numeric`]: tagged integer-or-float value (the "NV")
//! - [`parse_literal`] / [`parse_parts`]: literal text to [`Numeric`]
//! - [`to_text`] / [`to_decimal_scientific`]: [`Numeric`] back to text
//!
//! # Design Philosophy
//!
//! - **Exact integers**: integer arithmetic never loses precision; anything
//!   that would exceed 256 bits is an [`NumError::Overflow`].
//! - **Explicit narrowing**: converting to a machine width always names a
//!   [`NarrowMode`]; there is no silent truncation.
//! - **Immutable values**: every operation returns a new value.

mod error;
mod literal;
mod numeric;
mod radix;
mod wide;

pub use error::{NumError, NumResult};
pub use literal::{parse_in_radix, parse_literal, parse_parts, split_literal, LiteralParts, Radix};
pub use numeric::{IntWidth, NarrowMode, Numeric, NumericKind};
pub use radix::{to_decimal_scientific, to_text, DEFAULT_MAX_DIGITS};
pub use wide::WideInt;
