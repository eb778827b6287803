//! Arbitrary-precision decimal numbers.

use crate::{compose_from, from_fn};
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// An arbitrary-precision decimal, `unscaled * 10^(-scale)`.
///
/// Equality is structural: `2.50` (unscaled 250, scale 2) and `2.5` (unscaled
/// 25, scale 1) denote the same quantity but compare unequal, so a decoded
/// value always compares equal to the exact value that was encoded.
pub struct Decimal {
    unscaled: BigInt,
    scale: i32,
}

impl Decimal {
    /// Creates a decimal from its unscaled digits and scale.
    pub fn new(unscaled: BigInt, scale: i32) -> Decimal { Decimal { unscaled, scale } }

    /// The unscaled digits.
    pub fn unscaled(&self) -> &BigInt { &self.unscaled }

    /// The scale. Positive scales shift the point left, negative ones denote
    /// trailing zeros.
    pub fn scale(&self) -> i32 { self.scale }

    /// Indicates whether the value is zero at any scale.
    pub fn is_zero(&self) -> bool { self.unscaled.is_zero() }

    /// Splits the decimal into its unscaled digits and scale.
    pub fn into_parts(self) -> (BigInt, i32) { (self.unscaled, self.scale) }
}

from_fn!(Decimal, BigInt, |i| Decimal::new(i, 0));

compose_from!(Decimal, BigInt, i32);
compose_from!(Decimal, BigInt, u32);
compose_from!(Decimal, BigInt, i64);
compose_from!(Decimal, BigInt, u64);

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.scale == 0 {
            write!(f, "{}", self.unscaled)
        } else {
            write!(f, "{}e{}", self.unscaled, -(self.scale as i64))
        }
    }
}
