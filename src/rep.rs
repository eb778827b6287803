//! Canonical picklers for ordinary Rust types.
//!
//! [`Picklable`] names the one obvious pickler for a type, so call sites that
//! do not compose anything exotic can stay short: numbers, text, tuples and
//! vectors of such all know how to pickle themselves.

use crate::{
    combinators::{prefixed, tuple2, tuple3, tuple4},
    decimal::Decimal,
    pickle,
    primitives::*,
    unpickle, Pickler,
};
use bytes::Bytes;
use failure::Error;
use half::f16;
use num_bigint::BigInt;

/// A type with a canonical pickler.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let bytes = (1u8, "two".to_owned()).pickled().unwrap();
///
/// let back = <(u8, String)>::unpickled(&bytes).unwrap();
/// assert_eq!(back, (1, "two".to_owned()));
/// ```
pub trait Picklable: Sized + 'static {
    /// The canonical pickler for this type.
    fn pickler() -> Pickler<Self>;

    /// Pickles the value with the canonical pickler.
    fn pickled(&self) -> Result<Vec<u8>, Error> { pickle(&Self::pickler(), self) }

    /// Unpickles a value with the canonical pickler.
    fn unpickled(bytes: &[u8]) -> Result<Self, Error> { unpickle(&Self::pickler(), bytes) }
}

macro_rules! picklable {
    ($t:ty, $f:path) => {
        impl Picklable for $t {
            fn pickler() -> Pickler<$t> { $f() }
        }
    };
}

picklable!(i8, int8);
picklable!(i16, int16);
picklable!(i32, int32);
picklable!(i64, int64);
picklable!(u8, uint8);
picklable!(u16, uint16);
picklable!(u32, uint32);
picklable!(u64, uint64);
picklable!(f16, float16);
picklable!(f32, float32);
picklable!(f64, float64);
picklable!(bool, boolean);
picklable!(String, string);
picklable!(Bytes, byte_string);
picklable!(BigInt, bigint);
picklable!(Decimal, decimal);

impl<T: Picklable> Picklable for Vec<T> {
    fn pickler() -> Pickler<Vec<T>> { prefixed(T::pickler()) }
}

macro_rules! picklable_tuple {
    ($comb:path, $($t:ident),+) => {
        impl<$($t: Picklable),+> Picklable for ($($t,)+) {
            fn pickler() -> Pickler<Self> { $comb($($t::pickler()),+) }
        }
    };
}

picklable_tuple!(tuple2, A, B);
picklable_tuple!(tuple3, A, B, C);
picklable_tuple!(tuple4, A, B, C, D);
