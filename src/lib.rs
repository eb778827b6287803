//! # Brine
//!
//! Brine is a library of *pickler combinators*: values that describe a binary
//! format once and provide both the encoder and the decoder for it, byte for
//! byte in agreement. Because one [`Pickler`] carries both directions, the
//! read path cannot drift out of sync with the write path — the usual class
//! of hand-rolled serialization bugs is ruled out structurally.
//!
//! # Usage
//!
//! Describe the shape of your data as a composition of primitive codecs, then
//! drive it with [`pickle`] and [`unpickle`]:
//!
//! ```
//! use brine::prelude::*;
//!
//! // a point: two little-endian i32s, nothing else
//! let point = tuple2(int32(), int32());
//!
//! let bytes = pickle(&point, &(3, -4)).unwrap();
//! assert_eq!(unpickle(&point, &bytes).unwrap(), (3, -4));
//! ```
//!
//! User types get a codec by expressing themselves as an isomorphism to a
//! tuple of primitives and wrapping it:
//!
//! ```
//! use brine::prelude::*;
//!
//! #[derive(Debug, PartialEq, Clone)]
//! struct Reading {
//!     sensor: u16,
//!     value: f64,
//! }
//!
//! let reading = wrap(
//!     |(sensor, value)| Reading { sensor, value },
//!     |r: &Reading| (r.sensor, r.value),
//!     tuple2(uint16(), float64()),
//! );
//!
//! let original = Reading { sensor: 9, value: 0.5 };
//! let bytes = pickle(&reading, &original).unwrap();
//! assert_eq!(unpickle(&reading, &bytes).unwrap(), original);
//! ```
//!
//! Picklers are immutable and cheap to clone; build them once, share them
//! freely (including across threads), and drive them as often as you like.
//!
//! # An overview of the pieces
//!
//! ## Primitives
//!
//! The leaf codecs live in [`primitives`]: fixed-width integers
//! ([`primitives::int8`] through [`primitives::int64`] and their unsigned
//! counterparts), IEEE 754 floats in half, single and double precision,
//! booleans, fixed-width ASCII and length-prefixed UTF-8 text, raw byte
//! strings, arbitrary-precision integers and decimals. All multi-byte layouts
//! are little-endian, always.
//!
//! ## Combinators
//!
//! [`combinators`] holds the pure functions that compose picklers into bigger
//! ones: [`combinators::tuple2`]/[`combinators::tuple3`]/
//! [`combinators::tuple4`] for grouping, [`combinators::list`] and
//! [`combinators::array`] for fixed-count repetition,
//! [`combinators::prefixed`] for self-framing sequences,
//! [`combinators::wrap`] and [`combinators::try_wrap`] for adapting a codec
//! to another type, and [`combinators::choice`] for tagged alternation.
//!
//! ## Driving and I/O
//!
//! [`pickle`] and [`unpickle`] run a pickler against an in-memory buffer.
//! [`adapter::BinaryReader`] layers the same reading machinery over a file or
//! stream, value by value; it is the only corner of the crate that performs
//! I/O.
//!
//! # Specification
//!
//! The exact byte layouts, all little-endian:
//!
//! | codec              | layout                                              |
//! | ------------------ | --------------------------------------------------- |
//! | `intN` / `uintN`   | N/8 bytes, two's complement                         |
//! | `float16/32/64`    | IEEE 754 bits, 2/4/8 bytes                          |
//! | `boolean`          | 1 byte: `0` false, `1` true, anything else malformed|
//! | `ascii(n)`         | exactly n bytes, each below `0x80`                  |
//! | `string`           | `u32` byte length, then UTF-8 bytes                 |
//! | `byte_string`      | `u32` byte length, then the raw bytes               |
//! | `bigint`           | sign byte (`0`/`1`), `u32` digit count, LE digits   |
//! | `decimal`          | `i32` scale, then the unscaled value as a `bigint`  |
//! | `tuple2/3/4`       | the components, left to right                       |
//! | `list` / `array`   | the elements in order, count fixed at composition   |
//! | `prefixed`         | `u32` element count, then the elements              |
//! | `choice`           | `u8` discriminant, then the selected arm            |
//!
//! Every pickler also reports a [`min_size`](Pickler::min_size): the exact
//! width for fixed-width codecs, the prefix width alone for length-prefixed
//! ones. The driver uses it to size buffers up front.
//!
//! # Errors
//!
//! Failures surface as [`errors::PickleError`] values inside a
//! [`failure::Error`]: `Underflow` when the source runs dry mid-read,
//! `Malformed` when bytes decode to nothing valid, `LengthMismatch` when a
//! fixed-count codec meets the wrong count, and `UnknownTag` when a choice
//! discriminant has no arm. Nothing is caught on the way up and no partial
//! result is ever returned.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod adapter;
pub mod buffer;
pub mod combinators;
pub mod decimal;
pub mod errors;
pub mod prelude;
pub mod primitives;
pub mod rep;
mod util;
pub mod vecmap;

use buffer::{Sink, Source};
use failure::Error;
use std::{fmt, sync::Arc};

type WriteFn<T> = dyn Fn(&T, &mut Sink) -> Result<(), Error> + Send + Sync;
type ReadFn<T> = dyn Fn(&mut Source) -> Result<T, Error> + Send + Sync;

/// A composable descriptor bundling matched encode and decode logic for one
/// type.
///
/// A `Pickler<T>` knows how to append a `T` to a [`Sink`], how to read one
/// back off a [`Source`], and the minimum number of bytes either operation
/// touches. It holds no mutable state: it only *describes* the two
/// algorithms, and does nothing until a driver runs it.
///
/// Leaves come from [`Pickler::primitive`]; everything else comes out of the
/// [`combinators`] module. If the leaves round-trip, so does every pickler
/// composed from them.
pub struct Pickler<T> {
    write: Arc<WriteFn<T>>,
    read: Arc<ReadFn<T>>,
    min_size: usize,
}

impl<T> Clone for Pickler<T> {
    fn clone(&self) -> Pickler<T> {
        Pickler {
            write: self.write.clone(),
            read: self.read.clone(),
            min_size: self.min_size,
        }
    }
}

impl<T> fmt::Debug for Pickler<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pickler")
            .field("min_size", &self.min_size)
            .finish()
    }
}

impl<T> Pickler<T> {
    /// Builds a leaf pickler directly from a write/read pair.
    ///
    /// The two functions must agree: whatever bytes `write` appends for a
    /// value, `read` must consume exactly and reproduce the value from. Every
    /// primitive codec in this crate is built this way.
    ///
    /// # Arguments
    ///
    /// * `write` - Appends a value's encoding to the sink.
    /// * `read` - Consumes one encoding from the source and decodes it.
    /// * `min_size` - Lower bound, in bytes, on what one value occupies.
    pub fn primitive<W, R>(write: W, read: R, min_size: usize) -> Pickler<T>
    where
        W: Fn(&T, &mut Sink) -> Result<(), Error> + Send + Sync + 'static,
        R: Fn(&mut Source) -> Result<T, Error> + Send + Sync + 'static,
    {
        Pickler {
            write: Arc::new(write),
            read: Arc::new(read),
            min_size,
        }
    }

    /// Lower bound on the number of bytes one value of this pickler reads or
    /// writes. Exact for fixed-width codecs; for length-prefixed ones it
    /// covers the prefix alone.
    pub fn min_size(&self) -> usize { self.min_size }

    /// Appends `value`'s encoding to `out`.
    pub fn write_to(&self, value: &T, out: &mut Sink) -> Result<(), Error> {
        (self.write)(value, out)
    }

    /// Reads one value, advancing `src` past its encoding.
    pub fn read_from(&self, src: &mut Source) -> Result<T, Error> { (self.read)(src) }
}

/// Serializes `value` into a fresh byte buffer.
///
/// The sink is allocated here, sized by the pickler's
/// [`min_size`](Pickler::min_size), and returned whole: the caller never
/// observes a partial write. For picklers made purely of infallible
/// conversions this cannot fail; fallible [`combinators::try_wrap`] or
/// [`combinators::choice`] writes propagate their errors verbatim.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let bytes = pickle(&int32(), &64).unwrap();
/// assert_eq!(bytes, vec![64, 0, 0, 0]);
/// ```
pub fn pickle<T>(p: &Pickler<T>, value: &T) -> Result<Vec<u8>, Error> {
    let mut out = Sink::with_capacity(p.min_size());
    p.write_to(value, &mut out)?;
    Ok(out.finalize())
}

/// Deserializes a value from the front of `bytes`.
///
/// Trailing unconsumed bytes are *not* an error — a pickler may describe just
/// a prefix of a larger stream. Running out of bytes mid-read is; see
/// [`errors::PickleError`].
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let n: i32 = unpickle(&int32(), &[64, 0, 0, 0]).unwrap();
/// assert_eq!(n, 64);
/// ```
pub fn unpickle<T>(p: &Pickler<T>, bytes: &[u8]) -> Result<T, Error> {
    let mut src = Source::from_slice(bytes);
    p.read_from(&mut src)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn pickling_is_deterministic() {
        let p = tuple2(int32(), string());
        let v = (99, "determinism".to_owned());
        assert_eq!(pickle(&p, &v).unwrap(), pickle(&p, &v).unwrap());
    }

    #[test]
    fn trailing_bytes_are_not_an_error() {
        let mut bytes = pickle(&int16(), &5).unwrap();
        bytes.extend_from_slice(&[0xff; 4]);
        assert_eq!(unpickle(&int16(), &bytes).unwrap(), 5);
    }

    #[test]
    fn picklers_are_reusable() {
        let p = string();
        for s in &["one", "two", "three"] {
            let out = pickle(&p, &s.to_string()).unwrap();
            assert_eq!(unpickle(&p, &out).unwrap(), *s);
        }
    }

    #[test]
    fn min_sizes_compose() {
        assert_eq!(int32().min_size(), 4);
        assert_eq!(tuple3(int8(), int16(), float64()).min_size(), 11);
        assert_eq!(string().min_size(), 4);
        assert_eq!(list(int64(), 3).min_size(), 24);
    }
}
