//! The primitive codec set.
//!
//! Every codec here is a leaf built with [`Pickler::primitive`] over a fixed,
//! documented little-endian layout; see the crate-level specification section
//! for the exact byte shapes. Fixed-width kinds report their exact width as
//! the minimum byte count; length-prefixed kinds report the prefix width
//! alone, since the true size is only known once the prefix has been read.

use crate::{
    buffer::{Sink, Source},
    decimal::Decimal,
    errors::PickleError,
    Pickler,
};
use bytes::Bytes;
use failure::Error;
use half::f16;
use num_bigint::{BigInt, Sign};

/// Width in bytes of the `u32` prefix carried by length-prefixed codecs.
pub(crate) const LEN_WIDTH: usize = 4;

pub(crate) fn put_len(out: &mut Sink, len: usize) -> Result<(), Error> {
    if len > u32::max_value() as usize {
        return Err(PickleError::LengthMismatch {
            expected: u32::max_value() as usize,
            found: len,
        }
        .into());
    }
    out.put_slice(&u32::to_le_bytes(len as u32));
    Ok(())
}

pub(crate) fn take_len(src: &mut Source) -> Result<usize, Error> {
    let bs = src.take_slice(LEN_WIDTH)?;
    let mut digs = [0u8; LEN_WIDTH];
    digs.copy_from_slice(&bs);
    Ok(u32::from_le_bytes(digs) as usize)
}

macro_rules! fixed_int {
    ($name:ident, $t:ty, $width:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $name() -> Pickler<$t> {
            Pickler::primitive(
                |v: &$t, out: &mut Sink| {
                    out.put_slice(&v.to_le_bytes());
                    Ok(())
                },
                |src: &mut Source| {
                    let bs = src.take_slice($width)?;
                    let mut digs = [0u8; $width];
                    digs.copy_from_slice(&bs);
                    Ok(<$t>::from_le_bytes(digs))
                },
                $width,
            )
        }
    };
}

fixed_int!(int8, i8, 1, "Codec for [`i8`]: one byte, two's complement.");
fixed_int!(int16, i16, 2, "Codec for [`i16`]: two bytes, little-endian.");
fixed_int!(int32, i32, 4, "Codec for [`i32`]: four bytes, little-endian.");
fixed_int!(int64, i64, 8, "Codec for [`i64`]: eight bytes, little-endian.");
fixed_int!(uint8, u8, 1, "Codec for [`u8`]: one byte.");
fixed_int!(uint16, u16, 2, "Codec for [`u16`]: two bytes, little-endian.");
fixed_int!(uint32, u32, 4, "Codec for [`u32`]: four bytes, little-endian.");
fixed_int!(uint64, u64, 8, "Codec for [`u64`]: eight bytes, little-endian.");

/// Codec for [`f16`]: two bytes of IEEE 754 half-precision bits,
/// little-endian.
pub fn float16() -> Pickler<f16> {
    Pickler::primitive(
        |v: &f16, out: &mut Sink| {
            out.put_slice(&u16::to_le_bytes(v.to_bits()));
            Ok(())
        },
        |src: &mut Source| {
            let bs = src.take_slice(2)?;
            let mut digs = [0u8; 2];
            digs.copy_from_slice(&bs);
            Ok(f16::from_bits(u16::from_le_bytes(digs)))
        },
        2,
    )
}

/// Codec for [`f32`]: four bytes of IEEE 754 single-precision bits,
/// little-endian.
///
/// This is a genuine single-precision codec; it never widens through [`f64`].
pub fn float32() -> Pickler<f32> {
    Pickler::primitive(
        |v: &f32, out: &mut Sink| {
            out.put_slice(&u32::to_le_bytes(v.to_bits()));
            Ok(())
        },
        |src: &mut Source| {
            let bs = src.take_slice(4)?;
            let mut digs = [0u8; 4];
            digs.copy_from_slice(&bs);
            Ok(f32::from_bits(u32::from_le_bytes(digs)))
        },
        4,
    )
}

/// Codec for [`f64`]: eight bytes of IEEE 754 double-precision bits,
/// little-endian.
pub fn float64() -> Pickler<f64> {
    Pickler::primitive(
        |v: &f64, out: &mut Sink| {
            out.put_slice(&u64::to_le_bytes(v.to_bits()));
            Ok(())
        },
        |src: &mut Source| {
            let bs = src.take_slice(8)?;
            let mut digs = [0u8; 8];
            digs.copy_from_slice(&bs);
            Ok(f64::from_bits(u64::from_le_bytes(digs)))
        },
        8,
    )
}

/// Codec for [`bool`]: one byte, `0` for false and `1` for true. Any other
/// byte is malformed.
pub fn boolean() -> Pickler<bool> {
    Pickler::primitive(
        |v: &bool, out: &mut Sink| {
            out.put_u8(*v as u8);
            Ok(())
        },
        |src: &mut Source| {
            let at = src.position();
            match src.take_byte()? {
                0 => Ok(false),
                1 => Ok(true),
                b => Err(PickleError::Malformed {
                    kind: "bool",
                    at,
                    reason: format!("byte {:#04x} is not a boolean", b),
                }
                .into()),
            }
        },
        1,
    )
}

/// Codec for fixed-width ASCII text: exactly `width` bytes, no framing.
///
/// Writing fails with a length mismatch when the text is not exactly `width`
/// bytes long, and as malformed when it contains non-ASCII characters.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let tag = ascii(4);
///
/// let bytes = pickle(&tag, &"GOLD".to_owned()).unwrap();
/// assert_eq!(bytes, b"GOLD");
/// ```
pub fn ascii(width: usize) -> Pickler<String> {
    Pickler::primitive(
        move |v: &String, out: &mut Sink| {
            if v.len() != width {
                return Err(PickleError::LengthMismatch {
                    expected: width,
                    found: v.len(),
                }
                .into());
            }
            if !v.is_ascii() {
                return Err(PickleError::Malformed {
                    kind: "ascii",
                    at: out.len(),
                    reason: "text contains non-ASCII characters".to_owned(),
                }
                .into());
            }
            out.put_slice(v.as_bytes());
            Ok(())
        },
        move |src: &mut Source| {
            let at = src.position();
            let bs = src.take_slice(width)?;
            if !bs.is_ascii() {
                return Err(PickleError::Malformed {
                    kind: "ascii",
                    at,
                    reason: "bytes are not ASCII".to_owned(),
                }
                .into());
            }
            // every byte is below 0x80, so nothing is ever replaced here
            Ok(String::from_utf8_lossy(&bs).into_owned())
        },
        width,
    )
}

/// Codec for length-prefixed UTF-8 text: a `u32` byte length, then the bytes.
pub fn string() -> Pickler<String> {
    Pickler::primitive(
        |v: &String, out: &mut Sink| {
            put_len(out, v.len())?;
            out.put_slice(v.as_bytes());
            Ok(())
        },
        |src: &mut Source| {
            let len = take_len(src)?;
            let at = src.position();
            let bs = src.take_slice(len)?;
            match String::from_utf8(bs.to_vec()) {
                Ok(s) => Ok(s),
                Err(e) => Err(PickleError::Malformed {
                    kind: "utf-8",
                    at,
                    reason: e.to_string(),
                }
                .into()),
            }
        },
        LEN_WIDTH,
    )
}

/// Codec for length-prefixed raw bytes: a `u32` byte length, then the bytes
/// themselves, uninterpreted.
pub fn byte_string() -> Pickler<Bytes> {
    Pickler::primitive(
        |v: &Bytes, out: &mut Sink| {
            put_len(out, v.len())?;
            out.put_slice(v);
            Ok(())
        },
        |src: &mut Source| {
            let len = take_len(src)?;
            src.take_slice(len)
        },
        LEN_WIDTH,
    )
}

/// Codec for [`BigInt`]: a sign byte (`0` non-negative, `1` negative), a
/// `u32` digit count, then the magnitude digits in little-endian order.
pub fn bigint() -> Pickler<BigInt> {
    Pickler::primitive(
        |v: &BigInt, out: &mut Sink| {
            let (sign, digs) = v.to_bytes_le();
            out.put_u8((sign == Sign::Minus) as u8);
            put_len(out, digs.len())?;
            out.put_slice(&digs);
            Ok(())
        },
        |src: &mut Source| {
            let at = src.position();
            let sign = match src.take_byte()? {
                0 => Sign::Plus,
                1 => Sign::Minus,
                b => {
                    return Err(PickleError::Malformed {
                        kind: "bigint",
                        at,
                        reason: format!("byte {:#04x} is not a sign", b),
                    }
                    .into());
                }
            };
            let len = take_len(src)?;
            let digs = src.take_slice(len)?;
            Ok(BigInt::from_bytes_le(sign, &digs))
        },
        5,
    )
}

/// Codec for [`Decimal`]: an `i32` scale, then the unscaled digits in the
/// [`bigint`] layout.
pub fn decimal() -> Pickler<Decimal> {
    let scale_w = int32();
    let scale_r = scale_w.clone();
    let digs_w = bigint();
    let digs_r = digs_w.clone();
    Pickler::primitive(
        move |v: &Decimal, out: &mut Sink| {
            scale_w.write_to(&v.scale(), out)?;
            digs_w.write_to(v.unscaled(), out)
        },
        move |src: &mut Source| {
            let scale = scale_r.read_from(src)?;
            let unscaled = digs_r.read_from(src)?;
            Ok(Decimal::new(unscaled, scale))
        },
        9,
    )
}
