//! Common imports, in one place.

pub use crate::{
    adapter::{write_file, BinaryReader},
    buffer::{Sink, Source},
    combinators::{array, choice, list, prefixed, try_wrap, tuple2, tuple3, tuple4, wrap},
    decimal::Decimal,
    errors::PickleError,
    pickle,
    primitives::{
        ascii, bigint, boolean, byte_string, decimal, float16, float32, float64, int16, int32,
        int64, int8, string, uint16, uint32, uint64, uint8,
    },
    rep::Picklable,
    unpickle, Pickler,
};
pub use bytes::Bytes;
pub use failure::Error;
pub use half::f16;
pub use num_bigint::BigInt;
