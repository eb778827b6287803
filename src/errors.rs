//! Errors raised while pickling or unpickling.
//!
//! Combinators never catch errors from their children: any failure below
//! aborts the whole call and reaches the caller verbatim, carrying the byte
//! offset where one was available.

use failure::Fail;

#[derive(Clone, Debug, PartialEq, Eq, Fail)]
/// A pickle or unpickle failure.
///
/// Driver results carry a [`failure::Error`]; downcast to this type to inspect
/// the failure kind.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let err = unpickle(&int32(), &[1, 2]).unwrap_err();
///
/// match err.downcast_ref::<PickleError>() {
///     Some(PickleError::Underflow { .. }) => {}
///     other => panic!("expected an underflow, got {:?}", other),
/// }
/// ```
pub enum PickleError {
    /// The source ran out of bytes before a codec finished reading.
    #[fail(
        display = "source underflow at offset {}: needed {} byte(s), {} remained",
        at, needed, remaining
    )]
    Underflow {
        /// Offset at which the read began.
        at: usize,
        /// Bytes the codec asked for.
        needed: usize,
        /// Bytes that were actually left.
        remaining: usize,
    },

    /// Bytes were present but did not form a valid encoding of the target
    /// kind.
    #[fail(display = "malformed {} at offset {}: {}", kind, at, reason)]
    Malformed {
        /// Name of the codec kind that rejected the bytes.
        kind: &'static str,
        /// Offset at which the rejected bytes began.
        at: usize,
        /// What was wrong with them.
        reason: String,
    },

    /// A fixed-count codec was driven with the wrong number of elements, or a
    /// count could not be represented in its length prefix.
    #[fail(display = "length mismatch: expected {}, found {}", expected, found)]
    LengthMismatch {
        /// The count the codec was composed with.
        expected: usize,
        /// The count it was driven with.
        found: usize,
    },

    /// A choice discriminant mapped to no known arm.
    #[fail(display = "unknown tag {:#04x} at offset {}", tag, at)]
    UnknownTag {
        /// The discriminant that had no arm.
        tag: u8,
        /// Offset of the discriminant byte.
        at: usize,
    },
}
