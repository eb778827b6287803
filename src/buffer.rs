//! The byte sink and byte source a pickler runs against.
//!
//! A [`Sink`] is owned by a single `pickle` call and a [`Source`] by a single
//! `unpickle` call; neither is ever shared between two drivers at once. Reads
//! advance the source through `&mut self`, so holding on to a stale cursor is
//! a borrow error rather than a runtime surprise.

use crate::errors::PickleError;
use bytes::Bytes;
use failure::Error;

#[derive(Clone, Debug, Default)]
/// An append-only byte buffer that write functions push into.
pub struct Sink {
    buf: Vec<u8>,
}

impl Sink {
    /// Creates an empty sink.
    pub fn new() -> Sink { Sink { buf: Vec::new() } }

    /// Creates an empty sink with room for `cap` bytes.
    pub fn with_capacity(cap: usize) -> Sink {
        Sink {
            buf: Vec::with_capacity(cap),
        }
    }

    /// Appends a single byte.
    pub fn put_u8(&mut self, u: u8) { self.buf.push(u) }

    /// Appends a slice.
    pub fn put_slice(&mut self, slice: &[u8]) { self.buf.extend_from_slice(slice) }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize { self.buf.len() }

    /// Indicates whether anything has been written yet.
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    /// Returns the accumulated bytes.
    pub fn finalize(self) -> Vec<u8> { self.buf }
}

#[derive(Clone, Debug)]
/// A read-only cursor over a byte buffer.
///
/// Every successful read advances the cursor; [`position`](Source::position)
/// reports how many bytes have been consumed so far, which is also the offset
/// decode errors point at.
///
/// # Example
///
/// ```
/// use brine::buffer::Source;
///
/// let mut src = Source::from_slice(&[1, 2, 3]);
///
/// assert_eq!(src.take_byte().unwrap(), 1);
/// assert_eq!(src.position(), 1);
/// assert_eq!(src.remaining(), 2);
/// ```
pub struct Source {
    bytes: Bytes,
    consumed: usize,
}

impl Source {
    /// Creates a source reading from the front of `bytes`.
    pub fn new(bytes: Bytes) -> Source { Source { bytes, consumed: 0 } }

    /// Creates a source over a copy of `slice`.
    pub fn from_slice(slice: &[u8]) -> Source { Source::new(Bytes::copy_from_slice(slice)) }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize { self.consumed }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize { self.bytes.len() }

    /// Indicates whether every byte has been consumed.
    pub fn is_exhausted(&self) -> bool { self.bytes.is_empty() }

    /// Takes the next byte.
    pub fn take_byte(&mut self) -> Result<u8, Error> {
        let bs = self.take_slice(1)?;
        Ok(bs[0])
    }

    /// Takes the next `len` bytes.
    ///
    /// Fails with [`PickleError::Underflow`] when fewer than `len` bytes
    /// remain; the cursor is left where it was.
    pub fn take_slice(&mut self, len: usize) -> Result<Bytes, Error> {
        if self.bytes.len() >= len {
            let out = self.bytes.split_to(len);
            self.consumed += len;
            Ok(out)
        } else {
            Err(PickleError::Underflow {
                at: self.consumed,
                needed: len,
                remaining: self.bytes.len(),
            }
            .into())
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(v: Vec<u8>) -> Source { Source::new(Bytes::from(v)) }
}

impl From<Bytes> for Source {
    fn from(b: Bytes) -> Source { Source::new(b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PickleError;

    #[test]
    fn take_past_the_end_is_an_underflow() {
        let mut src = Source::from_slice(&[1, 2, 3]);
        src.take_slice(2).unwrap();

        let err = src.take_slice(2).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::Underflow {
                at: 2,
                needed: 2,
                remaining: 1,
            }) => {}
            other => panic!("unexpected error: {:?}", other),
        }

        // the failed read must not have moved the cursor
        assert_eq!(src.position(), 2);
        assert_eq!(src.take_byte().unwrap(), 3);
        assert!(src.is_exhausted());
    }

    #[test]
    fn sink_accumulates_in_order() {
        let mut out = Sink::new();
        out.put_u8(1);
        out.put_slice(&[2, 3]);
        assert_eq!(out.len(), 3);
        assert_eq!(out.finalize(), vec![1, 2, 3]);
    }
}
