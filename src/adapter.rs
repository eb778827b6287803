//! Reading and writing pickled values through plain file I/O.
//!
//! This is the only module that touches files or streams; the combinator core
//! works purely over in-memory buffers. Whatever blocking the operating
//! system does happens here and nowhere else.

use crate::{buffer::Source, pickle, Pickler};
use bytes::Bytes;
use failure::Error;
use std::{fs, io::Read, path::Path};

#[derive(Clone, Debug)]
/// Incrementally reads pickled values out of a binary file or stream.
///
/// The reader owns a single [`Source`] cursor for its whole life; successive
/// [`read`](BinaryReader::read) calls pick up exactly where the previous one
/// stopped, so a file laid out as several pickled values in a row can be
/// consumed value by value.
pub struct BinaryReader {
    source: Source,
}

impl BinaryReader {
    /// Opens `path` and wraps its full contents in a source.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BinaryReader, Error> {
        let buf = fs::read(path)?;
        Ok(BinaryReader {
            source: Source::new(Bytes::from(buf)),
        })
    }

    /// Drains `reader` and wraps the bytes in a source.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<BinaryReader, Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(BinaryReader {
            source: Source::new(Bytes::from(buf)),
        })
    }

    /// Reads the next value, leaving the cursor just past its encoding.
    pub fn read<T>(&mut self, p: &Pickler<T>) -> Result<T, Error> {
        p.read_from(&mut self.source)
    }

    /// Skips the next value by reading and discarding it, returning the
    /// number of bytes stepped over.
    pub fn skip<T>(&mut self, p: &Pickler<T>) -> Result<usize, Error> {
        let before = self.source.position();
        p.read_from(&mut self.source)?;
        Ok(self.source.position() - before)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize { self.source.position() }

    /// Bytes left in the underlying buffer.
    pub fn remaining(&self) -> usize { self.source.remaining() }

    /// Indicates whether the whole file has been consumed.
    pub fn is_exhausted(&self) -> bool { self.source.is_exhausted() }
}

/// Pickles `value` and writes the whole buffer to `path` in one shot.
pub fn write_file<T, P: AsRef<Path>>(path: P, p: &Pickler<T>, value: &T) -> Result<(), Error> {
    let buf = pickle(p, value)?;
    fs::write(path, buf)?;
    Ok(())
}
