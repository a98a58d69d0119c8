//! Fixed-width binary integer I/O over storage streams.
//!
//! The shard codec reads and writes little-endian `i32` values with no
//! delimiters; [`StructWriter`] and [`StructReader`] are thin wrappers
//! that keep that convention in one place.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

/// Writer for fixed-width binary values.
pub struct StructWriter<W: Write> {
    inner: W,
}

impl<W: Write> StructWriter<W> {
    /// Wrap an output stream.
    pub fn new(inner: W) -> Self {
        StructWriter { inner }
    }

    /// Write a little-endian `i32`.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Access the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}

/// Reader for fixed-width binary values.
pub struct StructReader<R: Read> {
    inner: R,
}

impl<R: Read> StructReader<R> {
    /// Wrap an input stream.
    pub fn new(inner: R) -> Self {
        StructReader { inner }
    }

    /// Read a little-endian `i32`.
    ///
    /// Hitting end-of-stream surfaces as an `Io` error with
    /// `UnexpectedEof`; callers that know how many values the stream
    /// declared translate that into a corruption error.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_round_trip() {
        let mut writer = StructWriter::new(Vec::new());
        for value in [0, 1, -1, i32::MAX, i32::MIN, 123_456] {
            writer.write_i32(value).unwrap();
        }
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 6 * 4);

        let mut reader = StructReader::new(bytes.as_slice());
        for expected in [0, 1, -1, i32::MAX, i32::MIN, 123_456] {
            assert_eq!(reader.read_i32().unwrap(), expected);
        }
    }

    #[test]
    fn test_read_past_end() {
        let mut reader = StructReader::new([1u8, 2].as_slice());
        assert!(reader.read_i32().is_err());
    }

    #[test]
    fn test_little_endian_layout() {
        let mut writer = StructWriter::new(Vec::new());
        writer.write_i32(0x0403_0201).unwrap();
        assert_eq!(writer.into_inner(), vec![1, 2, 3, 4]);
    }
}
