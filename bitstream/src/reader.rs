//! Little-endian byte reader with bounded operations.

use crate::error::{BitError, BitResult};

/// A byte-level reader for decoding little-endian wire data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> BitResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a one-byte boolean; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> BitResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a `u16` (little-endian).
    pub fn read_u16(&mut self) -> BitResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u32` (little-endian).
    pub fn read_u32(&mut self) -> BitResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads an `i32` (little-endian).
    pub fn read_i32(&mut self) -> BitResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u64` (little-endian).
    pub fn read_u64(&mut self) -> BitResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads an `f32` (little-endian IEEE-754).
    pub fn read_f32(&mut self) -> BitResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> BitResult<&'a [u8]> {
        self.ensure(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn ensure(&self, bytes: usize) -> BitResult<()> {
        let available = self.remaining();
        if bytes > available {
            return Err(BitError::UnexpectedEof {
                requested: bytes,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> BitResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(result, Err(BitError::UnexpectedEof { .. })));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_truncated_u32_reports_available() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            BitError::UnexpectedEof {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0, "failed read must not advance");
    }

    #[test]
    fn read_bytes_advances() {
        let mut reader = ByteReader::new(&[9, 8, 7, 6]);
        assert_eq!(reader.read_bytes(3).unwrap(), &[9, 8, 7]);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_bytes(2).is_err());
    }

    #[test]
    fn read_bool_nonzero_is_true() {
        let mut reader = ByteReader::new(&[0, 2]);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
    }
}
