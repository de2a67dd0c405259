//! Little-endian byte writer for encoding wire blocks.

/// A growable little-endian byte writer.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Writes a boolean as one byte (0 or 1).
    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    /// Writes a `u16` (little-endian).
    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `u32` (little-endian).
    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an `i32` (little-endian).
    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `u64` (little-endian).
    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an `f32` (little-endian IEEE-754).
    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert_eq!(writer.len(), 0);
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_u16_is_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0xABCD);
        assert_eq!(writer.finish(), vec![0xCD, 0xAB]);
    }

    #[test]
    fn write_u32_is_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0x1234_5678);
        assert_eq!(writer.finish(), vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn write_i32_negative() {
        let mut writer = ByteWriter::new();
        writer.write_i32(-1);
        assert_eq!(writer.finish(), vec![0xFF; 4]);
    }

    #[test]
    fn write_f32_bits() {
        let mut writer = ByteWriter::new();
        writer.write_f32(1.0);
        assert_eq!(writer.finish(), 1.0f32.to_bits().to_le_bytes().to_vec());
    }

    #[test]
    fn write_bool_as_byte() {
        let mut writer = ByteWriter::new();
        writer.write_bool(true);
        writer.write_bool(false);
        assert_eq!(writer.finish(), vec![1, 0]);
    }

    #[test]
    fn with_capacity() {
        let writer = ByteWriter::with_capacity(100);
        assert_eq!(writer.len(), 0);
    }

    #[test]
    fn finish_into() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);

        let mut buf = vec![0x00, 0x11];
        writer.finish_into(&mut buf);
        assert_eq!(buf, vec![0x00, 0x11, 0xAB]);
    }
}
