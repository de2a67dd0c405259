//! Packed identifier encoding.
//!
//! A presence byte whose bit `i` says byte `i` of the 64-bit identifier is
//! non-zero, followed by only those bytes in ascending order.

use bitstream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, WireResult};

/// Writes `guid` in packed form.
pub fn write_packed_guid(writer: &mut ByteWriter, guid: u64) {
    let bytes = guid.to_le_bytes();
    let mut presence = 0u8;
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte != 0 {
            presence |= 1 << idx;
        }
    }
    writer.write_u8(presence);
    for byte in bytes.iter().filter(|byte| **byte != 0) {
        writer.write_u8(*byte);
    }
}

/// Reads a packed identifier.
///
/// A present byte must be non-zero, so every identifier has exactly one
/// encoding.
pub fn read_packed_guid(reader: &mut ByteReader<'_>) -> WireResult<u64> {
    let presence = reader.read_u8()?;
    let mut bytes = [0u8; 8];
    for (idx, byte) in bytes.iter_mut().enumerate() {
        if presence & (1 << idx) != 0 {
            *byte = reader.read_u8()?;
            if *byte == 0 {
                return Err(DecodeError::NonCanonicalGuid { presence, byte: idx });
            }
        }
    }
    Ok(u64::from_le_bytes(bytes))
}

/// Encoded size of `guid` in packed form.
#[must_use]
pub fn packed_guid_len(guid: u64) -> usize {
    1 + guid.to_le_bytes().iter().filter(|byte| **byte != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(guid: u64) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        write_packed_guid(&mut writer, guid);
        writer.finish()
    }

    #[test]
    fn zero_is_presence_byte_only() {
        assert_eq!(pack(0), vec![0]);
        assert_eq!(packed_guid_len(0), 1);
    }

    #[test]
    fn sparse_bytes_are_skipped() {
        // high part 0xF130 in bytes 6..8, counter 0x2A in byte 0
        let guid = 0xF130_0000_0000_002A;
        assert_eq!(pack(guid), vec![0b1100_0001, 0x2A, 0x30, 0xF1]);
        assert_eq!(packed_guid_len(guid), 4);
    }

    #[test]
    fn read_restores_value() {
        let guid = 0x0102_0000_0500_0006;
        let bytes = pack(guid);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_packed_guid(&mut reader).unwrap(), guid);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_truncated_fails() {
        let mut reader = ByteReader::new(&[0b11, 0x01]);
        assert!(read_packed_guid(&mut reader).is_err());
    }

    #[test]
    fn read_rejects_present_zero_byte() {
        let mut reader = ByteReader::new(&[0b101, 0x07, 0x00]);
        assert_eq!(
            read_packed_guid(&mut reader),
            Err(DecodeError::NonCanonicalGuid {
                presence: 0b101,
                byte: 2
            })
        );
    }
}
