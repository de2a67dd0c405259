//! Bit-set and byte-level primitives for the vantage replication engine.
//!
//! This crate provides [`BitSet`] for per-slot presence and change tracking,
//! and [`ByteWriter`] / [`ByteReader`] for little-endian wire encoding.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads and bit indexes are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about entities, observers, or slots.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitSet, ByteReader, ByteWriter};
//!
//! let mut bits = BitSet::new(40);
//! bits.set(3).unwrap();
//! bits.set(33).unwrap();
//! assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![3, 33]);
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u8(7);
//! writer.write_u32(0xDEAD_BEEF);
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u8().unwrap(), 7);
//! assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
//! ```

mod bitset;
mod error;
mod reader;
mod writer;

pub use bitset::{BitSet, Ones};
pub use error::{BitError, BitResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let reader = ByteReader::new(&bytes);
        assert!(reader.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);
        writer.write_u16(0xBEEF);
        writer.write_i32(-42);
        writer.write_f32(12.5);
        writer.write_u64(0x0102_0304_0506_0708);
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_i32().unwrap(), -42);
        assert_eq!(reader.read_f32().unwrap(), 12.5);
        assert_eq!(reader.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert!(reader.is_empty());
    }

    #[test]
    fn bitset_words_feed_writer() {
        let mut bits = BitSet::new(64);
        bits.set(0).unwrap();
        bits.set(63).unwrap();

        let mut writer = ByteWriter::new();
        for word in bits.words() {
            writer.write_u32(*word);
        }
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0x01, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn doctest_example() {
        let mut bits = BitSet::new(40);
        bits.set(3).unwrap();
        bits.set(33).unwrap();
        assert_eq!(bits.count_ones(), 2);
        assert_eq!(bits.highest_set(), Some(33));
    }
}
