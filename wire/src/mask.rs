//! Update-mask codec.
//!
//! A mask is `block_count: u8` followed by that many little-endian `u32`
//! blocks; bit `i` of the mask is bit `i % 32` of block `i / 32`.

use bitstream::{BitSet, ByteReader, ByteWriter};

use crate::error::{check_limit, DecodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Largest block count the one-byte prefix can carry.
pub const MAX_MASK_BLOCKS: usize = u8::MAX as usize;

/// Number of blocks the encoder emits for `mask`.
///
/// Trailing all-zero blocks are never emitted; an empty mask has zero blocks.
#[must_use]
pub fn mask_block_count(mask: &BitSet) -> usize {
    mask.highest_set().map_or(0, |highest| highest / 32 + 1)
}

/// Writes `mask` to `writer`.
///
/// # Panics
///
/// Panics if the mask needs more than [`MAX_MASK_BLOCKS`] blocks; layouts
/// are validated to stay below that.
pub fn encode_mask(mask: &BitSet, writer: &mut ByteWriter) {
    let blocks = mask_block_count(mask);
    assert!(
        blocks <= MAX_MASK_BLOCKS,
        "update mask needs {blocks} blocks, at most {MAX_MASK_BLOCKS} fit"
    );
    writer.write_u8(u8::try_from(blocks).unwrap_or(u8::MAX));
    for word in &mask.words()[..blocks] {
        writer.write_u32(*word);
    }
}

/// Encoded size of `mask` in bytes.
#[must_use]
pub fn encoded_mask_len(mask: &BitSet) -> usize {
    1 + mask_block_count(mask) * 4
}

/// Reads a mask.
///
/// With `slot_count` set, the returned set has exactly that length and any
/// set bit at or past it is rejected; without it the length is the declared
/// block count times 32.
pub fn decode_mask(
    reader: &mut ByteReader<'_>,
    limits: &Limits,
    slot_count: Option<usize>,
) -> WireResult<BitSet> {
    let blocks = usize::from(reader.read_u8()?);
    check_limit(LimitKind::MaskBlocks, limits.max_mask_blocks, blocks)?;

    let mut words = Vec::with_capacity(blocks);
    for _ in 0..blocks {
        words.push(reader.read_u32()?);
    }

    let len = slot_count.unwrap_or(blocks * 32);
    if let Some(highest) = highest_bit(&words) {
        if highest >= len {
            return Err(DecodeError::MaskBitBeyondCount {
                bit: highest,
                count: len,
            });
        }
    }
    let used = words.len().min(len.div_ceil(32));
    Ok(BitSet::from_words(len, &words[..used])?)
}

fn highest_bit(words: &[u32]) -> Option<usize> {
    words
        .iter()
        .rposition(|word| *word != 0)
        .map(|idx| idx * 32 + (31 - words[idx].leading_zeros() as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_of(len: usize, bits: &[usize]) -> BitSet {
        let mut mask = BitSet::new(len);
        for bit in bits {
            mask.set(*bit).unwrap();
        }
        mask
    }

    fn encode(mask: &BitSet) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        encode_mask(mask, &mut writer);
        writer.finish()
    }

    #[test]
    fn empty_mask_is_single_zero_byte() {
        let bytes = encode(&BitSet::new(134));
        assert_eq!(bytes, vec![0]);
    }

    #[test]
    fn trailing_zero_blocks_trimmed() {
        let mask = mask_of(198, &[13, 40]);
        let bytes = encode(&mask);
        assert_eq!(bytes.len(), 1 + 2 * 4);
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..5], &(1u32 << 13).to_le_bytes());
        assert_eq!(&bytes[5..9], &(1u32 << 8).to_le_bytes());
        assert_eq!(encoded_mask_len(&mask), bytes.len());
    }

    #[test]
    fn decode_with_count_restores_length() {
        let mask = mask_of(134, &[0, 31, 32, 133]);
        let bytes = encode(&mask);
        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_mask(&mut reader, &Limits::default(), Some(134)).unwrap();
        assert_eq!(decoded, mask);
        assert!(reader.is_empty());
    }

    #[test]
    fn decode_without_count_uses_block_length() {
        let bytes = encode(&mask_of(134, &[40]));
        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_mask(&mut reader, &Limits::default(), None).unwrap();
        assert_eq!(decoded.bit_len(), 64);
        assert_eq!(decoded.iter_ones().collect::<Vec<_>>(), vec![40]);
    }

    #[test]
    fn decode_rejects_bit_beyond_count() {
        let bytes = encode(&mask_of(64, &[50]));
        let mut reader = ByteReader::new(&bytes);
        let err = decode_mask(&mut reader, &Limits::default(), Some(40)).unwrap_err();
        assert_eq!(err, DecodeError::MaskBitBeyondCount { bit: 50, count: 40 });
    }

    #[test]
    fn decode_tolerates_zero_padding_blocks() {
        let bytes = [3, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_mask(&mut reader, &Limits::default(), Some(16)).unwrap();
        assert_eq!(decoded.iter_ones().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn decode_enforces_block_limit() {
        let bytes = [9u8; 40];
        let mut reader = ByteReader::new(&bytes);
        let err = decode_mask(&mut reader, &Limits::for_testing(), None).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::MaskBlocks,
                ..
            }
        ));
    }

    #[test]
    fn decode_truncated_fails() {
        let bytes = [2, 1, 0, 0, 0, 1];
        let mut reader = ByteReader::new(&bytes);
        let err = decode_mask(&mut reader, &Limits::default(), None).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated(_)));
    }
}
