//! Per-observer batch frames.
//!
//! `block_count: u32` · `out_of_range_count: u32` · packed identifiers ·
//! blocks back to back.

use bitstream::{ByteReader, ByteWriter};

use crate::block::{Block, BlockDecoder};
use crate::error::{check_limit, DecodeError, LimitKind, WireResult};
use crate::guid::{read_packed_guid, write_packed_guid};

/// Accumulates already-encoded blocks for one observer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    out_of_range: Vec<u64>,
    blocks: Vec<u8>,
    block_count: u32,
}

impl UpdateBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists `guid` as no longer in range for the observer.
    pub fn push_out_of_range(&mut self, guid: u64) {
        self.out_of_range.push(guid);
    }

    /// Appends an encoded block.
    pub fn push_block(&mut self, bytes: &[u8]) {
        self.blocks.extend_from_slice(bytes);
        self.block_count += 1;
    }

    #[must_use]
    pub const fn block_count(&self) -> u32 {
        self.block_count
    }

    #[must_use]
    pub fn out_of_range(&self) -> &[u64] {
        &self.out_of_range
    }

    /// Returns `true` if the batch carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block_count == 0 && self.out_of_range.is_empty()
    }

    /// Encoded frame size in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        8 + self
            .out_of_range
            .iter()
            .map(|guid| crate::guid::packed_guid_len(*guid))
            .sum::<usize>()
            + self.blocks.len()
    }

    /// Encodes the frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.encoded_len());
        writer.write_u32(self.block_count);
        writer.write_u32(u32::try_from(self.out_of_range.len()).unwrap_or(u32::MAX));
        for guid in &self.out_of_range {
            write_packed_guid(&mut writer, *guid);
        }
        writer.write_bytes(&self.blocks);
        writer.finish()
    }

    /// Drops all content, keeping allocations.
    pub fn clear(&mut self) {
        self.out_of_range.clear();
        self.blocks.clear();
        self.block_count = 0;
    }
}

/// A decoded batch frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBatch {
    pub out_of_range: Vec<u64>,
    pub blocks: Vec<Block>,
}

/// Decodes one batch frame; the whole buffer must be consumed.
pub fn decode_batch(buf: &[u8], decoder: &mut BlockDecoder) -> WireResult<DecodedBatch> {
    let limits = decoder.limits().clone();
    check_limit(LimitKind::BatchBytes, limits.max_batch_bytes, buf.len())?;

    let mut reader = ByteReader::new(buf);
    let block_count = reader.read_u32()? as usize;
    check_limit(LimitKind::BlockCount, limits.max_blocks, block_count)?;
    let out_of_range_count = reader.read_u32()? as usize;
    check_limit(
        LimitKind::OutOfRangeCount,
        limits.max_out_of_range,
        out_of_range_count,
    )?;

    let mut out_of_range = Vec::with_capacity(out_of_range_count);
    for _ in 0..out_of_range_count {
        out_of_range.push(read_packed_guid(&mut reader)?);
    }
    let mut blocks = Vec::with_capacity(block_count);
    for _ in 0..block_count {
        blocks.push(decoder.decode(&mut reader)?);
    }
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }
    Ok(DecodedBatch {
        out_of_range,
        blocks,
    })
}
