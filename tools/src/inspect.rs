//! Size accounting for captures and frames.

use serde::Serialize;
use wire::{decode_batch, Block, BlockDecoder, BlockKind, Limits};

use crate::capture::{read_capture, CaptureError};

/// Blocks and bytes of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub blocks: usize,
    pub bytes: usize,
}

/// Accounting for one batch frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub bytes: usize,
    pub out_of_range: usize,
    /// Indexed by block tag.
    pub kinds: [KindReport; BlockKind::ALL.len()],
    /// Attribute words carried by creation and value-update blocks.
    pub values: usize,
}

impl FrameReport {
    fn record(&mut self, block: &Block) {
        let kind = &mut self.kinds[usize::from(block.kind().tag())];
        kind.blocks += 1;
        kind.bytes += block.to_bytes().len();
        if let Block::Create { values, .. } | Block::Values { values, .. } = block {
            self.values += values.len();
        }
    }

    #[must_use]
    pub fn kind(&self, kind: BlockKind) -> KindReport {
        self.kinds[usize::from(kind.tag())]
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.kinds.iter().map(|kind| kind.blocks).sum()
    }

    fn absorb(&mut self, other: &Self) {
        self.bytes += other.bytes;
        self.out_of_range += other.out_of_range;
        self.values += other.values;
        for (total, kind) in self.kinds.iter_mut().zip(other.kinds) {
            total.blocks += kind.blocks;
            total.bytes += kind.bytes;
        }
    }
}

/// Accounting for a whole capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub observer: u64,
    pub frames: Vec<FrameReport>,
    pub totals: FrameReport,
    pub largest_frame: usize,
}

/// Decodes one frame and accounts its blocks; `decoder` carries the
/// categories learned from earlier frames.
pub fn inspect_frame(
    frame: &[u8],
    decoder: &mut BlockDecoder,
) -> Result<FrameReport, wire::DecodeError> {
    let batch = decode_batch(frame, decoder)?;
    let mut report = FrameReport {
        bytes: frame.len(),
        out_of_range: batch.out_of_range.len(),
        ..FrameReport::default()
    };
    for block in &batch.blocks {
        report.record(block);
    }
    Ok(report)
}

pub fn inspect_capture(bytes: &[u8], limits: &Limits) -> Result<InspectReport, CaptureError> {
    let capture = read_capture(bytes, limits)?;
    let mut decoder = BlockDecoder::new(limits.clone());
    let mut report = InspectReport {
        observer: capture.observer,
        ..InspectReport::default()
    };
    for (index, frame) in capture.frames.iter().enumerate() {
        let frame_report = inspect_frame(frame, &mut decoder)
            .map_err(|source| CaptureError::Frame { index, source })?;
        report.totals.absorb(&frame_report);
        report.largest_frame = report.largest_frame.max(frame_report.bytes);
        report.frames.push(frame_report);
    }
    Ok(report)
}
