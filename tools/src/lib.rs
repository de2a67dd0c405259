//! Capture inspection and decoding tools for the vantage replication engine.
//!
//! This crate provides utilities for understanding what observers received:
//!
//! - Read and write capture files (one observer's batch frames, in order)
//! - Explain capture size by frame and block kind
//! - Decode captures to JSON or a human-readable listing
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what each observer was told.
//! - **Same decoder as clients** - Captures are read with the bounded `wire` decoder.

mod capture;
mod decode;
mod inspect;

pub use capture::{read_capture, Capture, CaptureError, CaptureWriter, CAPTURE_MAGIC, CAPTURE_VERSION};
pub use decode::{decode_capture_json, format_decode_pretty, BlockJson, CaptureJson, FrameJson, SlotJson};
pub use inspect::{inspect_capture, inspect_frame, FrameReport, InspectReport, KindReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = CaptureWriter::new(0);
        let _ = FrameReport::default();
        let _ = KindReport::default();
        let _ = CAPTURE_MAGIC;
        let _ = CAPTURE_VERSION;
    }
}
