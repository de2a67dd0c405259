//! Capture files: the batch frames one observer received, in order.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic "VCAP" | version u16 | observer u64 | { frame_len u32 | frame }*
//! ```

use std::fmt;

use bitstream::{BitError, ByteReader, ByteWriter};
use wire::{DecodeError, Limits};

pub const CAPTURE_MAGIC: [u8; 4] = *b"VCAP";
pub const CAPTURE_VERSION: u16 = 1;

/// Errors that can occur while reading a capture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    BadMagic { found: [u8; 4] },
    UnsupportedVersion { version: u16 },
    Truncated(BitError),
    FrameTooLarge { index: usize, len: usize, max: usize },
    /// A frame failed to decode.
    Frame { index: usize, source: DecodeError },
}

impl From<BitError> for CaptureError {
    fn from(err: BitError) -> Self {
        Self::Truncated(err)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => write!(f, "not a capture file (magic {found:02X?})"),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported capture version {version}")
            }
            Self::Truncated(err) => write!(f, "truncated capture: {err}"),
            Self::FrameTooLarge { index, len, max } => {
                write!(f, "frame {index} is {len} bytes, limit {max}")
            }
            Self::Frame { index, source } => write!(f, "frame {index}: {source}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Truncated(err) => Some(err),
            Self::Frame { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A parsed capture; frames borrow from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture<'a> {
    pub observer: u64,
    pub frames: Vec<&'a [u8]>,
}

/// Builds a capture file in memory.
#[derive(Debug)]
pub struct CaptureWriter {
    writer: ByteWriter,
    frames: usize,
}

impl CaptureWriter {
    #[must_use]
    pub fn new(observer: u64) -> Self {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&CAPTURE_MAGIC);
        writer.write_u16(CAPTURE_VERSION);
        writer.write_u64(observer);
        Self { writer, frames: 0 }
    }

    /// Appends one batch frame.
    pub fn push_frame(&mut self, frame: &[u8]) {
        let len = u32::try_from(frame.len()).unwrap_or(u32::MAX);
        self.writer.write_u32(len);
        self.writer.write_bytes(frame);
        self.frames += 1;
    }

    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frames
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// Splits a capture file into frames; frame sizes are bounded by
/// `limits.max_batch_bytes`.
pub fn read_capture<'a>(bytes: &'a [u8], limits: &Limits) -> Result<Capture<'a>, CaptureError> {
    let mut reader = ByteReader::new(bytes);
    let magic = reader.read_bytes(CAPTURE_MAGIC.len())?;
    if magic != CAPTURE_MAGIC {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(CaptureError::BadMagic { found });
    }
    let version = reader.read_u16()?;
    if version != CAPTURE_VERSION {
        return Err(CaptureError::UnsupportedVersion { version });
    }
    let observer = reader.read_u64()?;

    let mut frames = Vec::new();
    while !reader.is_empty() {
        let len = reader.read_u32()? as usize;
        if len > limits.max_batch_bytes {
            return Err(CaptureError::FrameTooLarge {
                index: frames.len(),
                len,
                max: limits.max_batch_bytes,
            });
        }
        frames.push(reader.read_bytes(len)?);
    }
    Ok(Capture { observer, frames })
}
