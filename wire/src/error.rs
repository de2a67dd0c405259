//! Error types for block decoding.

use std::fmt;

use bitstream::BitError;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding blocks and batches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The underlying byte reader ran out of data.
    Truncated(BitError),

    /// Unknown block type tag.
    UnknownBlockTag { tag: u8 },

    /// Unknown category tag in a creation block.
    UnknownCategory { tag: u8 },

    /// Movement update flags carry bits this format does not define.
    UnknownUpdateFlags { flags: u16 },

    /// Both the living and the stationary payload were announced.
    ConflictingPayload { flags: u16 },

    /// A mask bit lies beyond the category's attribute count.
    MaskBitBeyondCount { bit: usize, count: usize },

    /// A decoded value lands in the motion region of its category.
    MotionSlotInValues { slot: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Bytes remain after the declared content.
    TrailingBytes { remaining: usize },

    /// A packed identifier announces a byte that is zero.
    NonCanonicalGuid { presence: u8, byte: usize },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    BatchBytes,
    BlockCount,
    MaskBlocks,
    CurvePoints,
    OutOfRangeCount,
}

impl From<BitError> for DecodeError {
    fn from(err: BitError) -> Self {
        Self::Truncated(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated(err) => write!(f, "truncated block: {err}"),
            Self::UnknownBlockTag { tag } => write!(f, "unknown block tag: {tag}"),
            Self::UnknownCategory { tag } => write!(f, "unknown category tag: {tag}"),
            Self::UnknownUpdateFlags { flags } => {
                write!(f, "unknown update flags: 0x{flags:04X}")
            }
            Self::ConflictingPayload { flags } => {
                write!(
                    f,
                    "update flags 0x{flags:04X} announce both living and stationary payloads"
                )
            }
            Self::MaskBitBeyondCount { bit, count } => {
                write!(f, "mask bit {bit} beyond attribute count {count}")
            }
            Self::MotionSlotInValues { slot } => {
                write!(f, "slot {slot} is positional and cannot appear in values")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after content")
            }
            Self::NonCanonicalGuid { presence, byte } => {
                write!(
                    f,
                    "packed identifier presence 0b{presence:08b} marks zero byte {byte}"
                )
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BatchBytes => "batch bytes",
            Self::BlockCount => "block count",
            Self::MaskBlocks => "mask blocks",
            Self::CurvePoints => "curve points",
            Self::OutOfRangeCount => "out-of-range count",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Truncated(err) => Some(err),
            _ => None,
        }
    }
}

/// Fails with [`DecodeError::LimitsExceeded`] when `actual > limit`.
pub(crate) fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> WireResult<()> {
    if actual > limit {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::CurvePoints,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("curve points"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn decode_error_display_flags_hex() {
        let err = DecodeError::UnknownUpdateFlags { flags: 0x0102 };
        assert!(err.to_string().contains("0x0102"));
    }

    #[test]
    fn truncated_wraps_bit_error() {
        let err: DecodeError = BitError::UnexpectedEof {
            requested: 4,
            available: 1,
        }
        .into();
        assert!(matches!(err, DecodeError::Truncated(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn check_limit_boundary() {
        assert!(check_limit(LimitKind::BlockCount, 4, 4).is_ok());
        assert!(check_limit(LimitKind::BlockCount, 4, 5).is_err());
    }
}
