//! Error types for bit-set and byte stream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-set manipulation or byte decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Bit index lies outside the bit-set length.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of bits in the set.
        len: usize,
    },

    /// Two bit-sets (or a bit-set and its backing words) disagree on length.
    LengthMismatch {
        /// Length that was expected.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },

    /// Backing words carry set bits past the declared length.
    BitsBeyondLength {
        /// Highest set bit found.
        highest: usize,
        /// Number of bits in the set.
        len: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "bit index {index} out of range for {len} bits")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: expected {expected}, got {actual}")
            }
            Self::BitsBeyondLength { highest, len } => {
                write!(f, "bit {highest} set beyond declared length {len}")
            }
        }
    }
}

impl std::error::Error for BitError {}
