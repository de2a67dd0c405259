//! Configurable limits for bounded decoding.

/// Wire-level limits for block and batch decoding.
///
/// These limits are enforced before any length-driven loop or allocation so
/// that a hostile capture cannot force unbounded work.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum size of one batch frame in bytes.
    pub max_batch_bytes: usize,

    /// Maximum number of blocks in one batch.
    pub max_blocks: usize,

    /// Maximum number of 32-bit blocks in one update mask.
    pub max_mask_blocks: usize,

    /// Maximum number of points in one motion curve.
    pub max_curve_points: usize,

    /// Maximum number of out-of-range identifiers in one batch.
    pub max_out_of_range: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // the per-player update packet is compressed above this size
            max_batch_bytes: 64 * 1024,
            max_blocks: 1024,
            // the largest standard layout needs 7 blocks
            max_mask_blocks: 32,
            max_curve_points: 256,
            max_out_of_range: 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_batch_bytes: 4096,
            max_blocks: 32,
            max_mask_blocks: 8,
            max_curve_points: 16,
            max_out_of_range: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_batch_bytes: usize::MAX,
            max_blocks: usize::MAX,
            max_mask_blocks: usize::MAX,
            max_curve_points: usize::MAX,
            max_out_of_range: usize::MAX,
        }
    }
}
