//! Sub-field accessors over a 32-bit slot.

/// A sub-field of a 32-bit slot: the whole word, one byte, or one half-word.
///
/// Byte `n` covers bits `8n..8n+8`; the low half covers bits `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lane {
    shift: u32,
    width: u32,
}

impl Lane {
    /// The whole 32-bit word.
    pub const WORD: Self = Self {
        shift: 0,
        width: 32,
    };

    /// Low half-word (bits 0..16).
    pub const LOW_HALF: Self = Self {
        shift: 0,
        width: 16,
    };

    /// High half-word (bits 16..32).
    pub const HIGH_HALF: Self = Self {
        shift: 16,
        width: 16,
    };

    /// Byte `index` (0..4) of the slot.
    ///
    /// Using an index of 4 or more in a const context fails to compile.
    #[must_use]
    pub const fn byte(index: u32) -> Self {
        assert!(index < 4, "byte lane index must be below 4");
        Self {
            shift: index * 8,
            width: 8,
        }
    }

    /// Half-word `index` (0 = low, 1 = high).
    #[must_use]
    pub const fn half(index: u32) -> Self {
        assert!(index < 2, "half lane index must be below 2");
        Self {
            shift: index * 16,
            width: 16,
        }
    }

    /// Bit offset of the lane within the word.
    #[must_use]
    pub const fn shift(self) -> u32 {
        self.shift
    }

    /// Lane width in bits.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Mask of the lane's bits in place within the word.
    #[must_use]
    pub const fn mask(self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            ((1u32 << self.width) - 1) << self.shift
        }
    }

    /// Reads the lane value (right-aligned).
    #[must_use]
    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }

    /// Returns `word` with the lane replaced by `value`; excess bits of
    /// `value` are discarded.
    #[must_use]
    pub const fn insert(self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }
}
