//! Offsets inside a category's motion region.

use crate::Slot;

/// Which motion payload a category carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionKind {
    /// Movement flags, position, orientation and nine speeds.
    Living,
    /// Position and orientation only.
    Stationary,
}

impl MotionKind {
    /// Number of slots the region occupies.
    #[must_use]
    pub const fn slot_count(self) -> Slot {
        match self {
            Self::Living => living::LEN,
            Self::Stationary => stationary::LEN,
        }
    }
}

/// Contiguous run of slots holding positional state.
///
/// Dirty slots in this region produce movement blocks, never values entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotionRegion {
    pub start: Slot,
    pub kind: MotionKind,
}

impl MotionRegion {
    #[must_use]
    pub const fn new(start: Slot, kind: MotionKind) -> Self {
        Self { start, kind }
    }

    /// One past the last slot of the region.
    #[must_use]
    pub const fn end(self) -> Slot {
        self.start + self.kind.slot_count()
    }

    #[must_use]
    pub const fn contains(self, slot: Slot) -> bool {
        slot >= self.start && slot < self.end()
    }

    /// Absolute slot of a region-relative offset.
    #[must_use]
    pub const fn slot(self, offset: Slot) -> Slot {
        self.start + offset
    }

    /// Absolute slot of the x coordinate, whatever the kind.
    #[must_use]
    pub const fn x(self) -> Slot {
        match self.kind {
            MotionKind::Living => self.start + living::X,
            MotionKind::Stationary => self.start + stationary::X,
        }
    }
}

/// Living region layout.
pub mod living {
    use crate::Slot;

    pub const MOVE_FLAGS: Slot = 0;
    pub const X: Slot = 1;
    pub const Y: Slot = 2;
    pub const Z: Slot = 3;
    pub const ORIENTATION: Slot = 4;
    pub const SPEED_WALK: Slot = 5;
    pub const SPEED_RUN: Slot = 6;
    pub const SPEED_RUN_BACK: Slot = 7;
    pub const SPEED_SWIM: Slot = 8;
    pub const SPEED_SWIM_BACK: Slot = 9;
    pub const SPEED_FLIGHT: Slot = 10;
    pub const SPEED_FLIGHT_BACK: Slot = 11;
    pub const TURN_RATE: Slot = 12;
    pub const PITCH_RATE: Slot = 13;
    pub const SPEED_COUNT: usize = 9;
    pub const LEN: Slot = 14;
}

/// Stationary region layout.
pub mod stationary {
    use crate::Slot;

    pub const X: Slot = 0;
    pub const Y: Slot = 1;
    pub const Z: Slot = 2;
    pub const ORIENTATION: Slot = 3;
    pub const LEN: Slot = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_bounds() {
        let region = MotionRegion::new(120, MotionKind::Living);
        assert_eq!(region.end(), 134);
        assert!(region.contains(120));
        assert!(region.contains(133));
        assert!(!region.contains(134));
        assert!(!region.contains(119));
        assert_eq!(region.x(), 121);
        assert_eq!(region.slot(living::PITCH_RATE), 133);
    }

    #[test]
    fn speeds_fill_living_region() {
        assert_eq!(
            living::SPEED_WALK as usize + living::SPEED_COUNT,
            living::LEN as usize
        );
        assert_eq!(MotionRegion::new(18, MotionKind::Stationary).x(), 18);
    }
}
