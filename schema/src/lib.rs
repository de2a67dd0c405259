//! Entity categories, attribute slot layouts and flag sets for the vantage
//! replication engine.
//!
//! This crate defines how entity state is laid out for replication:
//! - The closed [`Category`] enum and its wire tag
//! - Per-category [`Layout`] tables: attribute count, slot kinds, motion region
//! - [`Lane`] accessors for byte and half-word sub-fields
//! - Newtype flag sets for the fields the visibility rules rewrite
//! - Slot index constants in [`slots`] and motion offsets in [`motion`]
//!
//! # Design Principles
//!
//! - **Table-driven** - Category behavior is a lookup, not a class hierarchy.
//! - **Fixed kinds** - A slot's interpretation never changes at runtime.
//! - **Validated construction** - Custom layouts go through a checked builder.
//!
//! # Example
//!
//! ```
//! use schema::{slots::unit, Category, Lane, Layouts, SlotKind};
//!
//! let layouts = Layouts::standard();
//! let layout = layouts.get(Category::Unit);
//! assert_eq!(layout.kind(unit::HEALTH), Some(SlotKind::UInt));
//! assert!(layout.is_motion_slot(layout.motion().unwrap().x()));
//!
//! let race = Lane::byte(1);
//! assert_eq!(race.extract(0x0000_0A00), 0x0A);
//! ```

mod category;
mod error;
mod flags;
mod lane;
mod layout;
pub mod motion;
pub mod slots;

pub use category::Category;
pub use error::{SchemaError, SchemaResult};
pub use flags::{
    AuraState, CurveFlags, DynamicFlags, GoDynamicFlags, MoveFlags, NpcFlags, UnitFlags,
    UpdateFlags,
};
pub use lane::Lane;
pub use layout::{Layout, LayoutBuilder, Layouts, SlotKind};
pub use motion::{MotionKind, MotionRegion};

/// Index of a 32-bit attribute slot within a category layout.
pub type Slot = u16;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        let _ = Layouts::standard();
        let _ = Lane::WORD;
        let _ = SlotKind::FloatAsUInt;
        let _ = MotionKind::Living;
        let _ = NpcFlags::default();
        let _: Slot = slots::unit::HEALTH;
    }

    #[test]
    fn slot_fits_wire_mask() {
        // 255 blocks of 32 bits bounds every layout
        assert_eq!(size_of::<Slot>(), 2);
        for layout in Layouts::standard().iter() {
            assert!(layout.slot_count() <= 255 * 32);
        }
    }
}
