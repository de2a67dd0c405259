//! Newtype flag sets for the slots and wire fields the visibility rules touch.

macro_rules! flag_set {
    ($(#[$meta:meta])* $name:ident($raw:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($raw);

        impl $name {
            /// Creates flags from a raw value.
            #[must_use]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Returns the raw flag bits.
            #[must_use]
            pub const fn raw(self) -> $raw {
                self.0
            }

            /// Returns `true` if every bit of `bits` is set.
            #[must_use]
            pub const fn contains(self, bits: $raw) -> bool {
                self.0 & bits == bits
            }

            /// Returns `true` if any bit of `bits` is set.
            #[must_use]
            pub const fn intersects(self, bits: $raw) -> bool {
                self.0 & bits != 0
            }

            /// Returns these flags with `bits` set.
            #[must_use]
            pub const fn with(self, bits: $raw) -> Self {
                Self(self.0 | bits)
            }

            /// Returns these flags with `bits` cleared.
            #[must_use]
            pub const fn without(self, bits: $raw) -> Self {
                Self(self.0 & !bits)
            }

            /// Sets or clears `bits` depending on `on`.
            #[must_use]
            pub const fn toggled(self, bits: $raw, on: bool) -> Self {
                if on {
                    self.with(bits)
                } else {
                    self.without(bits)
                }
            }
        }
    };
}

flag_set! {
    /// Creature capability flags (`unit::NPC_FLAGS`).
    NpcFlags(u32)
}

impl NpcFlags {
    pub const GOSSIP: u32 = 0x0000_0001;
    pub const QUEST_GIVER: u32 = 0x0000_0002;
    pub const TRAINER: u32 = 0x0000_0010;
    pub const TRAINER_CLASS: u32 = 0x0000_0020;
    pub const TRAINER_PROFESSION: u32 = 0x0000_0040;
    pub const VENDOR: u32 = 0x0000_0080;
    pub const FLIGHT_MASTER: u32 = 0x0000_2000;
    pub const STABLE_MASTER: u32 = 0x0040_0000;
    pub const SPELL_CLICK: u32 = 0x0100_0000;

    /// All trainer variants.
    pub const ANY_TRAINER: u32 = Self::TRAINER | Self::TRAINER_CLASS | Self::TRAINER_PROFESSION;
}

flag_set! {
    /// Unit state flags (`unit::FLAGS`).
    UnitFlags(u32)
}

impl UnitFlags {
    pub const NON_ATTACKABLE: u32 = 0x0000_0002;
    pub const PVP: u32 = 0x0000_1000;
    pub const IN_COMBAT: u32 = 0x0008_0000;
    pub const NOT_SELECTABLE: u32 = 0x0200_0000;
}

flag_set! {
    /// Per-observer unit dynamic flags (`unit::DYNAMIC_FLAGS`).
    DynamicFlags(u32)
}

impl DynamicFlags {
    pub const LOOTABLE: u32 = 0x0001;
    pub const TRACK_UNIT: u32 = 0x0002;
    pub const TAPPED: u32 = 0x0004;
    pub const TAPPED_BY_OBSERVER: u32 = 0x0008;
    pub const SPECIAL_INFO: u32 = 0x0010;
    pub const DEAD: u32 = 0x0020;
}

flag_set! {
    /// Low half of the game-object `DYNAMIC` slot.
    GoDynamicFlags(u16)
}

impl GoDynamicFlags {
    pub const ACTIVATE: u16 = 0x0001;
    pub const ANIMATE: u16 = 0x0002;
    pub const NO_INTERACT: u16 = 0x0004;
    pub const SPARKLE: u16 = 0x0008;
}

flag_set! {
    /// Aura-state bits (`unit::AURA_STATE`).
    AuraState(u32)
}

impl AuraState {
    pub const DEFENSE: u32 = 1 << 0;
    pub const HEALTH_LESS_20: u32 = 1 << 1;
    pub const BERSERKING: u32 = 1 << 2;
    pub const JUDGEMENT: u32 = 1 << 4;
    pub const HUNTER_PARRY: u32 = 1 << 6;
    pub const CONFLAGRATE: u32 = 1 << 12;

    /// States that are only visible to the casters that applied them.
    pub const PER_CASTER: u32 = Self::CONFLAGRATE;
}

flag_set! {
    /// Movement state flags carried in the living movement payload.
    MoveFlags(u32)
}

impl MoveFlags {
    pub const FORWARD: u32 = 0x0000_0001;
    pub const BACKWARD: u32 = 0x0000_0002;
    pub const WALK_MODE: u32 = 0x0000_0100;
    pub const ON_TRANSPORT: u32 = 0x0000_0200;
    pub const FALLING: u32 = 0x0000_2000;
    pub const SWIMMING: u32 = 0x0020_0000;
    pub const FLYING: u32 = 0x0200_0000;
    /// A motion curve follows the speeds in the movement payload.
    pub const SPLINE_ENABLED: u32 = 0x0800_0000;
}

flag_set! {
    /// Movement sub-block flags; select which payload sections follow.
    UpdateFlags(u16)
}

impl UpdateFlags {
    /// The block is addressed to the entity itself.
    pub const SELF: u16 = 0x0001;
    pub const TRANSPORT: u16 = 0x0002;
    /// A packed attacking-target identifier trails the payload.
    pub const HAS_ATTACKING_TARGET: u16 = 0x0004;
    /// A `u32` low identifier trails the payload.
    pub const LOW_GUID: u16 = 0x0008;
    pub const HIGH_GUID: u16 = 0x0010;
    /// Full kinematic payload.
    pub const LIVING: u16 = 0x0020;
    /// Stationary `x y z o` payload.
    pub const HAS_POSITION: u16 = 0x0040;

    /// Bits this engine emits and accepts.
    pub const KNOWN: u16 = Self::SELF
        | Self::HAS_ATTACKING_TARGET
        | Self::LOW_GUID
        | Self::LIVING
        | Self::HAS_POSITION;
}

flag_set! {
    /// Motion curve (spline) flags.
    CurveFlags(u32)
}

impl CurveFlags {
    pub const CYCLIC: u32 = 0x0010_0000;
    pub const FLYING: u32 = 0x0000_0200;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_sets_and_clears() {
        let flags = NpcFlags::from_raw(NpcFlags::GOSSIP);
        let flags = flags.toggled(NpcFlags::TRAINER, true);
        assert!(flags.contains(NpcFlags::GOSSIP | NpcFlags::TRAINER));
        let flags = flags.toggled(NpcFlags::GOSSIP, false);
        assert_eq!(flags.raw(), NpcFlags::TRAINER);
    }

    #[test]
    fn intersects_any_trainer() {
        let flags = NpcFlags::from_raw(NpcFlags::TRAINER_PROFESSION | NpcFlags::VENDOR);
        assert!(flags.intersects(NpcFlags::ANY_TRAINER));
        assert!(!flags.contains(NpcFlags::ANY_TRAINER));
        assert_eq!(
            flags.without(NpcFlags::ANY_TRAINER).raw(),
            NpcFlags::VENDOR
        );
    }

    #[test]
    fn living_and_position_are_distinct() {
        let flags = UpdateFlags::default().with(UpdateFlags::LIVING);
        assert!(!flags.intersects(UpdateFlags::HAS_POSITION));
        assert_eq!(UpdateFlags::KNOWN & UpdateFlags::TRANSPORT, 0);
    }
}
