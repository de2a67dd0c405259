//! Core identifier and allegiance types.

use std::fmt;

/// Category part of an identifier, stored in the top 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum HighGuid {
    Item = 0x4000,
    Player = 0x0000,
    GameObject = 0xF110,
    Transport = 0xF120,
    Unit = 0xF130,
    Pet = 0xF140,
    DynamicObject = 0xF100,
    Corpse = 0xF101,
}

impl HighGuid {
    /// Parses the top 16 bits of an identifier.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0x4000 => Some(Self::Item),
            0x0000 => Some(Self::Player),
            0xF110 => Some(Self::GameObject),
            0xF120 => Some(Self::Transport),
            0xF130 => Some(Self::Unit),
            0xF140 => Some(Self::Pet),
            0xF100 => Some(Self::DynamicObject),
            0xF101 => Some(Self::Corpse),
            _ => None,
        }
    }

    /// Identifiers of this kind embed a template entry in bits 24..48.
    #[must_use]
    pub const fn has_entry(self) -> bool {
        matches!(self, Self::GameObject | Self::Transport | Self::Unit | Self::Pet)
    }
}

/// A stable 64-bit entity identifier.
///
/// Identifiers are assigned by the simulation layer and are never reused
/// while any observer is still aware of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectGuid(u64);

impl ObjectGuid {
    /// The empty identifier.
    pub const EMPTY: Self = Self(0);

    /// Packs high part, template entry and counter.
    ///
    /// The entry is only kept for kinds that carry one; the counter is
    /// truncated to 24 bits for those kinds and 32 bits otherwise.
    #[must_use]
    pub const fn new(high: HighGuid, entry: u32, counter: u32) -> Self {
        let high_bits = (high as u64) << 48;
        if high.has_entry() {
            Self(high_bits | ((entry as u64 & 0xFF_FFFF) << 24) | (counter as u64 & 0xFF_FFFF))
        } else {
            Self(high_bits | counter as u64)
        }
    }

    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn high(self) -> Option<HighGuid> {
        HighGuid::from_raw((self.0 >> 48) as u16)
    }

    /// Template entry, for kinds that embed one.
    #[must_use]
    pub const fn entry(self) -> Option<u32> {
        match self.high() {
            Some(high) if high.has_entry() => Some(((self.0 >> 24) & 0xFF_FFFF) as u32),
            _ => None,
        }
    }

    /// Per-kind counter.
    #[must_use]
    pub const fn counter(self) -> u32 {
        match self.high() {
            Some(high) if high.has_entry() => (self.0 & 0xFF_FFFF) as u32,
            _ => self.0 as u32,
        }
    }

    /// Low 32 bits, as sent in the `LOW_GUID` movement trailer.
    #[must_use]
    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn is_player(self) -> bool {
        !self.is_empty() && matches!(self.high(), Some(HighGuid::Player))
    }
}

impl From<u64> for ObjectGuid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<ObjectGuid> for u64 {
    fn from(guid: ObjectGuid) -> Self {
        guid.0
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

/// Allegiance side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Alliance,
    Horde,
}

impl Team {
    /// Side of a playable race id.
    #[must_use]
    pub const fn of_race(race: u8) -> Option<Self> {
        match race {
            race::HUMAN | race::DWARF | race::NIGHT_ELF | race::GNOME | race::DRAENEI => {
                Some(Self::Alliance)
            }
            race::ORC | race::UNDEAD | race::TAUREN | race::TROLL | race::BLOOD_ELF => {
                Some(Self::Horde)
            }
            _ => None,
        }
    }
}

/// Playable race ids, as stored in byte 0 of `unit::BYTES_0`.
pub mod race {
    pub const HUMAN: u8 = 1;
    pub const ORC: u8 = 2;
    pub const DWARF: u8 = 3;
    pub const NIGHT_ELF: u8 = 4;
    pub const UNDEAD: u8 = 5;
    pub const TAUREN: u8 = 6;
    pub const GNOME: u8 = 7;
    pub const TROLL: u8 = 8;
    pub const BLOOD_ELF: u8 = 10;
    pub const DRAENEI: u8 = 11;

    /// Faction template a freshly created character of `race` carries.
    #[must_use]
    pub const fn faction(race: u8) -> Option<u32> {
        match race {
            HUMAN => Some(1),
            ORC => Some(2),
            DWARF => Some(3),
            NIGHT_ELF => Some(4),
            UNDEAD => Some(5),
            TAUREN => Some(6),
            GNOME => Some(115),
            TROLL => Some(116),
            BLOOD_ELF => Some(1610),
            DRAENEI => Some(1629),
            _ => None,
        }
    }
}

/// Class ids, as stored in byte 1 of `unit::BYTES_0`.
pub mod class {
    pub const WARRIOR: u8 = 1;
    pub const PALADIN: u8 = 2;
    pub const HUNTER: u8 = 3;
    pub const ROGUE: u8 = 4;
    pub const PRIEST: u8 = 5;
    pub const SHAMAN: u8 = 7;
    pub const MAGE: u8 = 8;
    pub const WARLOCK: u8 = 9;
    pub const DRUID: u8 = 11;
}
