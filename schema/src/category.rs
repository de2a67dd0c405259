//! The closed set of entity categories.

/// Entity category; selects the attribute layout and wire behavior.
///
/// The discriminant is the one-byte category tag carried in creation blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Category {
    Item = 1,
    Container = 2,
    Unit = 3,
    Player = 4,
    GameObject = 5,
    DynamicObject = 6,
    Corpse = 7,
}

impl Category {
    /// Every category, in tag order.
    pub const ALL: [Self; 7] = [
        Self::Item,
        Self::Container,
        Self::Unit,
        Self::Player,
        Self::GameObject,
        Self::DynamicObject,
        Self::Corpse,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Parses a wire tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Item),
            2 => Some(Self::Container),
            3 => Some(Self::Unit),
            4 => Some(Self::Player),
            5 => Some(Self::GameObject),
            6 => Some(Self::DynamicObject),
            7 => Some(Self::Corpse),
            _ => None,
        }
    }

    /// Position of this category in [`Category::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Creatures and players: full kinematic state, combat rules apply.
    #[must_use]
    pub const fn is_living(self) -> bool {
        matches!(self, Self::Unit | Self::Player)
    }

    /// Categories that exist at a world position and carry a motion region.
    #[must_use]
    pub const fn is_positional(self) -> bool {
        !matches!(self, Self::Item | Self::Container)
    }

    /// Categories whose first creation block after spawning uses the
    /// `CREATE_FULL` tag.
    #[must_use]
    pub const fn is_spawnable(self) -> bool {
        self.is_positional()
    }

    /// Value of the `object::TYPE` slot: bit 0 plus one bit per category in
    /// the inheritance chain (containers are items, players are units).
    #[must_use]
    pub const fn type_mask(self) -> u32 {
        let own = 1 | (1 << self.tag());
        match self {
            Self::Container => own | (1 << Self::Item.tag()),
            Self::Player => own | (1 << Self::Unit.tag()),
            _ => own,
        }
    }

    /// Lower-case name used in logs and tool output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Container => "container",
            Self::Unit => "unit",
            Self::Player => "player",
            Self::GameObject => "gameobject",
            Self::DynamicObject => "dynamicobject",
            Self::Corpse => "corpse",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
