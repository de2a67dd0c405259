//! Slot indexes per category.
//!
//! Every category starts with the [`object`] header. Creatures and players
//! share the [`unit`] block; players append the [`player`] block after it.
//! Multi-slot values (64-bit identifiers) occupy two consecutive slots, low
//! word first.

use crate::Slot;

/// Header shared by every category.
pub mod object {
    use super::Slot;

    pub const GUID: Slot = 0;
    pub const TYPE: Slot = 2;
    pub const ENTRY: Slot = 3;
    pub const SCALE_X: Slot = 4;
    pub const PADDING: Slot = 5;
    pub const END: Slot = 6;
}

pub mod item {
    use super::{object, Slot};

    pub const OWNER: Slot = object::END;
    pub const CONTAINED: Slot = object::END + 2;
    pub const CREATOR: Slot = object::END + 4;
    pub const GIFT_CREATOR: Slot = object::END + 6;
    pub const STACK_COUNT: Slot = object::END + 8;
    pub const DURATION: Slot = object::END + 9;
    pub const SPELL_CHARGES: Slot = object::END + 10;
    pub const SPELL_CHARGES_COUNT: Slot = 5;
    pub const FLAGS: Slot = object::END + 15;
    pub const ENCHANTMENT: Slot = object::END + 16;
    pub const ENCHANTMENT_COUNT: Slot = 14;
    pub const PROPERTY_SEED: Slot = object::END + 30;
    pub const RANDOM_PROPERTIES_ID: Slot = object::END + 31;
    pub const DURABILITY: Slot = object::END + 32;
    pub const MAX_DURABILITY: Slot = object::END + 33;
    pub const END: Slot = object::END + 34;
}

pub mod container {
    use super::{item, Slot};

    pub const NUM_SLOTS: Slot = item::END;
    pub const PADDING: Slot = item::END + 1;
    /// First of 36 two-slot item identifiers.
    pub const SLOT_1: Slot = item::END + 2;
    pub const SLOT_COUNT: Slot = 36;
    pub const END: Slot = SLOT_1 + SLOT_COUNT * 2;
}

/// Creature block, also the first part of the player layout.
pub mod unit {
    use super::{object, Slot};

    pub const CHARM: Slot = object::END;
    pub const SUMMON: Slot = object::END + 2;
    pub const TARGET: Slot = object::END + 4;
    pub const BYTES_0: Slot = 12;
    pub const HEALTH: Slot = 13;
    pub const POWER1: Slot = 14;
    pub const POWER_COUNT: Slot = 7;
    pub const MAX_HEALTH: Slot = 21;
    pub const MAX_POWER1: Slot = 22;
    pub const LEVEL: Slot = 29;
    pub const FACTION_TEMPLATE: Slot = 30;
    pub const FLAGS: Slot = 31;
    pub const FLAGS_2: Slot = 32;
    pub const AURA_STATE: Slot = 33;
    /// Main hand and off hand.
    pub const BASE_ATTACK_TIME: Slot = 34;
    pub const RANGED_ATTACK_TIME: Slot = 36;
    pub const BOUNDING_RADIUS: Slot = 37;
    pub const COMBAT_REACH: Slot = 38;
    pub const DISPLAY_ID: Slot = 39;
    pub const NATIVE_DISPLAY_ID: Slot = 40;
    pub const MOUNT_DISPLAY_ID: Slot = 41;
    pub const MIN_DAMAGE: Slot = 42;
    pub const MAX_DAMAGE: Slot = 43;
    pub const MIN_OFFHAND_DAMAGE: Slot = 44;
    pub const MAX_OFFHAND_DAMAGE: Slot = 45;
    pub const BYTES_1: Slot = 46;
    pub const PET_NUMBER: Slot = 47;
    pub const PET_NAME_TIMESTAMP: Slot = 48;
    pub const PET_EXPERIENCE: Slot = 49;
    pub const PET_NEXT_LEVEL_EXP: Slot = 50;
    pub const DYNAMIC_FLAGS: Slot = 51;
    pub const MOD_CAST_SPEED: Slot = 52;
    pub const CREATED_BY_SPELL: Slot = 53;
    pub const NPC_FLAGS: Slot = 54;
    pub const NPC_EMOTE_STATE: Slot = 55;
    pub const STAT0: Slot = 56;
    pub const STAT_COUNT: Slot = 5;
    pub const POS_STAT0: Slot = 61;
    pub const NEG_STAT0: Slot = 66;
    pub const RESISTANCES: Slot = 71;
    pub const RESISTANCE_COUNT: Slot = 7;
    pub const RESISTANCE_BUFF_MODS_POSITIVE: Slot = 78;
    pub const RESISTANCE_BUFF_MODS_NEGATIVE: Slot = 85;
    pub const BASE_MANA: Slot = 92;
    pub const BASE_HEALTH: Slot = 93;
    pub const BYTES_2: Slot = 94;
    pub const ATTACK_POWER: Slot = 95;
    pub const ATTACK_POWER_MODS: Slot = 96;
    pub const ATTACK_POWER_MULTIPLIER: Slot = 97;
    pub const RANGED_ATTACK_POWER: Slot = 98;
    pub const RANGED_ATTACK_POWER_MODS: Slot = 99;
    pub const RANGED_ATTACK_POWER_MULTIPLIER: Slot = 100;
    pub const MIN_RANGED_DAMAGE: Slot = 101;
    pub const MAX_RANGED_DAMAGE: Slot = 102;
    pub const POWER_COST_MODIFIER: Slot = 103;
    pub const POWER_COST_MULTIPLIER: Slot = 110;
    pub const MAX_HEALTH_MODIFIER: Slot = 117;
    pub const HOVER_HEIGHT: Slot = 118;
    pub const PADDING: Slot = 119;
    /// Living motion region; see [`crate::motion::living`].
    pub const MOTION: Slot = 120;
    pub const END: Slot = MOTION + crate::motion::living::LEN;
}

pub mod player {
    use super::{unit, Slot};

    pub const DUEL_ARBITER: Slot = unit::END;
    pub const FLAGS: Slot = unit::END + 2;
    pub const GUILD_ID: Slot = unit::END + 3;
    pub const GUILD_RANK: Slot = unit::END + 4;
    pub const BYTES: Slot = unit::END + 5;
    pub const BYTES_2: Slot = unit::END + 6;
    pub const BYTES_3: Slot = unit::END + 7;
    pub const DUEL_TEAM: Slot = unit::END + 8;
    pub const GUILD_TIMESTAMP: Slot = unit::END + 9;
    /// Ten quest log entries of five slots each.
    pub const QUEST_LOG: Slot = unit::END + 10;
    pub const QUEST_LOG_LEN: Slot = 50;
    pub const XP: Slot = QUEST_LOG + QUEST_LOG_LEN;
    pub const NEXT_LEVEL_XP: Slot = XP + 1;
    pub const COINAGE: Slot = XP + 2;
    pub const PADDING: Slot = XP + 3;
    pub const END: Slot = XP + 4;
}

pub mod gameobject {
    use super::{object, Slot};

    pub const CREATED_BY: Slot = object::END;
    pub const DISPLAY_ID: Slot = object::END + 2;
    pub const FLAGS: Slot = object::END + 3;
    pub const PARENT_ROTATION: Slot = object::END + 4;
    pub const DYNAMIC: Slot = object::END + 8;
    pub const FACTION: Slot = object::END + 9;
    pub const LEVEL: Slot = object::END + 10;
    pub const BYTES_1: Slot = object::END + 11;
    pub const MOTION: Slot = object::END + 12;
    pub const END: Slot = MOTION + crate::motion::stationary::LEN;
}

pub mod dynamic_object {
    use super::{object, Slot};

    pub const CASTER: Slot = object::END;
    pub const BYTES: Slot = object::END + 2;
    pub const SPELL_ID: Slot = object::END + 3;
    pub const RADIUS: Slot = object::END + 4;
    pub const CAST_TIME: Slot = object::END + 5;
    pub const MOTION: Slot = object::END + 6;
    pub const END: Slot = MOTION + crate::motion::stationary::LEN;
}

pub mod corpse {
    use super::{object, Slot};

    pub const OWNER: Slot = object::END;
    pub const PARTY: Slot = object::END + 2;
    pub const DISPLAY_ID: Slot = object::END + 4;
    pub const ITEM: Slot = object::END + 5;
    pub const ITEM_COUNT: Slot = 19;
    pub const BYTES_1: Slot = object::END + 24;
    pub const BYTES_2: Slot = object::END + 25;
    pub const GUILD: Slot = object::END + 26;
    pub const FLAGS: Slot = object::END + 27;
    pub const DYNAMIC_FLAGS: Slot = object::END + 28;
    pub const PADDING: Slot = object::END + 29;
    pub const MOTION: Slot = object::END + 30;
    pub const END: Slot = MOTION + crate::motion::stationary::LEN;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_block_is_contiguous() {
        assert_eq!(unit::BYTES_0, unit::TARGET + 2);
        assert_eq!(unit::POWER1 + unit::POWER_COUNT, unit::MAX_HEALTH);
        assert_eq!(unit::MAX_POWER1 + unit::POWER_COUNT, unit::LEVEL);
        assert_eq!(unit::STAT0 + unit::STAT_COUNT, unit::POS_STAT0);
        assert_eq!(unit::NEG_STAT0 + unit::STAT_COUNT, unit::RESISTANCES);
        assert_eq!(
            unit::RESISTANCE_BUFF_MODS_NEGATIVE + unit::RESISTANCE_COUNT,
            unit::BASE_MANA
        );
        assert_eq!(
            unit::POWER_COST_MULTIPLIER + unit::RESISTANCE_COUNT,
            unit::MAX_HEALTH_MODIFIER
        );
        assert_eq!(unit::PADDING + 1, unit::MOTION);
    }

    #[test]
    fn category_ends() {
        assert_eq!(item::END, 40);
        assert_eq!(container::END, 114);
        assert_eq!(unit::END, 134);
        assert_eq!(player::END, 198);
        assert_eq!(gameobject::END, 22);
        assert_eq!(dynamic_object::END, 16);
        assert_eq!(corpse::END, 40);
    }
}
