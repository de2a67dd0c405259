//! Block encoding and decoding.

use std::collections::HashMap;

use bitstream::{BitError, BitSet, ByteReader, ByteWriter};
use schema::{Category, Layouts};

use crate::error::{DecodeError, WireResult};
use crate::guid::{read_packed_guid, write_packed_guid};
use crate::limits::Limits;
use crate::mask::{decode_mask, encode_mask};
use crate::movement::Movement;

/// Block type tag, the first byte of every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BlockKind {
    Values = 0,
    Movement = 1,
    Create = 2,
    /// Creation of a freshly spawned entity.
    CreateFull = 3,
    Destroy = 4,
}

impl BlockKind {
    /// Every kind, in tag order.
    pub const ALL: [Self; 5] = [
        Self::Values,
        Self::Movement,
        Self::Create,
        Self::CreateFull,
        Self::Destroy,
    ];

    /// Parses a block tag from a raw byte.
    pub fn parse(tag: u8) -> WireResult<Self> {
        match tag {
            0 => Ok(Self::Values),
            1 => Ok(Self::Movement),
            2 => Ok(Self::Create),
            3 => Ok(Self::CreateFull),
            4 => Ok(Self::Destroy),
            _ => Err(DecodeError::UnknownBlockTag { tag }),
        }
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_create(self) -> bool {
        matches!(self, Self::Create | Self::CreateFull)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Values => "values",
            Self::Movement => "movement",
            Self::Create => "create",
            Self::CreateFull => "create_full",
            Self::Destroy => "destroy",
        }
    }
}

/// A values sub-block: a mask and one word per set bit, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    mask: BitSet,
    words: Vec<u32>,
}

impl Values {
    /// Creates an empty values sub-block for a category of `slot_count` slots.
    #[must_use]
    pub fn new(slot_count: usize) -> Self {
        Self {
            mask: BitSet::new(slot_count),
            words: Vec::new(),
        }
    }

    /// Builds a sub-block from a mask and its words in ascending slot order.
    pub fn from_parts(mask: BitSet, words: Vec<u32>) -> Result<Self, BitError> {
        if mask.count_ones() != words.len() {
            return Err(BitError::LengthMismatch {
                expected: mask.count_ones(),
                actual: words.len(),
            });
        }
        Ok(Self { mask, words })
    }

    /// Sets `slot` to `word`, replacing any earlier entry for it.
    pub fn insert(&mut self, slot: usize, word: u32) -> Result<(), BitError> {
        let rank = self.mask.iter_ones().take_while(|set| *set < slot).count();
        if self.mask.set(slot)? {
            self.words.insert(rank, word);
        } else {
            self.words[rank] = word;
        }
        Ok(())
    }

    #[must_use]
    pub const fn mask(&self) -> &BitSet {
        &self.mask
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word of `slot`, if present.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<u32> {
        if !self.mask.get(slot) {
            return None;
        }
        let rank = self.mask.iter_ones().take_while(|set| *set < slot).count();
        self.words.get(rank).copied()
    }

    /// Iterates `(slot, word)` pairs in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.mask.iter_ones().zip(self.words.iter().copied())
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        encode_mask(&self.mask, writer);
        for word in &self.words {
            writer.write_u32(*word);
        }
    }

    pub fn decode(
        reader: &mut ByteReader<'_>,
        limits: &Limits,
        slot_count: Option<usize>,
    ) -> WireResult<Self> {
        let mask = decode_mask(reader, limits, slot_count)?;
        let mut words = Vec::with_capacity(mask.count_ones());
        for _ in 0..mask.count_ones() {
            words.push(reader.read_u32()?);
        }
        Ok(Self { mask, words })
    }
}

/// A decoded (or to-be-encoded) block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Create {
        /// `CREATE_FULL` rather than `CREATE`.
        full: bool,
        guid: u64,
        category: Category,
        movement: Movement,
        values: Values,
    },
    Values {
        guid: u64,
        values: Values,
    },
    Movement {
        guid: u64,
        movement: Movement,
    },
    Destroy {
        guid: u64,
        animated: bool,
    },
}

impl Block {
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Create { full: true, .. } => BlockKind::CreateFull,
            Self::Create { full: false, .. } => BlockKind::Create,
            Self::Values { .. } => BlockKind::Values,
            Self::Movement { .. } => BlockKind::Movement,
            Self::Destroy { .. } => BlockKind::Destroy,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> u64 {
        match self {
            Self::Create { guid, .. }
            | Self::Values { guid, .. }
            | Self::Movement { guid, .. }
            | Self::Destroy { guid, .. } => *guid,
        }
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.kind().tag());
        match self {
            Self::Create {
                guid,
                category,
                movement,
                values,
                ..
            } => {
                write_packed_guid(writer, *guid);
                writer.write_u8(category.tag());
                movement.encode(writer);
                values.encode(writer);
            }
            Self::Values { guid, values } => {
                write_packed_guid(writer, *guid);
                values.encode(writer);
            }
            Self::Movement { guid, movement } => {
                write_packed_guid(writer, *guid);
                movement.encode(writer);
            }
            Self::Destroy { guid, animated } => {
                writer.write_u64(*guid);
                writer.write_bool(*animated);
            }
        }
    }

    /// Encodes into a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(64);
        self.encode(&mut writer);
        writer.finish()
    }
}

/// Stateful block decoder.
///
/// Remembers the category of every identifier it has seen created so that
/// later values blocks can be bounded by the right attribute count and
/// checked against the motion region.
#[derive(Debug, Clone)]
pub struct BlockDecoder {
    limits: Limits,
    layouts: Layouts,
    categories: HashMap<u64, Category>,
}

impl BlockDecoder {
    /// Creates a decoder over the standard layouts.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self::with_layouts(limits, Layouts::standard())
    }

    #[must_use]
    pub fn with_layouts(limits: Limits, layouts: Layouts) -> Self {
        Self {
            limits,
            layouts,
            categories: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Category of `guid` if a creation block for it has been decoded.
    #[must_use]
    pub fn category_of(&self, guid: u64) -> Option<Category> {
        self.categories.get(&guid).copied()
    }

    /// Decodes one block from `reader`.
    pub fn decode(&mut self, reader: &mut ByteReader<'_>) -> WireResult<Block> {
        let kind = BlockKind::parse(reader.read_u8()?)?;
        match kind {
            BlockKind::Create | BlockKind::CreateFull => {
                let guid = read_packed_guid(reader)?;
                let tag = reader.read_u8()?;
                let category =
                    Category::from_tag(tag).ok_or(DecodeError::UnknownCategory { tag })?;
                let movement = Movement::decode(reader, &self.limits)?;
                let values = self.decode_values(reader, Some(category))?;
                self.categories.insert(guid, category);
                Ok(Block::Create {
                    full: kind == BlockKind::CreateFull,
                    guid,
                    category,
                    movement,
                    values,
                })
            }
            BlockKind::Values => {
                let guid = read_packed_guid(reader)?;
                let values = self.decode_values(reader, self.category_of(guid))?;
                Ok(Block::Values { guid, values })
            }
            BlockKind::Movement => {
                let guid = read_packed_guid(reader)?;
                let movement = Movement::decode(reader, &self.limits)?;
                Ok(Block::Movement { guid, movement })
            }
            BlockKind::Destroy => {
                let guid = reader.read_u64()?;
                let animated = reader.read_bool()?;
                self.categories.remove(&guid);
                Ok(Block::Destroy { guid, animated })
            }
        }
    }

    fn decode_values(
        &self,
        reader: &mut ByteReader<'_>,
        category: Option<Category>,
    ) -> WireResult<Values> {
        let layout = category.map(|category| self.layouts.get(category));
        let values = Values::decode(reader, &self.limits, layout.map(schema::Layout::slot_count))?;
        if let Some(layout) = layout {
            if let Some(slot) = values
                .mask()
                .iter_ones()
                .find(|slot| u16::try_from(*slot).is_ok_and(|slot| layout.is_motion_slot(slot)))
            {
                return Err(DecodeError::MotionSlotInValues { slot });
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{MovementPayload, Position};
    use schema::slots::{gameobject, object, unit};

    fn decode_one(decoder: &mut BlockDecoder, bytes: &[u8]) -> WireResult<Block> {
        let mut reader = ByteReader::new(bytes);
        let block = decoder.decode(&mut reader)?;
        assert!(reader.is_empty(), "block left {} bytes", reader.remaining());
        Ok(block)
    }

    fn unit_values(entries: &[(u16, u32)]) -> Values {
        let mut values = Values::new(usize::from(unit::END));
        for (slot, word) in entries {
            values.insert(usize::from(*slot), *word).unwrap();
        }
        values
    }

    #[test]
    fn values_insert_keeps_ascending_order() {
        let values = unit_values(&[(unit::HEALTH, 80), (object::ENTRY, 7), (unit::LEVEL, 12)]);
        let pairs: Vec<_> = values.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (usize::from(object::ENTRY), 7),
                (usize::from(unit::HEALTH), 80),
                (usize::from(unit::LEVEL), 12)
            ]
        );
        assert_eq!(values.get(usize::from(unit::HEALTH)), Some(80));
        assert_eq!(values.get(usize::from(unit::MAX_HEALTH)), None);
    }

    #[test]
    fn values_from_parts_checks_word_count() {
        let mut mask = BitSet::new(8);
        mask.set(1).unwrap();
        mask.set(6).unwrap();
        let values = Values::from_parts(mask.clone(), vec![10, 60]).unwrap();
        assert_eq!(values.get(6), Some(60));
        assert_eq!(
            Values::from_parts(mask, vec![10]).unwrap_err(),
            BitError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn values_insert_replaces() {
        let mut values = unit_values(&[(unit::HEALTH, 80)]);
        values.insert(usize::from(unit::HEALTH), 60).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(usize::from(unit::HEALTH)), Some(60));
    }

    #[test]
    fn values_block_wire_layout() {
        let block = Block::Values {
            guid: 0x2A,
            values: unit_values(&[(unit::HEALTH, 80)]),
        };
        let bytes = block.to_bytes();
        let mut expected = vec![0, 0b1, 0x2A, 1];
        expected.extend_from_slice(&(1u32 << 13).to_le_bytes());
        expected.extend_from_slice(&80u32.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn destroy_uses_fixed_identifier() {
        let block = Block::Destroy {
            guid: 0xF130_0000_0000_0001,
            animated: true,
        };
        let bytes = block.to_bytes();
        assert_eq!(bytes.len(), 1 + 8 + 1);
        assert_eq!(bytes[0], BlockKind::Destroy.tag());
        assert_eq!(bytes[9], 1);
    }

    #[test]
    fn create_then_values_bounded_by_category() {
        let mut decoder = BlockDecoder::new(Limits::default());
        let create = Block::Create {
            full: true,
            guid: 9,
            category: Category::GameObject,
            movement: Movement {
                payload: MovementPayload::Stationary(Position::new(1.0, 2.0, 3.0, 0.5)),
                low_guid: Some(9),
                ..Movement::default()
            },
            values: {
                let mut values = Values::new(usize::from(gameobject::END));
                values.insert(usize::from(gameobject::DYNAMIC), 0xFFFF_0001).unwrap();
                values
            },
        };
        let decoded = decode_one(&mut decoder, &create.to_bytes()).unwrap();
        assert_eq!(decoded, create);
        assert_eq!(decoder.category_of(9), Some(Category::GameObject));

        // unit HEALTH is past the gameobject attribute count
        let stray = Block::Values {
            guid: 9,
            values: unit_values(&[(unit::HEALTH, 1), (unit::BYTES_1, 1)]),
        };
        let err = decode_one(&mut decoder, &stray.to_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::MaskBitBeyondCount { count: 22, .. }));
    }

    #[test]
    fn values_in_motion_region_rejected() {
        let mut decoder = BlockDecoder::new(Limits::default());
        let create = Block::Create {
            full: false,
            guid: 3,
            category: Category::GameObject,
            movement: Movement::default(),
            values: Values::new(usize::from(gameobject::END)),
        };
        decode_one(&mut decoder, &create.to_bytes()).unwrap();
        let mut values = Values::new(usize::from(gameobject::END));
        values.insert(usize::from(gameobject::MOTION), 0).unwrap();
        let bytes = Block::Values { guid: 3, values }.to_bytes();
        let err = decode_one(&mut decoder, &bytes).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MotionSlotInValues {
                slot: usize::from(gameobject::MOTION)
            }
        );
    }

    #[test]
    fn destroy_forgets_category() {
        let mut decoder = BlockDecoder::new(Limits::default());
        let create = Block::Create {
            full: false,
            guid: 4,
            category: Category::Item,
            movement: Movement::default(),
            values: Values::new(40),
        };
        decode_one(&mut decoder, &create.to_bytes()).unwrap();
        let destroy = Block::Destroy {
            guid: 4,
            animated: false,
        };
        decode_one(&mut decoder, &destroy.to_bytes()).unwrap();
        assert_eq!(decoder.category_of(4), None);
    }

    #[test]
    fn unknown_tags_rejected() {
        let mut decoder = BlockDecoder::new(Limits::default());
        assert_eq!(
            decode_one(&mut decoder, &[5]).unwrap_err(),
            DecodeError::UnknownBlockTag { tag: 5 }
        );
        assert_eq!(
            decode_one(&mut decoder, &[2, 0, 0x0C]).unwrap_err(),
            DecodeError::UnknownCategory { tag: 0x0C }
        );
    }

    #[test]
    fn block_kind_tags_roundtrip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::parse(kind.tag()).unwrap(), kind);
        }
        assert!(BlockKind::CreateFull.is_create());
        assert!(!BlockKind::Values.is_create());
    }
}
