//! Update masks, packed identifiers and block framing for the vantage
//! replication engine.
//!
//! This crate handles the binary wire format: the update-mask codec, packed
//! identifiers, movement sub-blocks, the four block kinds and per-observer
//! batch frames. It knows category tags and slot layouts, but nothing about
//! observers or visibility rules.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Changes are documented in `WIRE_FORMAT.md`.
//! - **Bounded decoding** - Every length field is checked against [`Limits`] before iteration.
//! - **Derived flags** - Movement update flags follow from content, never set by hand.
//!
//! # Example
//!
//! ```
//! use wire::{Block, BlockDecoder, Limits, Values};
//!
//! let mut values = Values::new(134);
//! values.insert(13, 80).unwrap();
//! let block = Block::Values { guid: 0x2A, values };
//! let bytes = block.to_bytes();
//!
//! let mut decoder = BlockDecoder::new(Limits::default());
//! let mut reader = bitstream::ByteReader::new(&bytes);
//! assert_eq!(decoder.decode(&mut reader).unwrap().guid(), 0x2A);
//! ```

mod batch;
mod block;
mod error;
mod guid;
mod limits;
mod mask;
mod movement;

pub use batch::{decode_batch, DecodedBatch, UpdateBatch};
pub use block::{Block, BlockDecoder, BlockKind, Values};
pub use error::{DecodeError, LimitKind, WireResult};
pub use guid::{packed_guid_len, read_packed_guid, write_packed_guid};
pub use limits::Limits;
pub use mask::{decode_mask, encode_mask, encoded_mask_len, mask_block_count, MAX_MASK_BLOCKS};
pub use movement::{LivingMotion, MotionCurve, Movement, MovementPayload, Position};

/// Size of a destroy block: tag, identifier, animation flag.
pub const DESTROY_BLOCK_SIZE: usize = 1 + 8 + 1;
