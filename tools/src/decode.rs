//! Structured decoding of captures for JSON and human-readable output.

use std::fmt::Write as _;

use schema::Category;
use serde::Serialize;
use wire::{decode_batch, Block, BlockDecoder, Limits, Movement, MovementPayload, Values};

use crate::capture::{read_capture, CaptureError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureJson {
    pub observer: String,
    pub frames: Vec<FrameJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameJson {
    pub index: usize,
    pub bytes: usize,
    pub out_of_range: Vec<String>,
    pub blocks: Vec<BlockJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockJson {
    Create {
        full: bool,
        guid: String,
        category: Category,
        movement: Movement,
        values: Vec<SlotJson>,
    },
    Values {
        guid: String,
        values: Vec<SlotJson>,
    },
    Movement {
        guid: String,
        movement: Movement,
    },
    Destroy {
        guid: String,
        animated: bool,
    },
}

/// One attribute word; `float` is the same bits read as `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotJson {
    pub slot: usize,
    pub raw: u32,
    pub float: f32,
}

fn guid_string(guid: u64) -> String {
    format!("0x{guid:016X}")
}

fn slots(values: &Values) -> Vec<SlotJson> {
    values
        .iter()
        .map(|(slot, raw)| SlotJson {
            slot,
            raw,
            float: f32::from_bits(raw),
        })
        .collect()
}

impl From<Block> for BlockJson {
    fn from(block: Block) -> Self {
        match block {
            Block::Create {
                full,
                guid,
                category,
                movement,
                values,
            } => Self::Create {
                full,
                guid: guid_string(guid),
                category,
                movement,
                values: slots(&values),
            },
            Block::Values { guid, values } => Self::Values {
                guid: guid_string(guid),
                values: slots(&values),
            },
            Block::Movement { guid, movement } => Self::Movement {
                guid: guid_string(guid),
                movement,
            },
            Block::Destroy { guid, animated } => Self::Destroy {
                guid: guid_string(guid),
                animated,
            },
        }
    }
}

/// Decodes every frame of a capture with one stateful decoder.
pub fn decode_capture_json(bytes: &[u8], limits: &Limits) -> Result<CaptureJson, CaptureError> {
    let capture = read_capture(bytes, limits)?;
    let mut decoder = BlockDecoder::new(limits.clone());
    let mut frames = Vec::with_capacity(capture.frames.len());
    for (index, frame) in capture.frames.iter().enumerate() {
        let batch = decode_batch(frame, &mut decoder)
            .map_err(|source| CaptureError::Frame { index, source })?;
        frames.push(FrameJson {
            index,
            bytes: frame.len(),
            out_of_range: batch.out_of_range.into_iter().map(guid_string).collect(),
            blocks: batch.blocks.into_iter().map(BlockJson::from).collect(),
        });
    }
    Ok(CaptureJson {
        observer: guid_string(capture.observer),
        frames,
    })
}

fn describe_movement(movement: &Movement) -> String {
    let mut out = String::new();
    if movement.is_self {
        out.push_str("self ");
    }
    match &movement.payload {
        MovementPayload::None => out.push_str("no position"),
        MovementPayload::Living(living) => {
            let at = living.position;
            let _ = write!(
                out,
                "living ({:.2}, {:.2}, {:.2}) facing {:.2}",
                at.x, at.y, at.z, at.orientation
            );
            if let Some(curve) = &living.curve {
                let _ = write!(out, " curve {} points", curve.points.len());
            }
        }
        MovementPayload::Stationary(at) => {
            let _ = write!(
                out,
                "stationary ({:.2}, {:.2}, {:.2}) facing {:.2}",
                at.x, at.y, at.z, at.orientation
            );
        }
    }
    out
}

fn describe_slots(out: &mut String, values: &[SlotJson]) {
    for value in values {
        let _ = writeln!(out, "      [{}] = {} ({})", value.slot, value.raw, value.float);
    }
}

/// Renders a decoded capture for terminals.
#[must_use]
pub fn format_decode_pretty(capture: &CaptureJson) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "observer {} ({} frames)",
        capture.observer,
        capture.frames.len()
    );
    for frame in &capture.frames {
        let _ = writeln!(
            out,
            "frame {} ({} bytes, {} blocks)",
            frame.index,
            frame.bytes,
            frame.blocks.len()
        );
        if !frame.out_of_range.is_empty() {
            let _ = writeln!(out, "  out of range: {}", frame.out_of_range.join(", "));
        }
        for block in &frame.blocks {
            match block {
                BlockJson::Create {
                    full,
                    guid,
                    category,
                    movement,
                    values,
                } => {
                    let kind = if *full { "create_full" } else { "create" };
                    let _ = writeln!(out, "  {kind} {guid} {category}");
                    let _ = writeln!(out, "    movement: {}", describe_movement(movement));
                    let _ = writeln!(out, "    values: {}", values.len());
                    describe_slots(&mut out, values);
                }
                BlockJson::Values { guid, values } => {
                    let _ = writeln!(out, "  values {guid}: {}", values.len());
                    describe_slots(&mut out, values);
                }
                BlockJson::Movement { guid, movement } => {
                    let _ = writeln!(out, "  movement {guid}: {}", describe_movement(movement));
                }
                BlockJson::Destroy { guid, animated } => {
                    let style = if *animated { "animated" } else { "abrupt" };
                    let _ = writeln!(out, "  destroy {guid} ({style})");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureWriter;
    use wire::{Position, UpdateBatch};

    fn sample_capture() -> Vec<u8> {
        let mut values = Values::new(8);
        values.insert(2, 1).unwrap();
        values.insert(4, 1.5f32.to_bits()).unwrap();
        let create = Block::Create {
            full: true,
            guid: 0x10,
            category: Category::GameObject,
            movement: Movement {
                payload: MovementPayload::Stationary(Position::new(1.0, 2.0, 3.0, 0.5)),
                ..Movement::default()
            },
            values,
        };
        let mut first = UpdateBatch::new();
        first.push_block(&create.to_bytes());
        let mut second = UpdateBatch::new();
        second.push_out_of_range(0x20);
        second.push_block(
            &Block::Destroy {
                guid: 0x10,
                animated: false,
            }
            .to_bytes(),
        );

        let mut writer = CaptureWriter::new(1);
        writer.push_frame(&first.encode());
        writer.push_frame(&second.encode());
        writer.finish()
    }

    #[test]
    fn decodes_every_frame() {
        let capture = decode_capture_json(&sample_capture(), &Limits::default()).unwrap();
        assert_eq!(capture.observer, "0x0000000000000001");
        assert_eq!(capture.frames.len(), 2);
        match &capture.frames[0].blocks[..] {
            [BlockJson::Create {
                full: true,
                category: Category::GameObject,
                values,
                ..
            }] => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[1].float, 1.5);
            }
            other => panic!("unexpected blocks {other:?}"),
        }
        assert_eq!(capture.frames[1].out_of_range, vec!["0x0000000000000020"]);
    }

    #[test]
    fn json_tags_blocks_by_kind() {
        let capture = decode_capture_json(&sample_capture(), &Limits::default()).unwrap();
        let json = serde_json::to_value(&capture).unwrap();
        assert_eq!(json["frames"][0]["blocks"][0]["kind"], "create");
        assert_eq!(json["frames"][1]["blocks"][0]["kind"], "destroy");
        assert_eq!(json["frames"][1]["blocks"][0]["animated"], false);
    }

    #[test]
    fn pretty_output_lists_blocks() {
        let capture = decode_capture_json(&sample_capture(), &Limits::default()).unwrap();
        let text = format_decode_pretty(&capture);
        assert!(text.contains("create_full 0x0000000000000010"));
        assert!(text.contains("stationary (1.00, 2.00, 3.00)"));
        assert!(text.contains("destroy 0x0000000000000010 (abrupt)"));
        assert!(text.contains("out of range: 0x0000000000000020"));
    }
}
