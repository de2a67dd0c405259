//! Movement sub-block: update flags, kinematic payload and trailers.

use bitstream::{ByteReader, ByteWriter};
use schema::motion::living::SPEED_COUNT;
use schema::{CurveFlags, MoveFlags, UpdateFlags};

use crate::error::{check_limit, DecodeError, LimitKind, WireResult};
use crate::guid::{read_packed_guid, write_packed_guid};
use crate::limits::Limits;

/// World position and facing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub orientation: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, orientation: f32) -> Self {
        Self {
            x,
            y,
            z,
            orientation,
        }
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_f32(self.x);
        writer.write_f32(self.y);
        writer.write_f32(self.z);
        writer.write_f32(self.orientation);
    }

    fn decode(reader: &mut ByteReader<'_>) -> WireResult<Self> {
        Ok(Self {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
            z: reader.read_f32()?,
            orientation: reader.read_f32()?,
        })
    }
}

/// An active path handed over by the movement collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionCurve {
    pub flags: CurveFlags,
    /// Milliseconds already travelled.
    pub elapsed: u32,
    /// Total duration in milliseconds.
    pub duration: u32,
    pub id: u32,
    pub points: Vec<[f32; 3]>,
    pub destination: [f32; 3],
}

impl MotionCurve {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.flags.raw());
        writer.write_u32(self.elapsed);
        writer.write_u32(self.duration);
        writer.write_u32(self.id);
        writer.write_u32(u32::try_from(self.points.len()).unwrap_or(u32::MAX));
        for point in &self.points {
            write_vec3(writer, *point);
        }
        write_vec3(writer, self.destination);
    }

    fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> WireResult<Self> {
        let flags = CurveFlags::from_raw(reader.read_u32()?);
        let elapsed = reader.read_u32()?;
        let duration = reader.read_u32()?;
        let id = reader.read_u32()?;
        let count = reader.read_u32()? as usize;
        check_limit(LimitKind::CurvePoints, limits.max_curve_points, count)?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(read_vec3(reader)?);
        }
        let destination = read_vec3(reader)?;
        Ok(Self {
            flags,
            elapsed,
            duration,
            id,
            points,
            destination,
        })
    }
}

/// Full kinematic state of a living entity.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivingMotion {
    /// Movement flags; `SPLINE_ENABLED` is driven by `curve` on encode.
    pub move_flags: MoveFlags,
    pub time: u32,
    pub position: Position,
    pub fall_time: u32,
    /// Walk, run, run-back, swim, swim-back, flight, flight-back, turn rate,
    /// pitch rate.
    pub speeds: [f32; SPEED_COUNT],
    pub curve: Option<MotionCurve>,
}

/// Positional payload of a movement sub-block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPayload {
    /// Non-positional categories (items, containers).
    #[default]
    None,
    Living(LivingMotion),
    Stationary(Position),
}

/// Movement sub-block of a creation or movement block.
///
/// The update flags are derived from the content, so they cannot disagree
/// with what follows them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    /// The receiving observer is the entity itself.
    pub is_self: bool,
    pub payload: MovementPayload,
    pub low_guid: Option<u32>,
    pub attacking_target: Option<u64>,
}

impl Movement {
    /// Update flags announcing this sub-block's sections.
    #[must_use]
    pub fn update_flags(&self) -> UpdateFlags {
        let payload_bit = match self.payload {
            MovementPayload::None => 0,
            MovementPayload::Living(_) => UpdateFlags::LIVING,
            MovementPayload::Stationary(_) => UpdateFlags::HAS_POSITION,
        };
        UpdateFlags::default()
            .toggled(UpdateFlags::SELF, self.is_self)
            .with(payload_bit)
            .toggled(UpdateFlags::LOW_GUID, self.low_guid.is_some())
            .toggled(
                UpdateFlags::HAS_ATTACKING_TARGET,
                self.attacking_target.is_some(),
            )
    }

    /// Position carried by the payload, if any.
    #[must_use]
    pub const fn position(&self) -> Option<&Position> {
        match &self.payload {
            MovementPayload::None => None,
            MovementPayload::Living(living) => Some(&living.position),
            MovementPayload::Stationary(position) => Some(position),
        }
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.update_flags().raw());
        match &self.payload {
            MovementPayload::None => {}
            MovementPayload::Living(living) => {
                let move_flags = living
                    .move_flags
                    .toggled(MoveFlags::SPLINE_ENABLED, living.curve.is_some());
                writer.write_u32(move_flags.raw());
                writer.write_u32(living.time);
                living.position.encode(writer);
                writer.write_u32(living.fall_time);
                for speed in living.speeds {
                    writer.write_f32(speed);
                }
                if let Some(curve) = &living.curve {
                    curve.encode(writer);
                }
            }
            MovementPayload::Stationary(position) => position.encode(writer),
        }
        if let Some(low) = self.low_guid {
            writer.write_u32(low);
        }
        if let Some(target) = self.attacking_target {
            write_packed_guid(writer, target);
        }
    }

    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> WireResult<Self> {
        let raw = reader.read_u16()?;
        let flags = UpdateFlags::from_raw(raw);
        if flags.raw() & !UpdateFlags::KNOWN != 0 {
            return Err(DecodeError::UnknownUpdateFlags { flags: raw });
        }
        if flags.contains(UpdateFlags::LIVING | UpdateFlags::HAS_POSITION) {
            return Err(DecodeError::ConflictingPayload { flags: raw });
        }

        let payload = if flags.contains(UpdateFlags::LIVING) {
            let move_flags = MoveFlags::from_raw(reader.read_u32()?);
            let time = reader.read_u32()?;
            let position = Position::decode(reader)?;
            let fall_time = reader.read_u32()?;
            let mut speeds = [0.0; SPEED_COUNT];
            for speed in &mut speeds {
                *speed = reader.read_f32()?;
            }
            let curve = if move_flags.contains(MoveFlags::SPLINE_ENABLED) {
                Some(MotionCurve::decode(reader, limits)?)
            } else {
                None
            };
            MovementPayload::Living(LivingMotion {
                move_flags,
                time,
                position,
                fall_time,
                speeds,
                curve,
            })
        } else if flags.contains(UpdateFlags::HAS_POSITION) {
            MovementPayload::Stationary(Position::decode(reader)?)
        } else {
            MovementPayload::None
        };

        let low_guid = if flags.contains(UpdateFlags::LOW_GUID) {
            Some(reader.read_u32()?)
        } else {
            None
        };
        let attacking_target = if flags.contains(UpdateFlags::HAS_ATTACKING_TARGET) {
            Some(read_packed_guid(reader)?)
        } else {
            None
        };

        Ok(Self {
            is_self: flags.contains(UpdateFlags::SELF),
            payload,
            low_guid,
            attacking_target,
        })
    }
}

fn write_vec3(writer: &mut ByteWriter, v: [f32; 3]) {
    for component in v {
        writer.write_f32(component);
    }
}

fn read_vec3(reader: &mut ByteReader<'_>) -> WireResult<[f32; 3]> {
    Ok([reader.read_f32()?, reader.read_f32()?, reader.read_f32()?])
}
