use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context as _, Result};
use clap::Parser;
use codec::{class, race, Entity, HighGuid, ObjectGuid, ObserverProfile};
use crossbeam_channel::{Receiver, Sender};
use repgraph::{BatchSink, Context, Distributor, RadiusQuery, ReplicationConfig, World};
use schema::motion::living;
use schema::slots::unit;
use schema::{Category, Layouts};
use serde::Serialize;
use tools::CaptureWriter;
use tracing_subscriber::EnvFilter;
use wire::{decode_batch, BlockDecoder, BlockKind, Limits, Position};

const CREATURE_ENTRY: u32 = 299;
const WORLD_SIZE: f32 = 400.0;

#[derive(Parser)]
#[command(
    name = "demo-sim",
    version,
    about = "Deterministic demo capture generator"
)]
struct Cli {
    /// Number of connected players.
    #[arg(long, default_value_t = 8)]
    players: u32,
    /// Number of creatures.
    #[arg(long, default_value_t = 64)]
    creatures: u32,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 300)]
    ticks: u32,
    /// RNG seed for deterministic results.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Visibility radius of every player.
    #[arg(long, default_value_t = 80.0)]
    radius: f32,
    /// Optional JSON replication config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for captures.
    #[arg(long, default_value = "captures")]
    out_dir: PathBuf,
    /// Fail if average frame size exceeds this value.
    #[arg(long)]
    max_avg_frame_bytes: Option<u64>,
}

/// A batch frame on its way to the capture writer.
struct Frame {
    observer: ObjectGuid,
    bytes: Vec<u8>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReplicationConfig::default(),
    };
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir {}", cli.out_dir.display()))?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let out_dir = cli.out_dir.clone();
    let writer = thread::spawn(move || write_captures(&out_dir, &rx));

    let summary = simulate(&cli, config, &tx)?;
    drop(tx);
    let written = writer
        .join()
        .map_err(|_| anyhow::anyhow!("capture writer panicked"))??;
    tracing::info!(captures = written, frames = summary.frames, "captures written");

    summary.assert_budget(cli.max_avg_frame_bytes)?;
    write_summary_json(&cli.out_dir, &summary)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<ReplicationConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&contents).context("parse config json")
}

fn write_captures(out_dir: &Path, rx: &Receiver<Frame>) -> Result<usize> {
    let mut captures: BTreeMap<ObjectGuid, CaptureWriter> = BTreeMap::new();
    for frame in rx {
        captures
            .entry(frame.observer)
            .or_insert_with(|| CaptureWriter::new(frame.observer.raw()))
            .push_frame(&frame.bytes);
    }
    let count = captures.len();
    for (observer, capture) in captures {
        let path = out_dir.join(format!("observer_{:06}.vcap", observer.counter()));
        fs::write(&path, capture.finish()).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(count)
}

fn write_summary_json(out_dir: &Path, summary: &Summary) -> Result<()> {
    let path = out_dir.join("summary.json");
    let contents = serde_json::to_string_pretty(summary).context("serialize summary")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

struct Sim {
    layouts: Layouts,
    distributor: Distributor,
    world: World,
    spatial: RadiusQuery,
    directory: BTreeMap<ObjectGuid, ObserverProfile>,
    sink: BatchSink,
    decoders: BTreeMap<ObjectGuid, BlockDecoder>,
    rng: Rng,
}

fn player_guid(index: u32) -> ObjectGuid {
    ObjectGuid::new(HighGuid::Player, 0, index + 1)
}

fn creature_guid(index: u32) -> ObjectGuid {
    ObjectGuid::new(HighGuid::Unit, CREATURE_ENTRY, index + 1)
}

fn simulate(cli: &Cli, config: ReplicationConfig, tx: &Sender<Frame>) -> Result<Summary> {
    let layouts = Layouts::standard();
    let mut sim = Sim {
        distributor: Distributor::new(config, layouts.clone()),
        layouts,
        world: World::new(),
        spatial: RadiusQuery::new(cli.radius),
        directory: BTreeMap::new(),
        sink: BatchSink::new(),
        decoders: BTreeMap::new(),
        rng: Rng::new(cli.seed),
    };
    let mut summary = Summary::new(cli);

    for index in 0..cli.players {
        sim.connect(player_guid(index), index);
    }
    for index in 0..cli.creatures {
        sim.spawn_creature(creature_guid(index));
    }
    sim.ship(tx, &mut summary)?;

    for tick in 1..=cli.ticks {
        sim.step_players(cli.players);
        sim.step_creatures(cli.creatures);
        let mut ctx = Context::new(&sim.spatial, &sim.directory, &mut sim.sink);
        let stats = sim.distributor.flush(&mut sim.world, &mut ctx);
        tracing::debug!(tick, blocks = stats.total_blocks(), bytes = stats.total_bytes(), "tick");
        sim.ship(tx, &mut summary)?;
    }

    summary.finalize();
    Ok(summary)
}

impl Sim {
    fn connect(&mut self, guid: ObjectGuid, index: u32) {
        let (player_race, player_class) = if index % 2 == 0 {
            (race::HUMAN, class::WARRIOR)
        } else {
            (race::ORC, class::HUNTER)
        };
        self.directory
            .insert(guid, ObserverProfile::new(guid, player_race, player_class));
        self.distributor.register_observer(guid);

        let mut player = Entity::new(guid, self.layouts.get(Category::Player));
        player.set_position(self.rng.position());
        player.set_u32(unit::HEALTH, 1000);
        player.set_u32(unit::MAX_HEALTH, 1000);
        if let Some(faction) = race::faction(player_race) {
            player.set_u32(unit::FACTION_TEMPLATE, faction);
        }
        player.set_speed(usize::from(living::SPEED_RUN - living::SPEED_WALK), 7.0);
        let mut ctx = Context::new(&self.spatial, &self.directory, &mut self.sink);
        self.distributor.spawn(&mut self.world, player, &mut ctx);
    }

    fn spawn_creature(&mut self, guid: ObjectGuid) {
        let mut creature = Entity::new(guid, self.layouts.get(Category::Unit));
        let max = 50 + self.rng.below(200);
        creature.set_u32(unit::HEALTH, max);
        creature.set_u32(unit::MAX_HEALTH, max);
        creature.set_u32(unit::LEVEL, 1 + self.rng.below(60));
        creature.set_position(self.rng.position());
        let mut ctx = Context::new(&self.spatial, &self.directory, &mut self.sink);
        self.distributor.spawn(&mut self.world, creature, &mut ctx);
    }

    fn step_players(&mut self, players: u32) {
        for index in 0..players {
            let guid = player_guid(index);
            let moved = self.world.get_mut(guid).is_some_and(|player| {
                let Some(at) = player.position() else {
                    return false;
                };
                let next = self.rng.wander(at, 4.0);
                player.set_position(next)
            });
            if moved {
                let mut ctx = Context::new(&self.spatial, &self.directory, &mut self.sink);
                self.distributor
                    .refresh_observer(&self.world, guid, &mut ctx);
            }
        }
    }

    fn step_creatures(&mut self, creatures: u32) {
        for index in 0..creatures {
            let guid = creature_guid(index);
            if !self.world.contains(guid) {
                if self.rng.below(10) == 0 {
                    self.spawn_creature(guid);
                }
                continue;
            }
            let roll = self.rng.below(100);
            if roll == 0 {
                let mut ctx = Context::new(&self.spatial, &self.directory, &mut self.sink);
                self.distributor
                    .despawn(&mut self.world, guid, true, &mut ctx);
                continue;
            }
            let Some(creature) = self.world.get_mut(guid) else {
                continue;
            };
            if roll < 30 {
                if let Some(at) = creature.position() {
                    creature.set_position(self.rng.wander(at, 2.0));
                }
            }
            if roll % 7 == 0 {
                let delta = i32::try_from(self.rng.below(20)).unwrap_or(0) - 10;
                let max = creature.get_u32(unit::MAX_HEALTH);
                let health = creature.get_u32(unit::HEALTH);
                if health.saturating_add_signed(delta) <= max {
                    creature.apply_mod_u32(unit::HEALTH, delta);
                }
            }
        }
    }

    /// Sends this tick's frames to the writer, decoding each one first.
    fn ship(&mut self, tx: &Sender<Frame>, summary: &mut Summary) -> Result<()> {
        for (observer, bytes) in self.sink.drain() {
            let decoder = self
                .decoders
                .entry(observer)
                .or_insert_with(|| BlockDecoder::new(Limits::default()));
            let batch = decode_batch(&bytes, decoder)
                .with_context(|| format!("decode frame for {observer}"))?;
            for block in &batch.blocks {
                summary.push_block(block.kind());
            }
            summary.push_frame(bytes.len() as u64);
            tx.send(Frame { observer, bytes })
                .context("capture writer hung up")?;
        }
        Ok(())
    }
}

struct Rng {
    state: u64,
}

impl Rng {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound.max(1)
    }

    /// Uniform in `[0, 1)` with 16 bits of resolution.
    fn unit(&mut self) -> f32 {
        f32::from(u16::try_from(self.next_u32() >> 16).unwrap_or(0)) / 65_536.0
    }

    fn position(&mut self) -> Position {
        Position::new(self.unit() * WORLD_SIZE, self.unit() * WORLD_SIZE, 0.0, 0.0)
    }

    fn wander(&mut self, at: Position, step: f32) -> Position {
        let dx = (self.unit() * 2.0 - 1.0) * step;
        let dy = (self.unit() * 2.0 - 1.0) * step;
        Position::new(
            (at.x + dx).clamp(0.0, WORLD_SIZE),
            (at.y + dy).clamp(0.0, WORLD_SIZE),
            at.z,
            (at.orientation + 0.1) % std::f32::consts::TAU,
        )
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    players: u32,
    creatures: u32,
    ticks: u32,
    seed: u64,
    radius: f32,
    frames: u64,
    bytes_total: u64,
    avg_frame_bytes: u64,
    p95_frame_bytes: u64,
    blocks: BTreeMap<String, u64>,
    #[serde(skip)]
    frame_sizes: Vec<u64>,
}

impl Summary {
    fn new(cli: &Cli) -> Self {
        Self {
            players: cli.players,
            creatures: cli.creatures,
            ticks: cli.ticks,
            seed: cli.seed,
            radius: cli.radius,
            frames: 0,
            bytes_total: 0,
            avg_frame_bytes: 0,
            p95_frame_bytes: 0,
            blocks: BTreeMap::new(),
            frame_sizes: Vec::new(),
        }
    }

    fn push_frame(&mut self, bytes: u64) {
        self.frames += 1;
        self.bytes_total += bytes;
        self.frame_sizes.push(bytes);
    }

    fn push_block(&mut self, kind: BlockKind) {
        *self.blocks.entry(kind.name().to_string()).or_default() += 1;
    }

    fn finalize(&mut self) {
        if self.frames > 0 {
            self.avg_frame_bytes = self.bytes_total / self.frames;
            self.frame_sizes.sort_unstable();
            let len = self.frame_sizes.len();
            let idx = (len * 95).div_ceil(100);
            let idx = idx.saturating_sub(1).min(len - 1);
            self.p95_frame_bytes = self.frame_sizes[idx];
        }
    }

    fn assert_budget(&self, max_avg: Option<u64>) -> Result<()> {
        if let Some(max_avg) = max_avg {
            if self.avg_frame_bytes > max_avg {
                anyhow::bail!(
                    "avg frame bytes {} exceeds budget {}",
                    self.avg_frame_bytes,
                    max_avg
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let at = a.position();
        assert!((0.0..=WORLD_SIZE).contains(&at.x));
    }

    #[test]
    fn summary_percentile() {
        let cli = Cli::parse_from(["demo-sim"]);
        let mut summary = Summary::new(&cli);
        for bytes in 1..=100 {
            summary.push_frame(bytes);
        }
        summary.finalize();
        assert_eq!(summary.avg_frame_bytes, 50);
        assert_eq!(summary.p95_frame_bytes, 95);
        assert!(summary.assert_budget(Some(49)).is_err());
    }

    #[test]
    fn short_run_produces_frames() {
        let cli = Cli::parse_from(["demo-sim", "--players", "2", "--creatures", "8", "--ticks", "20"]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let summary = simulate(&cli, ReplicationConfig::default(), &tx).unwrap();
        drop(tx);
        assert_eq!(rx.iter().count() as u64, summary.frames);
        assert!(summary.blocks.contains_key("create_full"));
    }
}
