use std::collections::{BTreeMap, BTreeSet};

use codec::{BlockKind, EncodedBlock, Entity, HighGuid, ObjectGuid, ObserverProfile};
use proptest::prelude::*;
use repgraph::{Context, Distributor, RadiusQuery, ReplicationConfig, World};
use schema::slots::unit;
use schema::{Category, Layouts};
use wire::Position;

#[derive(Debug, Clone)]
enum Op {
    Spawn { wolf: u32, x: f32 },
    Despawn { wolf: u32, animated: bool },
    Health { wolf: u32, value: u32 },
    Move { wolf: u32, x: f32 },
    MoveObserver { observer: u32, x: f32 },
    Flush,
}

fn op() -> impl Strategy<Value = Op> {
    let wolf = 1u32..5;
    let x = (0u16..40).prop_map(|step| f32::from(step) * 10.0);
    prop_oneof![
        (wolf.clone(), x.clone()).prop_map(|(wolf, x)| Op::Spawn { wolf, x }),
        (wolf.clone(), any::<bool>()).prop_map(|(wolf, animated)| Op::Despawn { wolf, animated }),
        (wolf.clone(), 0u32..200).prop_map(|(wolf, value)| Op::Health { wolf, value }),
        (wolf, x.clone()).prop_map(|(wolf, x)| Op::Move { wolf, x }),
        (1u32..3, x).prop_map(|(observer, x)| Op::MoveObserver { observer, x }),
        Just(Op::Flush),
    ]
}

fn wolf_guid(counter: u32) -> ObjectGuid {
    ObjectGuid::new(HighGuid::Unit, 299, counter)
}

fn at(x: f32) -> Position {
    Position::new(x, 0.0, 0.0, 0.0)
}

/// Replays delivered blocks against the per-pair lifecycle.
fn check_order(log: &[(ObjectGuid, EncodedBlock)], known: &mut BTreeSet<(ObjectGuid, ObjectGuid)>) {
    for (observer, block) in log {
        let pair = (*observer, block.entity());
        match block.kind() {
            BlockKind::Create | BlockKind::CreateFull => {
                assert!(known.insert(pair), "second creation for {pair:?}");
            }
            BlockKind::Values | BlockKind::Movement => {
                assert!(known.contains(&pair), "update before creation for {pair:?}");
            }
            BlockKind::Destroy => {
                assert!(known.remove(&pair), "destroy without creation for {pair:?}");
            }
        }
    }
}

proptest! {
    #[test]
    fn blocks_follow_lifecycle_order(ops in prop::collection::vec(op(), 1..60)) {
        let layouts = Layouts::standard();
        let mut distributor = Distributor::new(ReplicationConfig::for_testing(), layouts.clone());
        let mut world = World::new();
        let spatial = RadiusQuery::new(60.0);
        let mut directory = BTreeMap::new();
        let mut log: Vec<(ObjectGuid, EncodedBlock)> = Vec::new();
        let mut known = BTreeSet::new();

        for counter in 1..3u32 {
            let guid = ObjectGuid::new(HighGuid::Player, 0, counter);
            directory.insert(guid, ObserverProfile::new(guid, 1, 1));
            distributor.register_observer(guid);
            let mut player = Entity::new(guid, layouts.get(Category::Player));
            player.set_position(at(f32::from(u16::try_from(counter).unwrap()) * 100.0));
            let mut ctx = Context::new(&spatial, &directory, &mut log);
            distributor.spawn(&mut world, player, &mut ctx);
        }

        for op in ops {
            let mut ctx = Context::new(&spatial, &directory, &mut log);
            match op {
                Op::Spawn { wolf, x } => {
                    let guid = wolf_guid(wolf);
                    if !world.contains(guid) {
                        let mut entity = Entity::new(guid, layouts.get(Category::Unit));
                        entity.set_position(at(x));
                        distributor.spawn(&mut world, entity, &mut ctx);
                    }
                }
                Op::Despawn { wolf, animated } => {
                    distributor.despawn(&mut world, wolf_guid(wolf), animated, &mut ctx);
                }
                Op::Health { wolf, value } => {
                    if let Some(entity) = world.get_mut(wolf_guid(wolf)) {
                        entity.set_u32(unit::HEALTH, value);
                    }
                }
                Op::Move { wolf, x } => {
                    if let Some(entity) = world.get_mut(wolf_guid(wolf)) {
                        entity.set_position(at(x));
                    }
                }
                Op::MoveObserver { observer, x } => {
                    let guid = ObjectGuid::new(HighGuid::Player, 0, observer);
                    if let Some(entity) = world.get_mut(guid) {
                        entity.set_position(at(x));
                    }
                    distributor.refresh_observer(&world, guid, &mut ctx);
                }
                Op::Flush => {
                    distributor.flush(&mut world, &mut ctx);
                    prop_assert!(world.pending().is_empty());
                }
            }
        }

        check_order(&log, &mut known);
        for (observer, entity) in &known {
            prop_assert!(distributor.awareness().is_aware(*observer, *entity));
        }
    }
}
