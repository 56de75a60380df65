//! Property tests: any sequence of guarded operations keeps the graph sound.

use proptest::prelude::*;
use vessel_domain::{Entity, EntityId, ModifierChannel, Modifiers};

use super::test_support::*;
use super::{Simulation, Topology};
use crate::adapters::Actor;
use crate::infrastructure::random::FixedRandom;

const POPULATION: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Contain(usize, usize),
    Opportunistic(usize, usize),
    Release(usize, usize),
    ReleaseLast(usize),
    Process(usize, usize),
    Dispose(usize, usize),
    Terminate(usize),
    Kill(usize),
    Caustic(usize, i32),
    Steps(usize),
}

fn slot() -> impl Strategy<Value = usize> {
    0..POPULATION
}

fn op_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            4 => (slot(), slot()).prop_map(|(h, t)| Op::Contain(h, t)),
            1 => (slot(), slot()).prop_map(|(h, t)| Op::Opportunistic(h, t)),
            2 => (slot(), slot()).prop_map(|(h, t)| Op::Release(h, t)),
            1 => slot().prop_map(Op::ReleaseLast),
            2 => (slot(), slot()).prop_map(|(h, t)| Op::Process(h, t)),
            1 => (slot(), slot()).prop_map(|(h, t)| Op::Dispose(h, t)),
            1 => slot().prop_map(Op::Terminate),
            1 => slot().prop_map(Op::Kill),
            1 => (slot(), 0..20i32).prop_map(|(e, level)| Op::Caustic(e, level)),
            3 => (1usize..120).prop_map(Op::Steps),
        ],
        1..40,
    )
}

fn population(sim: &mut Simulation) -> Vec<EntityId> {
    let caustic = |level| Modifiers::none().with(ModifierChannel::Caustic, level);
    vec![
        spawn(sim, Actor::player(0, "Ava").with_capacity(2).with_modifiers(caustic(3))),
        spawn(sim, Actor::player(1, "Bo").hostile().with_escape_limit(20)),
        spawn(sim, Actor::creature(0, "wolf").hostile().with_capacity(2).with_modifiers(caustic(8))),
        spawn(sim, Actor::creature(1, "rabbit").with_life(30).with_opportunistic_chance(0.5)),
        spawn(sim, Actor::creature(2, "hatchling").as_child().with_life(10)),
        spawn(sim, Actor::creature(3, "slime").hostile().with_capacity(3).with_escape_limit(5)),
    ]
}

fn apply(sim: &mut Simulation, ids: &[EntityId], op: &Op) {
    match *op {
        Op::Contain(h, t) => {
            if sim.can_contain(ids[h], ids[t]) {
                sim.contain(ids[h], ids[t]);
            }
        }
        Op::Opportunistic(h, t) => {
            sim.attempt_opportunistic_contain(ids[h], ids[t]);
        }
        Op::Release(h, t) => {
            if sim.can_release(ids[h], ids[t]) {
                sim.release(ids[h], ids[t]);
            }
        }
        Op::ReleaseLast(h) => {
            sim.release_last(ids[h]);
        }
        Op::Process(h, t) => {
            if sim.can_process(ids[h], ids[t]) {
                sim.process(ids[h], ids[t]);
            }
        }
        Op::Dispose(h, t) => {
            if sim.can_finish(ids[h], ids[t]) {
                sim.dispose(ids[h], ids[t]);
            }
        }
        Op::Terminate(e) => sim.handle_entity_termination(ids[e]),
        Op::Kill(e) => {
            if let Some(entity) = sim.entity_mut(ids[e]) {
                entity.kill(false);
            }
        }
        Op::Caustic(e, level) => sim.apply_modifier(ids[e], ModifierChannel::Caustic, level),
        Op::Steps(n) => {
            for _ in 0..n {
                sim.step();
                sim.despawn_invalid();
            }
        }
    }
}

fn check_invariants(sim: &Simulation) -> Result<(), TestCaseError> {
    prop_assert!(sim.graph().audit().is_ok(), "graph audit failed: {:?}", sim.graph().audit());
    for id in sim.ids() {
        let Some(entity) = sim.entity(id) else {
            continue;
        };
        let count = sim.occupant_count(id, false);
        prop_assert!(
            count <= entity.capacity(),
            "{} holds {} with capacity {}",
            id,
            count,
            entity.capacity()
        );

        let progress = sim.state(id).map(|s| s.digestion_progress()).unwrap_or_default();
        prop_assert!(progress >= 0);
        match sim.digestion_limit(id) {
            Some(limit) => prop_assert!(
                progress <= limit.max(0),
                "{} progress {} over limit {}",
                id,
                progress,
                limit
            ),
            None => prop_assert_eq!(progress, 0),
        }
        if !sim.is_contained(id) {
            prop_assert!(!sim.state(id).is_some_and(|s| s.is_processing()));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn guarded_operations_preserve_graph_invariants(
        ops in op_strategy(),
        roll in 0..100i32,
    ) {
        let mut sim = simulation(Topology::Standalone, quiet_settings(), FixedRandom(roll));
        let ids = population(&mut sim);

        for op in &ops {
            apply(&mut sim, &ids, op);
            check_invariants(&sim)?;
        }
    }
}
