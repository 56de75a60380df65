//! Shared builders for simulation tests.

use std::sync::Arc;

use vessel_domain::{ContainmentSettings, EffectCatalog, Entity, EntityId};

use super::{Simulation, Topology};
use crate::adapters::Actor;
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::random::FixedRandom;

/// Settings with every effect category removed so no rolls are spent on them.
pub(crate) fn quiet_settings() -> ContainmentSettings {
    ContainmentSettings {
        effects: EffectCatalog::silent(),
        ..ContainmentSettings::default()
    }
}

pub(crate) fn simulation(
    topology: Topology,
    settings: ContainmentSettings,
    random: impl RandomPort + 'static,
) -> Simulation {
    Simulation::new(topology, settings, Arc::new(random))
}

pub(crate) fn quiet_simulation() -> Simulation {
    simulation(Topology::Standalone, quiet_settings(), FixedRandom(0))
}

pub(crate) fn spawn(sim: &mut Simulation, actor: Actor) -> EntityId {
    sim.spawn(Box::new(actor)).expect("unique id")
}

pub(crate) fn life(sim: &Simulation, id: EntityId) -> i32 {
    sim.entity(id).map(|e| e.life()).unwrap_or_default()
}

pub(crate) fn progress(sim: &Simulation, id: EntityId) -> i32 {
    sim.state(id).map(|s| s.digestion_progress()).unwrap_or_default()
}

pub(crate) fn run_steps(sim: &mut Simulation, steps: usize) {
    for _ in 0..steps {
        sim.step();
    }
}

impl Simulation {
    pub(crate) fn set_progress_for_test(&mut self, id: EntityId, progress: i32) {
        let limit = self.digestion_limit(id).unwrap_or(progress);
        if let Some(slot) = self.slot_mut(id) {
            let current = slot.state.digestion_progress();
            slot.state.shift_progress(progress - current, limit);
        }
    }

    /// Swap the entity behind `id`, keeping its core state and graph edges.
    pub(crate) fn replace_entity_for_test(&mut self, id: EntityId, entity: Box<dyn Entity>) {
        if let Some(slot) = self.slot_mut(id) {
            slot.entity = entity;
        }
    }
}
