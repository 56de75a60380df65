//! Simulation context.
//!
//! One [`Simulation`] exists per session and per participant. It owns the
//! entity arena, the containment graph and the settings, and is passed (by
//! `&mut`) to every entry point. Nothing here is shared across threads; the
//! runner drives it from a single task.
//!
//! ## Layout
//!
//! - `predicates` - the pure `can_*` / `should_*` gates
//! - `actions` - structural calls (`contain`, `release`, `dispose`, ...)
//! - `tick` - the per-step driver
//! - `effects` - weighted effect and loot selection
//! - `presentation` - read-only values for renderers

pub mod actions;
pub mod effects;
pub mod predicates;
pub mod presentation;
pub mod tick;

#[cfg(test)]
mod properties;
#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vessel_domain::{
    ContainmentEvent, ContainmentGraph, ContainmentSettings, DomainError, Entity, EntityId,
    EntityState,
};
use vessel_shared::ContainmentChanged;

use crate::infrastructure::ports::RandomPort;

/// Where this replica sits in a multiplayer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Single participant, nothing is replicated.
    #[default]
    Standalone,
    /// Authoritative server; relays containment changes between clients.
    Server,
    /// Client replica; emits containment changes it originates.
    Client,
}

/// An entity plus the core-owned state that travels with it.
struct Slot {
    entity: Box<dyn Entity>,
    state: EntityState,
}

/// Session-scoped simulation context.
pub struct Simulation {
    topology: Topology,
    settings: ContainmentSettings,
    random: Arc<dyn RandomPort>,
    slots: BTreeMap<EntityId, Slot>,
    graph: ContainmentGraph,
    events: Vec<ContainmentEvent>,
    outbound: Vec<ContainmentChanged>,
    step: u64,
}

impl Simulation {
    pub fn new(
        topology: Topology,
        settings: ContainmentSettings,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        tracing::info!(topology = ?topology, "Simulation session started");
        Self {
            topology,
            settings,
            random,
            slots: BTreeMap::new(),
            graph: ContainmentGraph::new(),
            events: Vec::new(),
            outbound: Vec::new(),
            step: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn settings(&self) -> &ContainmentSettings {
        &self.settings
    }

    #[inline]
    pub fn graph(&self) -> &ContainmentGraph {
        &self.graph
    }

    /// Number of completed steps.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Spawned ids in stable order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.keys().copied().collect()
    }

    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.slots.get(&id).map(|slot| slot.entity.as_ref())
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        self.slots
            .get_mut(&id)
            .map(|slot| &mut *slot.entity as &mut dyn Entity)
    }

    pub fn state(&self, id: EntityId) -> Option<&EntityState> {
        self.slots.get(&id).map(|slot| &slot.state)
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[ContainmentEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContainmentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Containment changes this replica must send to the server.
    pub fn drain_outbound(&mut self) -> Vec<ContainmentChanged> {
        std::mem::take(&mut self.outbound)
    }

    // =========================================================================
    // Population
    // =========================================================================

    /// Add an entity created by the outer world.
    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> Result<EntityId, DomainError> {
        let id = entity.id();
        if self.slots.contains_key(&id) {
            return Err(DomainError::validation(format!("{id} is already spawned")));
        }
        let state = EntityState::new(entity.base_modifiers());
        tracing::debug!(entity = %id, name = entity.name(), "Entity spawned");
        self.slots.insert(id, Slot { entity, state });
        Ok(id)
    }

    /// Remove an entity, cascading its occupants first.
    pub fn despawn(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        if !self.slots.contains_key(&id) {
            return None;
        }
        self.handle_entity_termination(id);
        self.graph.remove_entity(id);
        let slot = self.slots.remove(&id)?;
        tracing::debug!(entity = %id, "Entity despawned");
        Some(slot.entity)
    }

    /// Despawn every entity that is no longer valid.
    pub fn despawn_invalid(&mut self) -> Vec<Box<dyn Entity>> {
        let gone: Vec<EntityId> = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.entity.is_valid())
            .map(|(id, _)| *id)
            .collect();
        gone.into_iter().filter_map(|id| self.despawn(id)).collect()
    }

    /// Tear the session down: drop every edge and hand the entities back.
    pub fn end_session(mut self) -> Vec<Box<dyn Entity>> {
        for (holder, occupant) in self.graph.clear() {
            if let Some(slot) = self.slots.get_mut(&occupant) {
                slot.entity.restore_state();
                slot.state.reset_transient();
            }
            tracing::debug!(holder = %holder, occupant = %occupant, "Edge dropped at session end");
        }
        tracing::info!(entities = self.slots.len(), steps = self.step, "Simulation session ended");
        self.slots.into_values().map(|slot| slot.entity).collect()
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn slot(&self, id: EntityId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots.get_mut(&id)
    }

    fn is_valid(&self, id: EntityId) -> bool {
        self.slot(id).is_some_and(|slot| slot.entity.is_valid())
    }

    fn record(&mut self, event: ContainmentEvent) {
        self.events.push(event);
    }

    /// Clear per-edge state and recompute modifiers from the base set.
    fn reset_entity_state(&mut self, id: EntityId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.state.reset_transient();
            let base = slot.entity.base_modifiers();
            slot.state.set_modifiers(base);
        }
    }

    /// Uniform roll in `[0, bound)`; zero for empty ranges.
    fn roll_below(&self, bound: i32) -> i32 {
        if bound <= 0 {
            0
        } else {
            self.random.gen_range(0, bound - 1)
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("topology", &self.topology)
            .field("entities", &self.slots.len())
            .field("edges", &self.graph.edge_count())
            .field("step", &self.step)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::adapters::Actor;

    #[test]
    fn spawn_rejects_duplicate_ids() {
        let mut sim = quiet_simulation();
        sim.spawn(Box::new(Actor::creature(1, "slime"))).unwrap();
        let err = sim.spawn(Box::new(Actor::creature(1, "slime"))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(sim.len(), 1);
    }

    #[test]
    fn despawn_frees_occupants() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava").with_capacity(2));
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        sim.contain(a, b);

        let removed = sim.despawn(a).expect("spawned");
        assert_eq!(removed.id(), a);
        assert!(!sim.is_contained(b));
        assert!(sim.graph().audit().is_ok());
    }

    #[test]
    fn despawn_invalid_removes_dead_entities() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava"));
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        sim.entity_mut(b).unwrap().kill(false);

        let gone = sim.despawn_invalid();
        assert_eq!(gone.len(), 1);
        assert_eq!(sim.ids(), vec![a]);
    }

    #[test]
    fn end_session_restores_occupants() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava"));
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        sim.contain(a, b);

        let entities = sim.end_session();
        assert_eq!(entities.len(), 2);
    }
}
