//! Structural actions on the containment graph.
//!
//! These follow a precondition discipline: callers check the matching
//! predicate first, and a call whose precondition fails is a silent no-op.

use vessel_domain::{
    mechanics, ContainmentEvent, EffectCue, EntityId, EntityKind, ModifierChannel, Position,
    StatusEffect,
};
use vessel_shared::ContainmentChanged;

use super::{Simulation, Topology};

/// Horizontal release impulse, pointing away from the holder.
const RELEASE_KNOCKBACK_X: f32 = 5.0;
/// Vertical release impulse.
const RELEASE_KNOCKBACK_Y: f32 = -2.5;

impl Simulation {
    // =========================================================================
    // Contain
    // =========================================================================

    /// Put `target` inside `holder`.
    ///
    /// Precondition: [`Simulation::can_contain`]. On a client replica the
    /// change is queued for the server when this participant originated it.
    pub fn contain(&mut self, holder: EntityId, target: EntityId) {
        if self.attach_edge(holder, target) {
            self.queue_sync(holder, target);
        }
    }

    /// Try to contain `target` on a roll against its opportunistic chance.
    ///
    /// Returns whether containment happened.
    pub fn attempt_opportunistic_contain(&mut self, holder: EntityId, target: EntityId) -> bool {
        if !self.can_opportunistic_contain(holder, target) {
            return false;
        }
        let chance = match (self.slot(holder), self.slot(target)) {
            (Some(h), Some(t)) => f64::from(t.entity.opportunistic_chance(h.entity.as_ref())),
            _ => return false,
        };
        if self.random.gen_unit() >= chance {
            return false;
        }
        self.contain(holder, target);
        self.graph.contains(holder, target)
    }

    /// Insert the edge and run the entry hooks. Never emits sync traffic.
    pub(crate) fn attach_edge(&mut self, holder: EntityId, target: EntityId) -> bool {
        if !self.slots.contains_key(&holder) || !self.slots.contains_key(&target) {
            tracing::debug!(holder = %holder, occupant = %target, "Contain skipped: entity not spawned");
            return false;
        }

        let outcome = self.graph.attach(holder, target);
        let vessel_domain::AttachOutcome::Attached { previous } = outcome else {
            tracing::debug!(holder = %holder, occupant = %target, outcome = ?outcome, "Contain refused by graph");
            return false;
        };

        if previous.is_some() {
            if let Some(slot) = self.slot_mut(target) {
                slot.entity.restore_state();
            }
        }
        self.reset_entity_state(target);

        if let Some(slot) = self.slot_mut(target) {
            let position = slot.entity.position();
            slot.state.save_position(position);
            slot.entity.backup_state();
            slot.entity.set_state_contained();
        }
        self.play_effect(holder, EffectCue::Contain);
        if let Some(slot) = self.slot_mut(target) {
            slot.entity.on_contained_by(holder);
        }

        tracing::debug!(holder = %holder, occupant = %target, "Entity contained");
        self.record(ContainmentEvent::Contained {
            holder,
            occupant: target,
        });
        true
    }

    fn queue_sync(&mut self, holder: EntityId, target: EntityId) {
        if self.topology != Topology::Client {
            return;
        }
        let (Some(h), Some(t)) = (self.slot(holder), self.slot(target)) else {
            return;
        };
        let originated_here = h.entity.is_locally_controlled()
            || (t.entity.is_locally_controlled() && holder.kind() == EntityKind::Creature);
        if originated_here {
            tracing::debug!(holder = %holder, occupant = %target, "Queued containment sync");
            self.outbound.push(ContainmentChanged::new(holder, target));
        }
    }

    // =========================================================================
    // Release
    // =========================================================================

    /// Let `target` out of `holder`.
    ///
    /// When `holder` is itself contained the occupant moves one level outward
    /// instead of reaching the world.
    pub fn release(&mut self, holder: EntityId, target: EntityId) {
        if !self.graph.contains(holder, target) {
            tracing::debug!(holder = %holder, occupant = %target, "Release skipped: not an occupant");
            return;
        }
        match self.graph.holder_of(holder) {
            Some(outer) => self.reparent(holder, outer, target),
            None => self.release_to_world(holder, target),
        }
    }

    /// Release the most recently contained occupant that may be released.
    pub fn release_last(&mut self, holder: EntityId) -> Option<EntityId> {
        let target = self
            .graph
            .occupants_of(holder)
            .iter()
            .rev()
            .copied()
            .find(|id| self.can_release(holder, *id))?;
        self.release(holder, target);
        Some(target)
    }

    /// Hand `occupant` from `from` to its outer holder `to`.
    ///
    /// A full outer holder cannot take it, so the occupant goes to the world.
    fn reparent(&mut self, from: EntityId, to: EntityId, occupant: EntityId) {
        if !self.has_room(to) {
            tracing::debug!(from = %from, to = %to, occupant = %occupant, "Outer holder full, releasing to world");
            self.release_to_world(from, occupant);
            return;
        }
        // Attaching moves the edge, so a refusal leaves the occupant where it was.
        self.contain(to, occupant);
        if !self.graph.contains(to, occupant) {
            tracing::warn!(from = %from, to = %to, occupant = %occupant, "Outward move refused");
            return;
        }
        tracing::debug!(from = %from, to = %to, occupant = %occupant, "Occupant moved outward");
        self.record(ContainmentEvent::Reparented { from, to, occupant });
    }

    fn release_to_world(&mut self, holder: EntityId, target: EntityId) {
        let Some((holder_position, holder_direction)) = self
            .slot(holder)
            .map(|slot| (slot.entity.position(), slot.entity.direction()))
        else {
            return;
        };

        let mut at = holder_position;
        if let Some(slot) = self.slot_mut(target) {
            slot.state.start_grace();
            slot.entity.restore_state();
            if let Some(saved) = slot.state.saved_position() {
                slot.entity.set_position(saved);
            }
            at = slot.entity.position();
            let away = knockback_direction(at.x - holder_position.x, holder_direction);
            slot.entity
                .knockback(Position::new(away * RELEASE_KNOCKBACK_X, RELEASE_KNOCKBACK_Y));
        }
        self.play_effect(holder, EffectCue::Release);
        self.graph.detach(holder, target);
        self.reset_entity_state(target);
        if let Some(slot) = self.slot_mut(target) {
            slot.entity.on_released_by(holder);
        }

        tracing::debug!(holder = %holder, occupant = %target, "Entity released");
        self.record(ContainmentEvent::Released {
            holder,
            occupant: target,
            at,
        });
    }

    // =========================================================================
    // Processing and disposal
    // =========================================================================

    /// Start processing `target`. Precondition: [`Simulation::can_process`].
    pub fn process(&mut self, holder: EntityId, target: EntityId) {
        if !self.graph.contains(holder, target) {
            return;
        }
        let started = match self.slot_mut(target) {
            Some(slot) if !slot.state.is_processing() => {
                slot.state.begin_processing();
                true
            }
            _ => false,
        };
        if started {
            tracing::debug!(holder = %holder, occupant = %target, "Processing started");
            self.record(ContainmentEvent::ProcessingStarted {
                holder,
                occupant: target,
            });
        }
    }

    /// Remove a fully processed occupant for good.
    ///
    /// Precondition: [`Simulation::can_finish`].
    pub fn dispose(&mut self, holder: EntityId, target: EntityId) {
        if !self.graph.contains(holder, target) {
            return;
        }
        let Some((disposal_point, accelerated, loot_chance)) =
            self.slot(holder).zip(self.slot(target)).map(|(h, t)| {
                (
                    h.entity.disposal_point(),
                    h.entity.has_status(StatusEffect::Accelerant),
                    mechanics::loot_chance(h.state.modifiers(), t.state.modifiers()),
                )
            })
        else {
            return;
        };

        if let Some(slot) = self.slot_mut(target) {
            slot.state.start_grace();
            slot.entity.restore_state();
            let position = slot.state.saved_position().unwrap_or(disposal_point);
            slot.entity.set_position(position);
        }
        self.play_effect(holder, EffectCue::Disposal);
        self.graph.detach(holder, target);
        self.reset_entity_state(target);

        if let Some(slot) = self.slot_mut(target) {
            slot.entity.on_disposed_by(holder);
        }
        if let Some(slot) = self.slot_mut(holder) {
            slot.entity.on_dispose(target);
        }

        let finishing_blow = self.settings.disposal.finishing_blow;
        let mut at = disposal_point;
        if let Some(slot) = self.slot_mut(target) {
            if finishing_blow {
                slot.entity.set_life(1);
                slot.entity.damage(holder, 1, 0.0);
            } else {
                slot.entity.set_life(0);
                slot.entity.kill(accelerated);
            }
            at = slot.entity.position();
        }

        tracing::info!(holder = %holder, occupant = %target, finishing_blow, "Entity disposed");
        self.record(ContainmentEvent::Disposed {
            holder,
            occupant: target,
            at,
        });
        self.roll_loot(holder, target, loot_chance, at);
    }

    // =========================================================================
    // Termination and modifiers
    // =========================================================================

    /// Cascade everything out of an entity that is leaving the simulation.
    ///
    /// Occupants move to the entity's own holder when it has one, otherwise
    /// they are released to the world. The entity itself is then released
    /// from its holder.
    pub fn handle_entity_termination(&mut self, entity: EntityId) {
        let occupants = self.graph.occupants_of(entity).to_vec();
        let outer = self.graph.holder_of(entity);
        if !occupants.is_empty() {
            tracing::debug!(entity = %entity, occupants = occupants.len(), "Cascading occupants of terminated entity");
        }
        for occupant in occupants {
            match outer {
                Some(outer) => self.reparent(entity, outer, occupant),
                None => self.release_to_world(entity, occupant),
            }
        }
        if let Some(outer) = self.graph.holder_of(entity) {
            self.release(outer, entity);
        }
    }

    /// Raise one modifier channel until the next reset.
    pub fn apply_modifier(&mut self, entity: EntityId, channel: ModifierChannel, level: i32) {
        if let Some(slot) = self.slot_mut(entity) {
            slot.state.modifiers_mut().raise(channel, level);
        }
    }
}

/// `1.0` or `-1.0`; falls back to the holder's facing when aligned.
fn knockback_direction(dx: f32, holder_direction: i32) -> f32 {
    if dx > 0.0 {
        1.0
    } else if dx < 0.0 {
        -1.0
    } else if holder_direction < 0 {
        -1.0
    } else {
        1.0
    }
}
