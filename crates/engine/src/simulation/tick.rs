//! Per-step driver.
//!
//! A step runs in two passes over every spawned entity in id order: the
//! consistency sweep first, then the update. Splitting the passes keeps
//! modifier levels stable while any entity reads its partner's.

use vessel_domain::{
    mechanics::{self, DigestionInputs, StruggleOutcome},
    ContainmentEvent, EffectCue, EntityId, EntityState, StatusEffect,
};

use super::Simulation;

impl Simulation {
    /// Advance the whole population by one simulation step.
    pub fn step(&mut self) {
        self.step += 1;
        let ids = self.ids();
        for id in &ids {
            self.sweep_entity(*id);
        }
        for id in &ids {
            self.update_entity(*id);
        }
    }

    // =========================================================================
    // Sweep
    // =========================================================================

    /// Drop references to entities that are gone and rebuild modifiers.
    fn sweep_entity(&mut self, id: EntityId) {
        if !self.is_valid(id) {
            return;
        }
        let stale: Vec<EntityId> = self
            .graph
            .occupants_of(id)
            .iter()
            .copied()
            .filter(|occupant| !self.is_valid(*occupant))
            .collect();
        for occupant in stale {
            self.prune_edge(id, occupant, occupant);
        }
        if let Some(holder) = self.graph.holder_of(id) {
            if !self.is_valid(holder) {
                self.prune_edge(holder, id, holder);
            }
        }
        if let Some(slot) = self.slot_mut(id) {
            let base = slot.entity.base_modifiers();
            slot.state.set_modifiers(base);
        }
        // The holder's limit may have shrunk since the last step.
        if let Some(limit) = self.digestion_limit(id) {
            if let Some(slot) = self.slot_mut(id) {
                slot.state.clamp_progress(limit);
            }
        }
    }

    fn prune_edge(&mut self, holder: EntityId, occupant: EntityId, gone: EntityId) {
        if !self.graph.detach(holder, occupant).is_detached() {
            return;
        }
        if let Some(slot) = self.slot_mut(occupant) {
            slot.entity.restore_state();
        }
        self.reset_entity_state(occupant);
        tracing::debug!(holder = %holder, occupant = %occupant, gone = %gone, "Pruned stale containment edge");
        self.record(ContainmentEvent::Pruned { entity: gone });
    }

    // =========================================================================
    // Update
    // =========================================================================

    fn update_entity(&mut self, id: EntityId) {
        if !self.is_valid(id) {
            return;
        }

        // Pin to the holder
        if let Some(point) = self
            .holder_of(id)
            .and_then(|holder| self.slot(holder))
            .map(|holder| holder.entity.containment_point())
        {
            if let Some(slot) = self.slot_mut(id) {
                slot.entity.set_state_contained();
                slot.entity.set_position(point);
            }
        }

        if self.has_occupants(id) {
            self.tick_ambience(id);
            for occupant in self.occupants(id, false) {
                if self.should_process(id, occupant) {
                    self.process(id, occupant);
                }
                if self.should_finish(id, occupant) {
                    self.dispose(id, occupant);
                }
            }
        }

        let child = self.is_child(id);

        if self.is_contained(id)
            && !self.is_processing(id)
            && !child
            && self.advance_timer(id, |s| s.advance_regen())
        {
            self.regenerate(id);
        }

        if let Some(holder) = self.holder_of(id) {
            let duration = mechanics::slow_duration(self.digestion_ratio(id));
            if let Some(slot) = self.slot_mut(holder) {
                slot.entity.apply_status(StatusEffect::Slowed, duration);
            }
        }

        if self.is_processing(id) && !child {
            if self.advance_timer(id, |s| s.advance_digest()) {
                self.digest(id);
            }
            self.grant_satiated(id);
        }

        if self.should_struggle(id)
            && !child
            && self.advance_timer(id, |s| s.advance_struggle())
        {
            self.struggle(id);
        }

        if let Some(slot) = self.slot_mut(id) {
            slot.state.tick_grace();
        }

        let target: f32 = self
            .occupants(id, false)
            .into_iter()
            .filter_map(|occupant| {
                let slot = self.slot(occupant)?;
                Some(mechanics::fullness_contribution(
                    slot.entity.size_factor(),
                    self.digestion_ratio(occupant),
                    slot.entity.life_ratio(),
                ))
            })
            .sum();
        if let Some(slot) = self.slot_mut(id) {
            slot.state.ease_fullness(target);
        }
    }

    fn advance_timer(
        &mut self,
        id: EntityId,
        advance: impl FnOnce(&mut EntityState) -> bool,
    ) -> bool {
        self.slot_mut(id).is_some_and(|slot| advance(&mut slot.state))
    }

    fn tick_ambience(&mut self, holder: EntityId) {
        if !self.advance_timer(holder, |s| s.advance_noise()) {
            return;
        }
        let (min, max) = mechanics::ambient_interval_bounds(self.processing_any(holder));
        let interval = self.random.gen_range(min, max - 1);
        if let Some(slot) = self.slot_mut(holder) {
            slot.state.set_noise_interval(interval);
        }
        self.play_effect(holder, EffectCue::Ambient);
    }

    // =========================================================================
    // Sub-routines
    // =========================================================================

    /// Passive top-up shared by an occupant and its holder.
    fn regenerate(&mut self, occupant: EntityId) {
        let Some(holder) = self.holder_of(occupant) else {
            return;
        };
        let Some(regen) = self
            .slot(holder)
            .zip(self.slot(occupant))
            .map(|(h, o)| mechanics::regeneration(h.state.modifiers(), o.state.modifiers()))
        else {
            return;
        };
        for id in [occupant, holder] {
            if let Some(slot) = self.slot_mut(id) {
                let entity = &mut slot.entity;
                entity.set_life(mechanics::top_up(entity.life(), regen.life, entity.life_max()));
                entity.set_mana(mechanics::top_up(entity.mana(), regen.mana, entity.mana_max()));
            }
        }
    }

    /// One digestion step for a processed occupant.
    fn digest(&mut self, occupant: EntityId) {
        let Some(holder) = self.holder_of(occupant) else {
            return;
        };
        let Some(limit) = self.digestion_limit(occupant) else {
            return;
        };
        let ratio = self.digestion_ratio(occupant);
        let Some((inputs, alive)) = self.slot(holder).zip(self.slot(occupant)).map(|(h, o)| {
            (
                DigestionInputs {
                    holder: *h.state.modifiers(),
                    occupant: *o.state.modifiers(),
                    occupant_life_max: o.entity.life_max(),
                    digestion_ratio: ratio,
                    accelerated: h.entity.has_status(StatusEffect::Accelerant),
                },
                o.entity.life() > 1,
            )
        }) else {
            return;
        };
        let step = mechanics::digestion_step(&inputs);

        let mut progress = 0;
        if let Some(slot) = self.slot_mut(occupant) {
            progress = slot.state.shift_progress(step.drain, limit);
            if alive && step.damage > 0 {
                let life = slot.entity.life();
                slot.entity.set_life((life - step.damage).max(1));
            }
        }
        if alive {
            if let Some(slot) = self.slot_mut(holder) {
                let entity = &mut slot.entity;
                entity.set_life(mechanics::top_up(entity.life(), step.heal, entity.life_max()));
                entity.set_mana(mechanics::top_up(entity.mana(), step.mana_regen, entity.mana_max()));
            }
        }

        if self.settings.debug.info {
            tracing::info!(holder = %holder, occupant = %occupant, progress, limit, damage = step.damage, "Digesting");
        } else {
            tracing::debug!(holder = %holder, occupant = %occupant, progress, limit, damage = step.damage, "Digesting");
        }
        self.record(ContainmentEvent::Digested {
            holder,
            occupant,
            damage: step.damage,
            progress,
            limit,
        });
    }

    fn grant_satiated(&mut self, occupant: EntityId) {
        let Some(holder) = self.holder_of(occupant) else {
            return;
        };
        let Some((life_ratio, life_max)) = self
            .slot(occupant)
            .map(|slot| (slot.entity.life_ratio(), slot.entity.life_max()))
        else {
            return;
        };
        if life_ratio > 0.25 {
            return;
        }
        let duration = mechanics::satiated_duration(life_max, self.digestion_ratio(occupant));
        if let Some(slot) = self.slot_mut(holder) {
            slot.entity.apply_status(StatusEffect::Satiated, duration);
        }
    }

    /// One struggle attempt by an occupant against its holder.
    fn struggle(&mut self, occupant: EntityId) {
        let Some(holder) = self.holder_of(occupant) else {
            return;
        };
        let Some((h, o)) = self.slot(holder).zip(self.slot(occupant)) else {
            return;
        };
        let automatic = mechanics::escape_is_automatic(
            h.entity.is_hostile_to(o.entity.as_ref()),
            o.state.modifiers().appetite(),
        );

        let escaped = if automatic {
            true
        } else {
            let struggle_bonus = o.entity.struggle_bonus(h.entity.as_ref());
            let escape_limit = h.entity.escape_limit(o.entity.as_ref());
            let escape_bonus = h.entity.escape_bonus(o.entity.as_ref());
            let limit = h.entity.digestion_limit(o.entity.as_ref());
            let current = o.state.digestion_progress();

            let struggle_roll = self.roll_below(struggle_bonus);
            let escape_roll = self.roll_below(escape_limit) + escape_bonus;
            let outcome = mechanics::resolve_struggle(
                current,
                limit,
                struggle_bonus,
                struggle_roll,
                escape_roll,
            );

            if self.settings.debug.info {
                tracing::info!(holder = %holder, occupant = %occupant, struggle_roll, struggle_bonus, escape_roll, escape_limit, "Struggling");
            } else {
                tracing::debug!(holder = %holder, occupant = %occupant, struggle_roll, escape_roll, "Struggling");
            }

            let progress = match outcome {
                StruggleOutcome::Resisted => {
                    self.play_hit_effect(holder, occupant);
                    current
                }
                StruggleOutcome::Loosened { progress } => progress,
                StruggleOutcome::Escaped => 0,
            };
            if let Some(slot) = self.slot_mut(occupant) {
                slot.state.shift_progress(progress - current, limit);
            }
            self.record(ContainmentEvent::Struggled {
                holder,
                occupant,
                succeeded: outcome.succeeded(),
                progress,
            });
            outcome == StruggleOutcome::Escaped
        };

        if escaped {
            tracing::info!(holder = %holder, occupant = %occupant, automatic, "Occupant escaped");
            self.record(ContainmentEvent::Escaped { holder, occupant });
            self.release(holder, occupant);
        }
    }
}
