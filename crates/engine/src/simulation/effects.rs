//! Weighted effect and loot selection.
//!
//! Effects are only requested here; playing them is the presentation layer's
//! business. Every request that yields something is recorded as an event.

use vessel_domain::{mechanics, ContainmentEvent, EffectCue, EntityId, Position};

use super::Simulation;

impl Simulation {
    /// Pick a weighted effect for `cue` from the enabled categories.
    ///
    /// Returns `None` (and draws no randomness) when nothing is enabled.
    pub(crate) fn play_effect(&mut self, source: EntityId, cue: EffectCue) -> Option<String> {
        let (candidates, at) = {
            let slot = self.slot(source)?;
            (
                self.settings.effects.candidates(cue, slot.entity.tags()),
                slot.entity.position(),
            )
        };
        if candidates.is_empty() {
            return None;
        }
        let effect = candidates.choose(self.random.gen_unit())?.clone();
        tracing::trace!(source = %source, cue = ?cue, effect = %effect, "Effect requested");
        self.record(ContainmentEvent::EffectPlayed {
            source,
            cue,
            effect: effect.clone(),
            at,
        });
        Some(effect)
    }

    /// The holder's hit effect, played where the occupant is.
    pub(crate) fn play_hit_effect(&mut self, holder: EntityId, occupant: EntityId) {
        let Some(effect) = self.slot(holder).and_then(|slot| slot.entity.hit_effect()) else {
            return;
        };
        let Some(at) = self.slot(occupant).map(|slot| slot.entity.position()) else {
            return;
        };
        self.record(ContainmentEvent::HitEffectPlayed {
            holder,
            effect,
            at,
        });
    }

    /// Roll a disposal drop for `chance` percent.
    ///
    /// Chances above 100 add one guaranteed unit per whole hundred plus a
    /// rolled unit for the remainder.
    pub(crate) fn roll_loot(
        &mut self,
        holder: EntityId,
        occupant: EntityId,
        chance: i32,
        at: Position,
    ) -> Option<(String, i32)> {
        if !self.settings.loot.enabled || chance <= 0 {
            return None;
        }
        if self.random.gen_range(0, 99) >= chance {
            return None;
        }
        let extra_roll = if chance > 100 && chance % 100 != 0 {
            self.random.gen_range(0, 99)
        } else {
            0
        };
        let quantity = mechanics::loot_quantity(chance, extra_roll);

        let fixed = self
            .slot(holder)
            .and_then(|slot| self.settings.loot.override_for(slot.entity.tags()))
            .map(str::to_owned);
        let item = match fixed {
            Some(item) => item,
            None => {
                let candidates = self.settings.loot.candidates(chance);
                if candidates.is_empty() {
                    return None;
                }
                candidates.choose(self.random.gen_unit())?.clone()
            }
        };

        tracing::info!(holder = %holder, occupant = %occupant, item = %item, quantity, chance, "Loot dropped");
        self.record(ContainmentEvent::LootDropped {
            holder,
            occupant,
            item: item.clone(),
            quantity,
            at,
        });
        Some((item, quantity))
    }
}
