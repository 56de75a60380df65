//! Eligibility predicates.
//!
//! Every structural action is gated by one of these. They are recomputed from
//! current state on every call and never cached across steps.

use vessel_domain::{mechanics, EntityId, PolicyMatcher};

use super::Simulation;

/// Occupants at or below this life ratio can no longer be released voluntarily.
const RELEASE_MIN_LIFE_RATIO: f32 = 0.1;

impl Simulation {
    // =========================================================================
    // Graph reads
    // =========================================================================

    #[inline]
    pub fn is_contained(&self, id: EntityId) -> bool {
        self.graph.is_contained(id)
    }

    #[inline]
    pub fn holder_of(&self, id: EntityId) -> Option<EntityId> {
        self.graph.holder_of(id)
    }

    #[inline]
    pub fn has_occupants(&self, holder: EntityId) -> bool {
        self.graph.has_occupants(holder)
    }

    /// Direct occupants in insertion order, optionally skipping child riders.
    pub fn occupants(&self, holder: EntityId, include_children: bool) -> Vec<EntityId> {
        self.graph
            .occupants_of(holder)
            .iter()
            .copied()
            .filter(|id| include_children || !self.is_child(*id))
            .collect()
    }

    pub fn is_processing(&self, id: EntityId) -> bool {
        self.is_contained(id) && self.slot(id).is_some_and(|slot| slot.state.is_processing())
    }

    pub fn processing_any(&self, holder: EntityId) -> bool {
        self.graph
            .occupants_of(holder)
            .iter()
            .any(|id| self.is_processing(*id))
    }

    /// The holder's digestion limit for `occupant`, when contained.
    pub fn digestion_limit(&self, occupant: EntityId) -> Option<i32> {
        let holder = self.slot(self.holder_of(occupant)?)?;
        let occupant = self.slot(occupant)?;
        Some(holder.entity.digestion_limit(occupant.entity.as_ref()))
    }

    /// Progress over limit; zero for free entities.
    pub fn digestion_ratio(&self, id: EntityId) -> f32 {
        match (self.digestion_limit(id), self.slot(id)) {
            (Some(limit), Some(slot)) => {
                mechanics::digestion_ratio(slot.state.digestion_progress(), limit)
            }
            _ => 0.0,
        }
    }

    // =========================================================================
    // Containment
    // =========================================================================

    pub fn can_contain(&self, holder: EntityId, target: EntityId) -> bool {
        holder != target
            && !self.is_contained(holder)
            && !self.in_grace(holder)
            && self.has_room(holder)
            && self.can_be_contained(target)
            && self.policy_allows(&self.settings.policies.can_contain, holder)
            && self.is_eligible(holder)
    }

    pub fn can_be_contained(&self, target: EntityId) -> bool {
        !self.is_contained(target)
            && self.policy_allows(&self.settings.policies.can_be_contained, target)
            && self.is_eligible(target)
    }

    pub fn can_opportunistic_contain(&self, holder: EntityId, target: EntityId) -> bool {
        self.can_contain(holder, target)
            && self.policy_allows(&self.settings.policies.can_opportunistic_contain, holder)
            && self.is_eligible(holder)
    }

    // =========================================================================
    // Release
    // =========================================================================

    pub fn can_release(&self, holder: EntityId, target: EntityId) -> bool {
        !self.is_contained(holder)
            && self.graph.contains(holder, target)
            && self.can_be_released(target)
            && self
                .slot(target)
                .is_some_and(|slot| slot.entity.life_ratio() > RELEASE_MIN_LIFE_RATIO)
            && self.is_eligible(holder)
    }

    pub fn can_release_any(&self, holder: EntityId) -> bool {
        self.graph
            .occupants_of(holder)
            .iter()
            .any(|id| self.can_release(holder, *id))
    }

    pub fn can_be_released(&self, target: EntityId) -> bool {
        self.is_contained(target) && self.is_eligible(target)
    }

    // =========================================================================
    // Processing and disposal
    // =========================================================================

    pub fn can_process(&self, holder: EntityId, target: EntityId) -> bool {
        self.graph.contains(holder, target)
            && self.can_be_processed(target)
            && self.policy_allows(&self.settings.policies.can_process, holder)
            && self.is_eligible(holder)
    }

    pub fn can_process_any(&self, holder: EntityId) -> bool {
        self.graph
            .occupants_of(holder)
            .iter()
            .any(|id| self.can_process(holder, *id))
    }

    pub fn can_be_processed(&self, target: EntityId) -> bool {
        self.is_contained(target)
            && !self.is_processing(target)
            && self.policy_allows(&self.settings.policies.can_be_processed, target)
            && self.is_eligible(target)
    }

    pub fn can_finish(&self, holder: EntityId, target: EntityId) -> bool {
        self.graph.contains(holder, target) && self.can_be_finished(target) && self.is_eligible(holder)
    }

    pub fn can_finish_any(&self, holder: EntityId) -> bool {
        self.graph
            .occupants_of(holder)
            .iter()
            .any(|id| self.can_finish(holder, *id))
    }

    pub fn can_be_finished(&self, target: EntityId) -> bool {
        self.is_processing(target)
            && self.slot(target).is_some_and(|slot| slot.entity.life() <= 1)
            && self.digestion_ratio(target) >= 1.0
            && self.is_eligible(target)
    }

    /// Processing needs a caustic holder and either hostility or an occupant
    /// that wants it.
    pub fn should_process(&self, holder: EntityId, target: EntityId) -> bool {
        if !self.can_process(holder, target) {
            return false;
        }
        let (Some(h), Some(t)) = (self.slot(holder), self.slot(target)) else {
            return false;
        };
        h.state.modifiers().caustic() > 0
            && (h.entity.is_hostile_to(t.entity.as_ref()) || t.state.modifiers().appetite() > 0)
    }

    pub fn should_finish(&self, holder: EntityId, target: EntityId) -> bool {
        self.can_finish(holder, target)
    }

    // =========================================================================
    // Damage and struggle
    // =========================================================================

    pub fn can_damage(&self, attacker: EntityId, target: EntityId) -> bool {
        !self.is_contained(attacker) && !self.in_grace(attacker) && self.can_be_damaged(target)
    }

    pub fn can_be_damaged(&self, target: EntityId) -> bool {
        !self.is_contained(target) && !self.in_grace(target)
    }

    pub fn can_struggle(&self, target: EntityId) -> bool {
        self.is_contained(target)
            && self.slot(target).is_some_and(|slot| slot.entity.life() > 1)
            && self.policy_allows(&self.settings.policies.can_struggle, target)
            && self.is_eligible(target)
    }

    /// Only occupants hostile toward their holder fight back.
    pub fn should_struggle(&self, target: EntityId) -> bool {
        if !self.can_struggle(target) {
            return false;
        }
        let Some(holder) = self.holder_of(target).and_then(|id| self.slot(id)) else {
            return false;
        };
        self.slot(target)
            .is_some_and(|slot| slot.entity.is_hostile_to(holder.entity.as_ref()))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn is_eligible(&self, id: EntityId) -> bool {
        self.slot(id)
            .is_some_and(|slot| slot.entity.is_valid() && slot.entity.is_eligible())
    }

    pub(super) fn is_child(&self, id: EntityId) -> bool {
        self.slot(id).is_some_and(|slot| slot.entity.is_child())
    }

    fn in_grace(&self, id: EntityId) -> bool {
        self.slot(id).is_some_and(|slot| slot.state.in_grace())
    }

    pub(super) fn has_room(&self, holder: EntityId) -> bool {
        if self.settings.debug.no_capacity_limit {
            return true;
        }
        let Some(slot) = self.slot(holder) else {
            return false;
        };
        self.occupants(holder, false).len() < slot.entity.capacity()
    }

    fn policy_allows(&self, policy: &PolicyMatcher, id: EntityId) -> bool {
        self.slot(id)
            .is_some_and(|slot| policy.matches(id.kind(), slot.entity.tags()))
    }
}
