//! Entity capability contract.
//!
//! Concrete players and creatures live outside the core. They are wrapped in
//! an adapter implementing [`Entity`] at the system boundary, and the core
//! only ever holds `dyn Entity`.

use crate::value_objects::{Modifiers, Position, StatusEffect};
use crate::EntityId;

/// Capabilities the containment core needs from a live entity.
///
/// Methods with default bodies are optional hooks; everything else must be
/// supplied by the adapter.
pub trait Entity: Send {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Stable, kind-tagged identity. Must not change while spawned.
    fn id(&self) -> EntityId;

    fn name(&self) -> &str;

    /// Free-form tags consulted by policy matchers and tag-gated effects.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// False once the entity has left the simulation (dead, despawned).
    fn is_valid(&self) -> bool;

    /// True when this replica's local participant controls the entity.
    fn is_locally_controlled(&self) -> bool {
        false
    }

    // =========================================================================
    // Vitals
    // =========================================================================

    fn life(&self) -> i32;
    fn set_life(&mut self, life: i32);
    fn life_max(&self) -> i32;

    fn mana(&self) -> i32;
    fn set_mana(&mut self, mana: i32);
    fn mana_max(&self) -> i32;

    fn life_ratio(&self) -> f32 {
        let max = self.life_max();
        if max <= 0 {
            0.0
        } else {
            self.life() as f32 / max as f32
        }
    }

    // =========================================================================
    // Spatial
    // =========================================================================

    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);

    /// Facing: `1` right, `-1` left.
    fn direction(&self) -> i32;

    /// Where occupants are pinned every step.
    fn containment_point(&self) -> Position {
        self.position().offset(0.0, -5.0)
    }

    /// Where loot and disposal effects appear.
    fn disposal_point(&self) -> Position {
        self.position()
    }

    // =========================================================================
    // Relations and classification
    // =========================================================================

    fn is_hostile_to(&self, other: &dyn Entity) -> bool;

    /// Riders that do not consume capacity and skip regen/processing/struggle.
    fn is_child(&self) -> bool {
        false
    }

    /// Universal opt-out from the whole containment system.
    fn is_eligible(&self) -> bool {
        true
    }

    /// Whether this entity draws its occupants layered over itself.
    fn shows_occupants(&self) -> bool {
        false
    }

    // =========================================================================
    // Containment numbers
    // =========================================================================

    fn size_factor(&self) -> f32;

    /// Maximum number of non-child direct occupants.
    fn capacity(&self) -> usize;

    /// Upper bound of the holder-side escape roll against `occupant`.
    fn escape_limit(&self, occupant: &dyn Entity) -> i32;

    /// Flat bonus added to the holder-side escape roll.
    fn escape_bonus(&self, _occupant: &dyn Entity) -> i32 {
        0
    }

    /// Upper bound of this occupant's struggle roll against `holder`.
    fn struggle_bonus(&self, holder: &dyn Entity) -> i32;

    /// Progress at which `occupant` is fully processed.
    fn digestion_limit(&self, occupant: &dyn Entity) -> i32 {
        self.escape_limit(occupant) * 2
    }

    /// Probability in `[0, 1]` that `holder` opportunistically contains this entity.
    fn opportunistic_chance(&self, holder: &dyn Entity) -> f32;

    /// Modifier levels granted by current equipment.
    fn base_modifiers(&self) -> Modifiers;

    // =========================================================================
    // State save/restore around containment
    // =========================================================================

    fn backup_state(&mut self);
    fn restore_state(&mut self);

    /// Put the entity into its "inside a holder" presentation/physics state.
    fn set_state_contained(&mut self);

    // =========================================================================
    // Combat entry points
    // =========================================================================

    fn damage(&mut self, source: EntityId, amount: i32, knockback: f32);
    fn knockback(&mut self, impulse: Position);
    fn heal(&mut self, amount: i32);

    /// Direct kill path. `inert` marks the body as not producing a corpse.
    fn kill(&mut self, inert: bool);

    fn apply_status(&mut self, status: StatusEffect, duration: i32);
    fn has_status(&self, status: StatusEffect) -> bool;

    /// Effect played at an occupant's position when it fails to struggle free.
    fn hit_effect(&self) -> Option<String> {
        None
    }

    // =========================================================================
    // Optional hooks
    // =========================================================================

    fn on_contained_by(&mut self, _holder: EntityId) {}
    fn on_released_by(&mut self, _holder: EntityId) {}
    fn on_disposed_by(&mut self, _holder: EntityId) {}

    /// Holder-side hook after an occupant is disposed.
    fn on_dispose(&mut self, _occupant: EntityId) {}
}
