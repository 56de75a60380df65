//! Per-entity mutable state owned by the containment core.
//!
//! Counters here are plain step counts. A periodic routine "fires" on the
//! step where its counter has already reached the interval; the counter is
//! then reset to zero, so a routine with interval `n` fires every `n + 1`
//! steps.

use serde::{Deserialize, Serialize};

use crate::mechanics;
use crate::value_objects::{Modifiers, Position};

/// Steps between passive regeneration transfers.
pub const REGEN_INTERVAL: i32 = 30;
/// Steps between digestion steps while processing.
pub const DIGEST_INTERVAL: i32 = 60;
/// Steps between struggle attempts.
pub const STRUGGLE_INTERVAL: i32 = 90;
/// Steps of post-release immunity.
pub const GRACE_STEPS: i32 = 30;

/// Core-owned mutable record for one entity.
///
/// # Invariants
///
/// - `digestion_progress` stays within `[0, limit]` for the limit passed to
///   the mutators, and is zero after [`EntityState::reset_transient`].
/// - `processing` is cleared by [`EntityState::reset_transient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    processing: bool,
    digestion_progress: i32,
    digest_timer: i32,
    regen_timer: i32,
    noise_timer: i32,
    noise_interval: i32,
    struggle_timer: i32,
    grace_timer: i32,
    fullness_ratio: f32,
    modifiers: Modifiers,
    saved_position: Option<Position>,
}

impl EntityState {
    pub fn new(modifiers: Modifiers) -> Self {
        Self {
            processing: false,
            digestion_progress: 0,
            digest_timer: 0,
            regen_timer: 0,
            noise_timer: 0,
            noise_interval: 0,
            struggle_timer: 0,
            grace_timer: 0,
            fullness_ratio: 0.0,
            modifiers,
            saved_position: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    #[inline]
    pub fn digestion_progress(&self) -> i32 {
        self.digestion_progress
    }

    #[inline]
    pub fn grace_timer(&self) -> i32 {
        self.grace_timer
    }

    #[inline]
    pub fn in_grace(&self) -> bool {
        self.grace_timer > 0
    }

    #[inline]
    pub fn fullness_ratio(&self) -> f32 {
        self.fullness_ratio
    }

    #[inline]
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    #[inline]
    pub fn modifiers_mut(&mut self) -> &mut Modifiers {
        &mut self.modifiers
    }

    #[inline]
    pub fn saved_position(&self) -> Option<Position> {
        self.saved_position
    }

    #[inline]
    pub fn noise_interval(&self) -> i32 {
        self.noise_interval
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Clear everything tied to the current containment edge.
    pub fn reset_transient(&mut self) {
        self.processing = false;
        self.digest_timer = 0;
        self.digestion_progress = 0;
        self.noise_timer = 0;
        self.struggle_timer = 0;
    }

    pub fn begin_processing(&mut self) {
        self.processing = true;
    }

    pub fn save_position(&mut self, position: Position) {
        self.saved_position = Some(position);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Move progress by `delta`, clamped into `[0, limit]`. Returns the new value.
    pub fn shift_progress(&mut self, delta: i32, limit: i32) -> i32 {
        let limit = limit.max(0);
        self.digestion_progress = self.digestion_progress.saturating_add(delta).clamp(0, limit);
        self.digestion_progress
    }

    /// Re-clamp progress after the holder's limit changed.
    pub fn clamp_progress(&mut self, limit: i32) {
        self.digestion_progress = self.digestion_progress.clamp(0, limit.max(0));
    }

    pub fn start_grace(&mut self) {
        self.grace_timer = GRACE_STEPS;
    }

    pub fn tick_grace(&mut self) {
        if self.grace_timer > 0 {
            self.grace_timer -= 1;
        }
    }

    // =========================================================================
    // Periodic timers
    // =========================================================================

    pub fn advance_regen(&mut self) -> bool {
        advance(&mut self.regen_timer, REGEN_INTERVAL)
    }

    pub fn advance_digest(&mut self) -> bool {
        advance(&mut self.digest_timer, DIGEST_INTERVAL)
    }

    pub fn advance_struggle(&mut self) -> bool {
        advance(&mut self.struggle_timer, STRUGGLE_INTERVAL)
    }

    /// Advance the ambience timer against its current randomized interval.
    ///
    /// On fire the counter resets; the caller picks the next interval with
    /// [`EntityState::set_noise_interval`].
    pub fn advance_noise(&mut self) -> bool {
        advance(&mut self.noise_timer, self.noise_interval)
    }

    pub fn set_noise_interval(&mut self, interval: i32) {
        self.noise_interval = interval.max(0);
    }

    /// Move the visual fullness toward `target` with asymmetric easing.
    pub fn ease_fullness(&mut self, target: f32) {
        self.fullness_ratio = mechanics::ease_fullness(self.fullness_ratio, target);
    }
}

impl Default for EntityState {
    fn default() -> Self {
        Self::new(Modifiers::none())
    }
}

fn advance(counter: &mut i32, interval: i32) -> bool {
    if *counter >= interval {
        *counter = 0;
        true
    } else {
        *counter += 1;
        false
    }
}
