//! Pure numeric rules for processing, regeneration, struggling and loot.
//!
//! Nothing here touches entities or draws randomness; the engine gathers the
//! inputs, injects rolls, and applies the results.

use crate::value_objects::{ModifierChannel, Modifiers};

/// Largest per-step drop of the visual fullness ratio.
pub const FULLNESS_FALL_RATE: f32 = 0.05;
/// Largest per-step rise of the visual fullness ratio.
pub const FULLNESS_RISE_RATE: f32 = 0.02;

/// How far along processing an occupant is, in `[0, 1]` for sane limits.
///
/// A non-positive limit counts as fully processed.
pub fn digestion_ratio(progress: i32, limit: i32) -> f32 {
    if limit <= 0 {
        1.0
    } else {
        progress as f32 / limit as f32
    }
}

// =============================================================================
// Digestion
// =============================================================================

/// Everything one digestion step depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigestionInputs {
    pub holder: Modifiers,
    pub occupant: Modifiers,
    pub occupant_life_max: i32,
    pub digestion_ratio: f32,
    /// Holder carries the accelerant status.
    pub accelerated: bool,
}

/// Amounts produced by one digestion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestionStep {
    /// Life removed from the occupant.
    pub damage: i32,
    /// Life restored to the holder.
    pub heal: i32,
    /// Mana restored to the holder.
    pub mana_regen: i32,
    /// Progress added toward the digestion limit.
    pub drain: i32,
}

pub fn digestion_step(inputs: &DigestionInputs) -> DigestionStep {
    let ratio = inputs.digestion_ratio.max(0.0);
    let life_max = inputs.occupant_life_max.max(0) as f32;

    let mut damage = inputs
        .holder
        .caustic()
        .saturating_add(inputs.occupant.appetite())
        .saturating_add((life_max * 0.05 * ratio.sqrt()).ceil() as i32);
    let mut heal = inputs
        .holder
        .combined(&inputs.occupant, ModifierChannel::Vitality);
    let mana_regen = inputs
        .holder
        .combined(&inputs.occupant, ModifierChannel::Energy);
    let mut drain = damage.saturating_add((life_max.sqrt() * 0.1) as i32);

    if inputs.accelerated {
        drain = drain.saturating_mul(10);
        damage = damage.saturating_mul(5);
        heal = heal.saturating_add(damage / 2);
    }

    DigestionStep {
        damage,
        heal,
        mana_regen,
        drain,
    }
}

// =============================================================================
// Passive regeneration
// =============================================================================

/// Symmetric top-up applied to both holder and occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regeneration {
    pub life: i32,
    pub mana: i32,
}

pub fn regeneration(holder: &Modifiers, occupant: &Modifiers) -> Regeneration {
    Regeneration {
        life: holder.combined(occupant, ModifierChannel::Vitality),
        mana: holder.combined(occupant, ModifierChannel::Energy),
    }
}

/// Add `amount` to `current` without passing `max`. Non-positive amounts are a no-op.
pub fn top_up(current: i32, amount: i32, max: i32) -> i32 {
    if amount > 0 {
        current.saturating_add(amount).min(max)
    } else {
        current
    }
}

// =============================================================================
// Struggle
// =============================================================================

/// Escape needs no roll when the holder is friendly and the occupant has no appetite.
pub fn escape_is_automatic(holder_hostile: bool, occupant_appetite: i32) -> bool {
    !holder_hostile && occupant_appetite == 0
}

/// Result of one rolled struggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StruggleOutcome {
    /// The roll lost; progress is unchanged.
    Resisted,
    /// The roll won and pushed progress back.
    Loosened { progress: i32 },
    /// The roll won and progress reached zero.
    Escaped,
}

impl StruggleOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Resisted)
    }
}

/// Resolve a struggle given both rolls.
///
/// `escape_roll` already includes the holder's escape bonus. A successful
/// roll only ever lowers progress.
pub fn resolve_struggle(
    progress: i32,
    limit: i32,
    struggle_bonus: i32,
    struggle_roll: i32,
    escape_roll: i32,
) -> StruggleOutcome {
    if struggle_roll < escape_roll {
        return StruggleOutcome::Resisted;
    }
    let remaining = progress
        .saturating_sub(struggle_bonus.max(0))
        .clamp(0, limit.max(0));
    if remaining <= 0 {
        StruggleOutcome::Escaped
    } else {
        StruggleOutcome::Loosened {
            progress: remaining,
        }
    }
}

// =============================================================================
// Statuses and ambience
// =============================================================================

/// Duration of the movement impairment applied to a holder.
pub fn slow_duration(digestion_ratio: f32) -> i32 {
    (120.0 / digestion_ratio.max(0.2)) as i32
}

/// Duration of the satiated status granted to a holder.
pub fn satiated_duration(occupant_life_max: i32, digestion_ratio: f32) -> i32 {
    (occupant_life_max as f32 / digestion_ratio.max(0.05)) as i32
}

/// Half-open `[min, max)` bounds for the next ambience interval.
pub fn ambient_interval_bounds(processing_any: bool) -> (i32, i32) {
    if processing_any {
        (60, 120)
    } else {
        (120, 480)
    }
}

// =============================================================================
// Visual fullness
// =============================================================================

/// One occupant's share of its holder's visual fullness.
pub fn fullness_contribution(size_factor: f32, digestion_ratio: f32, life_ratio: f32) -> f32 {
    let remaining = (1.0 - digestion_ratio).max(0.0);
    size_factor * (remaining.sqrt() * 0.5 + life_ratio * 0.5)
}

/// Move `current` toward `target`: fast when shrinking, slow when growing.
pub fn ease_fullness(current: f32, target: f32) -> f32 {
    if target < current {
        target.max(current - FULLNESS_FALL_RATE)
    } else if target > current {
        target.min(current + FULLNESS_RISE_RATE)
    } else {
        current
    }
}

/// Presentation bucket (0-5) for a fullness ratio.
pub fn fullness_stage(ratio: f32) -> u8 {
    if ratio >= 0.8 {
        5
    } else if ratio >= 0.6 {
        4
    } else if ratio >= 0.4 {
        3
    } else if ratio >= 0.2 {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    }
}

// =============================================================================
// Loot
// =============================================================================

/// Percent chance of a loot drop on disposal.
pub fn loot_chance(holder: &Modifiers, occupant: &Modifiers) -> i32 {
    holder
        .combined(occupant, ModifierChannel::Essence)
        .saturating_mul(10)
}

/// Quantity of a drop for `chance`; `extra_roll` is a `[0, 100)` roll for the
/// fractional bonus above 100%.
pub fn loot_quantity(chance: i32, extra_roll: i32) -> i32 {
    let mut bonus = (chance - 100) / 100;
    if chance > 100 && chance % 100 != 0 && extra_roll < chance % 100 {
        bonus += 1;
    }
    (1 + bonus).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caustic(level: i32) -> Modifiers {
        Modifiers::none().with(ModifierChannel::Caustic, level)
    }

    #[test]
    fn fresh_occupant_takes_base_damage() {
        // holder caustic 2, occupant life 20, nothing processed yet
        let step = digestion_step(&DigestionInputs {
            holder: caustic(2),
            occupant: Modifiers::none(),
            occupant_life_max: 20,
            digestion_ratio: 0.0,
            accelerated: false,
        });
        assert_eq!(step.damage, 2);
        assert_eq!(step.drain, 2);
        assert_eq!(step.heal, 0);
        assert_eq!(step.mana_regen, 0);
    }

    #[test]
    fn damage_grows_with_progress_and_life() {
        let step = digestion_step(&DigestionInputs {
            holder: caustic(1),
            occupant: Modifiers::none().with(ModifierChannel::Appetite, 1),
            occupant_life_max: 400,
            digestion_ratio: 0.25,
            accelerated: false,
        });
        // 1 + 1 + ceil(400 * 0.05 * 0.5) = 12, drain adds floor(20 * 0.1) = 2
        assert_eq!(step.damage, 12);
        assert_eq!(step.drain, 14);
    }

    #[test]
    fn accelerant_multiplies_damage_and_drain() {
        let step = digestion_step(&DigestionInputs {
            holder: caustic(2).with(ModifierChannel::Vitality, 1),
            occupant: Modifiers::none(),
            occupant_life_max: 20,
            digestion_ratio: 0.0,
            accelerated: true,
        });
        assert_eq!(step.damage, 10);
        assert_eq!(step.drain, 20);
        assert_eq!(step.heal, 1 + 5);
    }

    #[test]
    fn extreme_modifiers_saturate_instead_of_overflowing() {
        let step = digestion_step(&DigestionInputs {
            holder: caustic(i32::MAX).with(ModifierChannel::Vitality, i32::MAX),
            occupant: Modifiers::none()
                .with(ModifierChannel::Appetite, i32::MAX)
                .with(ModifierChannel::Vitality, 1),
            occupant_life_max: 400,
            digestion_ratio: 1.0,
            accelerated: true,
        });
        assert_eq!(step.damage, i32::MAX);
        assert_eq!(step.drain, i32::MAX);
        assert_eq!(step.heal, i32::MAX);

        let essence = Modifiers::none().with(ModifierChannel::Essence, i32::MAX);
        assert_eq!(loot_chance(&essence, &essence), i32::MAX);
    }

    #[test]
    fn regeneration_sums_vitality_and_energy() {
        let holder = Modifiers::none()
            .with(ModifierChannel::Vitality, 2)
            .with(ModifierChannel::Caustic, 9);
        let occupant = Modifiers::none().with(ModifierChannel::Energy, 3);
        assert_eq!(
            regeneration(&holder, &occupant),
            Regeneration { life: 2, mana: 3 }
        );
    }

    #[test]
    fn top_up_is_capped() {
        assert_eq!(top_up(95, 10, 100), 100);
        assert_eq!(top_up(50, 0, 100), 50);
        assert_eq!(top_up(50, -5, 100), 50);
    }

    #[test]
    fn struggle_never_raises_progress() {
        for progress in [0, 5, 50, 200] {
            for bonus in [0, 3, 40] {
                match resolve_struggle(progress, 200, bonus, 10, 0) {
                    StruggleOutcome::Loosened { progress: p } => assert!(p < progress || bonus == 0),
                    StruggleOutcome::Escaped | StruggleOutcome::Resisted => {}
                }
            }
        }
    }

    #[test]
    fn struggle_escapes_exactly_at_zero() {
        assert_eq!(resolve_struggle(10, 200, 10, 5, 5), StruggleOutcome::Escaped);
        assert_eq!(
            resolve_struggle(11, 200, 10, 5, 5),
            StruggleOutcome::Loosened { progress: 1 }
        );
        assert_eq!(resolve_struggle(11, 200, 10, 4, 5), StruggleOutcome::Resisted);
    }

    #[test]
    fn automatic_escape_needs_friendly_holder_and_no_appetite() {
        assert!(escape_is_automatic(false, 0));
        assert!(!escape_is_automatic(true, 0));
        assert!(!escape_is_automatic(false, 1));
    }

    #[test]
    fn fullness_eases_asymmetrically() {
        assert!((ease_fullness(0.0, 1.0) - 0.02).abs() < f32::EPSILON);
        assert!((ease_fullness(1.0, 0.0) - 0.95).abs() < f32::EPSILON);
        assert_eq!(ease_fullness(0.5, 0.51), 0.51);
        assert_eq!(ease_fullness(0.3, 0.3), 0.3);
    }

    #[test]
    fn fullness_contribution_of_fresh_healthy_occupant_is_its_size() {
        assert!((fullness_contribution(1.5, 0.0, 1.0) - 1.5).abs() < 1e-6);
        assert!(fullness_contribution(1.0, 1.0, 0.0).abs() < 1e-6);
    }

    #[test]
    fn fullness_stage_buckets() {
        assert_eq!(fullness_stage(0.0), 0);
        assert_eq!(fullness_stage(0.1), 1);
        assert_eq!(fullness_stage(0.2), 2);
        assert_eq!(fullness_stage(0.65), 4);
        assert_eq!(fullness_stage(f32::INFINITY), 5);
    }

    #[test]
    fn slow_duration_floors_ratio() {
        assert_eq!(slow_duration(0.0), slow_duration(0.2));
        assert_eq!(slow_duration(0.5), 240);
        assert_eq!(slow_duration(1.0), 120);
    }

    #[test]
    fn loot_quantity_adds_fractional_bonus() {
        assert_eq!(loot_quantity(40, 0), 1);
        assert_eq!(loot_quantity(200, 0), 2);
        assert_eq!(loot_quantity(250, 10), 3);
        assert_eq!(loot_quantity(250, 60), 2);
    }

    #[test]
    fn digestion_ratio_with_zero_limit_is_complete() {
        assert_eq!(digestion_ratio(0, 0), 1.0);
        assert_eq!(digestion_ratio(50, 200), 0.25);
    }
}
