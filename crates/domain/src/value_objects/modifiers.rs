//! Modifier Aggregate - five named effect levels carried by every entity.
//!
//! Levels come from external equipment. The aggregate is rebuilt from the
//! entity's base set on every reset sweep, and `raise` lets equipment push a
//! channel up for the remainder of the step.

use serde::{Deserialize, Serialize};

/// One named effect channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierChannel {
    /// Holder-side processing strength.
    Caustic,
    /// Willingness to be processed; also adds to incoming digestion damage.
    Appetite,
    /// Life regeneration shared between holder and occupant.
    Vitality,
    /// Mana regeneration shared between holder and occupant.
    Energy,
    /// Loot chance on disposal.
    Essence,
}

/// Immutable-per-tick bundle of effect levels.
///
/// # Invariants
///
/// - Every level is `>= 0`; `raise` clamps negative input to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    caustic: i32,
    appetite: i32,
    vitality: i32,
    energy: i32,
    essence: i32,
}

impl Modifiers {
    /// An aggregate with every channel at zero.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder form of [`Modifiers::raise`].
    pub fn with(mut self, channel: ModifierChannel, level: i32) -> Self {
        self.raise(channel, level);
        self
    }

    #[inline]
    pub fn get(&self, channel: ModifierChannel) -> i32 {
        match channel {
            ModifierChannel::Caustic => self.caustic,
            ModifierChannel::Appetite => self.appetite,
            ModifierChannel::Vitality => self.vitality,
            ModifierChannel::Energy => self.energy,
            ModifierChannel::Essence => self.essence,
        }
    }

    /// Returns true when the channel carries any level at all.
    #[inline]
    pub fn has(&self, channel: ModifierChannel) -> bool {
        self.get(channel) > 0
    }

    /// Raise a channel to at least `level`. Lower levels never replace higher ones.
    pub fn raise(&mut self, channel: ModifierChannel, level: i32) {
        let slot = self.slot_mut(channel);
        *slot = (*slot).max(level.max(0));
    }

    /// Sum of one channel across two aggregates (holder + occupant).
    #[inline]
    pub fn combined(&self, other: &Modifiers, channel: ModifierChannel) -> i32 {
        self.get(channel).saturating_add(other.get(channel))
    }

    #[inline]
    pub fn caustic(&self) -> i32 {
        self.caustic
    }

    #[inline]
    pub fn appetite(&self) -> i32 {
        self.appetite
    }

    #[inline]
    pub fn vitality(&self) -> i32 {
        self.vitality
    }

    #[inline]
    pub fn energy(&self) -> i32 {
        self.energy
    }

    #[inline]
    pub fn essence(&self) -> i32 {
        self.essence
    }

    fn slot_mut(&mut self, channel: ModifierChannel) -> &mut i32 {
        match channel {
            ModifierChannel::Caustic => &mut self.caustic,
            ModifierChannel::Appetite => &mut self.appetite,
            ModifierChannel::Vitality => &mut self.vitality,
            ModifierChannel::Energy => &mut self.energy,
            ModifierChannel::Essence => &mut self.essence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_keeps_the_highest_level() {
        let mut mods = Modifiers::none().with(ModifierChannel::Caustic, 3);
        mods.raise(ModifierChannel::Caustic, 1);
        assert_eq!(mods.caustic(), 3);
        mods.raise(ModifierChannel::Caustic, 5);
        assert_eq!(mods.caustic(), 5);
    }

    #[test]
    fn negative_levels_clamp_to_zero() {
        let mods = Modifiers::none().with(ModifierChannel::Energy, -4);
        assert_eq!(mods.energy(), 0);
        assert!(!mods.has(ModifierChannel::Energy));
    }

    #[test]
    fn combined_sums_both_parties() {
        let holder = Modifiers::none().with(ModifierChannel::Vitality, 2);
        let occupant = Modifiers::none().with(ModifierChannel::Vitality, 1);
        assert_eq!(holder.combined(&occupant, ModifierChannel::Vitality), 3);
    }

    #[test]
    fn deserializes_with_missing_channels() {
        let mods: Modifiers = serde_json::from_str(r#"{"caustic": 2}"#).expect("valid json");
        assert_eq!(mods.caustic(), 2);
        assert_eq!(mods.vitality(), 0);
    }
}
