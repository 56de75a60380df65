//! Vessel domain: the containment relation, per-entity state, and the pure
//! rules that drive processing and struggling.
//!
//! Nothing in this crate performs I/O, logs, or draws randomness.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod mechanics;
pub mod value_objects;
pub mod weighted;

pub use aggregates::{ContainmentGraph, RemovedEdges};
pub use entities::{
    Entity, EntityState, DIGEST_INTERVAL, GRACE_STEPS, REGEN_INTERVAL, STRUGGLE_INTERVAL,
};
pub use error::DomainError;
pub use events::{AttachOutcome, ContainmentEvent, DetachOutcome};
pub use ids::{EntityId, EntityKind};
pub use value_objects::{
    ContainmentSettings, DebugOverrides, DisposalSettings, EffectCatalog, EffectCategory,
    EffectCue, EffectEntry, LootEntry, LootOverride, LootTable, ModifierChannel, Modifiers,
    PolicyMatcher, PolicySet, Position, StatusEffect,
};
pub use weighted::WeightedChoice;
