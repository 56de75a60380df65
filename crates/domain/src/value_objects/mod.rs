//! Value objects for the containment core.

pub mod modifiers;
pub mod policy;
pub mod position;
pub mod settings;
pub mod status;

pub use modifiers::{ModifierChannel, Modifiers};
pub use policy::PolicyMatcher;
pub use position::Position;
pub use settings::{
    ContainmentSettings, DebugOverrides, DisposalSettings, EffectCatalog, EffectCategory,
    EffectCue, EffectEntry, LootEntry, LootOverride, LootTable, PolicySet,
};
pub use status::StatusEffect;
