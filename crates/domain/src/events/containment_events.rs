//! Containment-related domain events
//!
//! Graph mutations return outcome enums so callers can tell a no-op from a
//! structural change. Simulation-level happenings are recorded as
//! [`ContainmentEvent`]s in the engine's outbox.

use serde::{Deserialize, Serialize};

use crate::value_objects::{EffectCue, Position};
use crate::EntityId;

/// Outcome of inserting a containment edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Edge inserted. `previous` is the holder the occupant was moved away from.
    Attached { previous: Option<EntityId> },
    /// Holder and occupant are the same entity
    SelfContainment,
    /// The holder is (transitively) inside the occupant
    WouldCycle,
    /// The edge already exists
    AlreadyAttached,
}

impl AttachOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }
}

/// Outcome of removing a containment edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    Detached { holder: EntityId },
    /// The occupant was not inside the given holder
    NotAttached,
}

impl DetachOutcome {
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached { .. })
    }
}

/// Something observable that happened during a step or structural call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ContainmentEvent {
    Contained {
        holder: EntityId,
        occupant: EntityId,
    },
    /// Occupant moved outward from a contained holder to that holder's holder.
    Reparented {
        from: EntityId,
        to: EntityId,
        occupant: EntityId,
    },
    Released {
        holder: EntityId,
        occupant: EntityId,
        at: Position,
    },
    ProcessingStarted {
        holder: EntityId,
        occupant: EntityId,
    },
    Digested {
        holder: EntityId,
        occupant: EntityId,
        damage: i32,
        progress: i32,
        limit: i32,
    },
    Struggled {
        holder: EntityId,
        occupant: EntityId,
        succeeded: bool,
        progress: i32,
    },
    Escaped {
        holder: EntityId,
        occupant: EntityId,
    },
    Disposed {
        holder: EntityId,
        occupant: EntityId,
        at: Position,
    },
    LootDropped {
        holder: EntityId,
        occupant: EntityId,
        item: String,
        quantity: i32,
        at: Position,
    },
    EffectPlayed {
        source: EntityId,
        cue: EffectCue,
        effect: String,
        at: Position,
    },
    HitEffectPlayed {
        holder: EntityId,
        effect: String,
        at: Position,
    },
    /// A reference to an entity that left the simulation was dropped.
    Pruned {
        entity: EntityId,
    },
}

impl ContainmentEvent {
    /// Short stable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Contained { .. } => "contained",
            Self::Reparented { .. } => "reparented",
            Self::Released { .. } => "released",
            Self::ProcessingStarted { .. } => "processing_started",
            Self::Digested { .. } => "digested",
            Self::Struggled { .. } => "struggled",
            Self::Escaped { .. } => "escaped",
            Self::Disposed { .. } => "disposed",
            Self::LootDropped { .. } => "loot_dropped",
            Self::EffectPlayed { .. } => "effect_played",
            Self::HitEffectPlayed { .. } => "hit_effect_played",
            Self::Pruned { .. } => "pruned",
        }
    }
}
