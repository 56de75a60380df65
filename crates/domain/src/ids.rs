use std::fmt;

use serde::{Deserialize, Serialize};

/// The two entity families the outer world exposes to the core.
///
/// The wire format carries this as a single "is player" flag, so the set is
/// closed at two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Creature,
}

impl EntityKind {
    /// Returns true for the player-like family.
    #[inline]
    pub fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    /// Build a kind from the wire "is player" flag.
    pub fn from_player_flag(is_player: bool) -> Self {
        if is_player {
            Self::Player
        } else {
            Self::Creature
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Creature => write!(f, "creature"),
        }
    }
}

/// Stable, kind-tagged identity of a live entity.
///
/// The outer world owns slot allocation; the index is whatever slot number
/// the player or creature table assigned, so it is only unique per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    kind: EntityKind,
    index: i32,
}

impl EntityId {
    pub fn new(kind: EntityKind, index: i32) -> Self {
        Self { kind, index }
    }

    pub fn player(index: i32) -> Self {
        Self::new(EntityKind::Player, index)
    }

    pub fn creature(index: i32) -> Self {
        Self::new(EntityKind::Creature, index)
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[inline]
    pub fn index(&self) -> i32 {
        self.index
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.kind.is_player()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_with_same_index_but_different_kind_are_distinct() {
        assert_ne!(EntityId::player(3), EntityId::creature(3));
    }

    #[test]
    fn display_includes_kind_and_index() {
        assert_eq!(EntityId::creature(12).to_string(), "creature#12");
        assert_eq!(EntityId::player(0).to_string(), "player#0");
    }

    #[test]
    fn player_flag_round_trips_through_kind() {
        assert_eq!(EntityKind::from_player_flag(true), EntityKind::Player);
        assert_eq!(EntityKind::from_player_flag(false), EntityKind::Creature);
        assert!(EntityId::player(1).is_player());
    }
}
