//! Policy matchers - configurable per-entity predicate rules.

use serde::{Deserialize, Serialize};

use crate::EntityKind;

/// Decides whether an entity participates in one kind of containment action.
///
/// An entity matches when its kind is allowed, it carries every tag in
/// `require_tags`, and it carries none of the tags in `exclude_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyMatcher {
    pub players: bool,
    pub creatures: bool,
    pub require_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
}

impl PolicyMatcher {
    /// Matches every entity.
    pub fn everyone() -> Self {
        Self {
            players: true,
            creatures: true,
            require_tags: Vec::new(),
            exclude_tags: Vec::new(),
        }
    }

    /// Matches nothing.
    pub fn nobody() -> Self {
        Self {
            players: false,
            creatures: false,
            ..Self::everyone()
        }
    }

    pub fn creatures_only() -> Self {
        Self {
            players: false,
            ..Self::everyone()
        }
    }

    pub fn requiring(mut self, tag: impl Into<String>) -> Self {
        self.require_tags.push(tag.into());
        self
    }

    pub fn excluding(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    pub fn matches(&self, kind: EntityKind, tags: &[String]) -> bool {
        let kind_allowed = match kind {
            EntityKind::Player => self.players,
            EntityKind::Creature => self.creatures,
        };
        kind_allowed
            && self.require_tags.iter().all(|t| tags.contains(t))
            && !self.exclude_tags.iter().any(|t| tags.contains(t))
    }
}

impl Default for PolicyMatcher {
    fn default() -> Self {
        Self::everyone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn everyone_matches_both_kinds() {
        let m = PolicyMatcher::everyone();
        assert!(m.matches(EntityKind::Player, &[]));
        assert!(m.matches(EntityKind::Creature, &[]));
    }

    #[test]
    fn kind_filter_applies() {
        let m = PolicyMatcher::creatures_only();
        assert!(!m.matches(EntityKind::Player, &[]));
        assert!(m.matches(EntityKind::Creature, &[]));
    }

    #[test]
    fn required_and_excluded_tags() {
        let m = PolicyMatcher::everyone().requiring("large").excluding("boss");
        assert!(m.matches(EntityKind::Creature, &tags(&["large"])));
        assert!(!m.matches(EntityKind::Creature, &tags(&["small"])));
        assert!(!m.matches(EntityKind::Creature, &tags(&["large", "boss"])));
    }

    #[test]
    fn missing_fields_default_to_permissive() {
        let m: PolicyMatcher =
            serde_json::from_str(r#"{"players": false}"#).expect("valid json");
        assert!(!m.players);
        assert!(m.creatures);
    }
}
