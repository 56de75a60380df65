//! Reference entity adapter.
//!
//! `Actor` is a plain in-memory player or creature. The runner builds its
//! demo population from [`ActorTemplate`]s, and the engine tests use it as the
//! concrete entity behind `dyn Entity`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vessel_domain::{Entity, EntityId, EntityKind, Modifiers, Position, StatusEffect};

/// Serializable description of an actor, used for configured populations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTemplate {
    pub kind: EntityKind,
    pub index: i32,
    pub name: String,
    pub tags: Vec<String>,
    pub life: i32,
    pub mana: i32,
    pub x: f32,
    pub y: f32,
    pub size_factor: f32,
    pub capacity: usize,
    pub escape_limit: i32,
    pub escape_bonus: i32,
    pub struggle_bonus: i32,
    pub opportunistic_chance: f32,
    pub hostile: bool,
    pub modifiers: Modifiers,
}

impl Default for ActorTemplate {
    fn default() -> Self {
        Self {
            kind: EntityKind::Creature,
            index: 0,
            name: "creature".into(),
            tags: Vec::new(),
            life: 100,
            mana: 0,
            x: 0.0,
            y: 0.0,
            size_factor: 1.0,
            capacity: 1,
            escape_limit: 100,
            escape_bonus: 0,
            struggle_bonus: 10,
            opportunistic_chance: 0.0,
            hostile: false,
            modifiers: Modifiers::none(),
        }
    }
}

/// Presentation state saved around containment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedState {
    hidden: bool,
    direction: i32,
}

/// In-memory entity implementing the full capability contract.
#[derive(Debug, Clone)]
pub struct Actor {
    id: EntityId,
    name: String,
    tags: Vec<String>,
    alive: bool,
    local: bool,
    child: bool,
    shows_occupants: bool,
    life: i32,
    life_max: i32,
    mana: i32,
    mana_max: i32,
    position: Position,
    velocity: Position,
    direction: i32,
    hidden: bool,
    saved: Option<SavedState>,
    size_factor: f32,
    capacity: usize,
    escape_limit: i32,
    escape_bonus: i32,
    struggle_bonus: i32,
    opportunistic_chance: f32,
    hostile: bool,
    modifiers: Modifiers,
    statuses: HashMap<StatusEffect, i32>,
    hit_effect: Option<String>,
    inert: bool,
    last_damage_source: Option<EntityId>,
}

impl Actor {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self::from_template(&ActorTemplate {
            kind: id.kind(),
            index: id.index(),
            name: name.into(),
            ..ActorTemplate::default()
        })
    }

    pub fn player(index: i32, name: impl Into<String>) -> Self {
        Self::new(EntityId::player(index), name)
    }

    pub fn creature(index: i32, name: impl Into<String>) -> Self {
        Self::new(EntityId::creature(index), name)
    }

    pub fn from_template(template: &ActorTemplate) -> Self {
        Self {
            id: EntityId::new(template.kind, template.index),
            name: template.name.clone(),
            tags: template.tags.clone(),
            alive: true,
            local: false,
            child: false,
            shows_occupants: false,
            life: template.life,
            life_max: template.life,
            mana: template.mana,
            mana_max: template.mana,
            position: Position::new(template.x, template.y),
            velocity: Position::ZERO,
            direction: 1,
            hidden: false,
            saved: None,
            size_factor: template.size_factor,
            capacity: template.capacity,
            escape_limit: template.escape_limit,
            escape_bonus: template.escape_bonus,
            struggle_bonus: template.struggle_bonus,
            opportunistic_chance: template.opportunistic_chance,
            hostile: template.hostile,
            modifiers: template.modifiers,
            statuses: HashMap::new(),
            hit_effect: None,
            inert: false,
            last_damage_source: None,
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self.life_max = life;
        self
    }

    pub fn with_life_max(mut self, life_max: i32) -> Self {
        self.life_max = life_max;
        self
    }

    pub fn with_mana(mut self, mana: i32, mana_max: i32) -> Self {
        self.mana = mana;
        self.mana_max = mana_max;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_direction(mut self, direction: i32) -> Self {
        self.direction = if direction < 0 { -1 } else { 1 };
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_escape_limit(mut self, escape_limit: i32) -> Self {
        self.escape_limit = escape_limit;
        self
    }

    pub fn with_escape_bonus(mut self, escape_bonus: i32) -> Self {
        self.escape_bonus = escape_bonus;
        self
    }

    pub fn with_struggle_bonus(mut self, struggle_bonus: i32) -> Self {
        self.struggle_bonus = struggle_bonus;
        self
    }

    pub fn with_size_factor(mut self, size_factor: f32) -> Self {
        self.size_factor = size_factor;
        self
    }

    pub fn with_opportunistic_chance(mut self, chance: f32) -> Self {
        self.opportunistic_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn hostile(mut self) -> Self {
        self.hostile = true;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn as_child(mut self) -> Self {
        self.child = true;
        self
    }

    pub fn locally_controlled(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn showing_occupants(mut self) -> Self {
        self.shows_occupants = true;
        self
    }

    pub fn with_hit_effect(mut self, effect: impl Into<String>) -> Self {
        self.hit_effect = Some(effect.into());
        self
    }

    pub fn with_status(mut self, status: StatusEffect, duration: i32) -> Self {
        self.apply_status(status, duration);
        self
    }

    // =========================================================================
    // Adapter-only reads
    // =========================================================================

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    #[inline]
    pub fn velocity(&self) -> Position {
        self.velocity
    }

    #[inline]
    pub fn last_damage_source(&self) -> Option<EntityId> {
        self.last_damage_source
    }

    pub fn status_duration(&self, status: StatusEffect) -> i32 {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    /// Mark the actor as gone from the world without going through damage.
    pub fn despawn(&mut self) {
        self.alive = false;
    }
}

impl Entity for Actor {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn is_valid(&self) -> bool {
        self.alive
    }

    fn is_locally_controlled(&self) -> bool {
        self.local
    }

    fn life(&self) -> i32 {
        self.life
    }

    fn set_life(&mut self, life: i32) {
        self.life = life.min(self.life_max);
    }

    fn life_max(&self) -> i32 {
        self.life_max
    }

    fn mana(&self) -> i32 {
        self.mana
    }

    fn set_mana(&mut self, mana: i32) {
        self.mana = mana.clamp(0, self.mana_max.max(0));
    }

    fn mana_max(&self) -> i32 {
        self.mana_max
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn direction(&self) -> i32 {
        self.direction
    }

    fn is_hostile_to(&self, other: &dyn Entity) -> bool {
        self.hostile && other.id() != self.id
    }

    fn is_child(&self) -> bool {
        self.child
    }

    fn shows_occupants(&self) -> bool {
        self.shows_occupants
    }

    fn size_factor(&self) -> f32 {
        self.size_factor
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn escape_limit(&self, _occupant: &dyn Entity) -> i32 {
        self.escape_limit
    }

    fn escape_bonus(&self, _occupant: &dyn Entity) -> i32 {
        self.escape_bonus
    }

    fn struggle_bonus(&self, _holder: &dyn Entity) -> i32 {
        self.struggle_bonus
    }

    fn opportunistic_chance(&self, _holder: &dyn Entity) -> f32 {
        self.opportunistic_chance
    }

    fn base_modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn backup_state(&mut self) {
        self.saved = Some(SavedState {
            hidden: self.hidden,
            direction: self.direction,
        });
    }

    fn restore_state(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.hidden = saved.hidden;
            self.direction = saved.direction;
        }
    }

    fn set_state_contained(&mut self) {
        self.hidden = true;
        self.velocity = Position::ZERO;
    }

    fn damage(&mut self, source: EntityId, amount: i32, knockback: f32) {
        self.last_damage_source = Some(source);
        self.life = (self.life - amount.max(0)).max(0);
        if knockback > 0.0 {
            self.velocity.x = -knockback * self.direction as f32;
        }
        if self.life == 0 {
            self.alive = false;
        }
    }

    fn knockback(&mut self, impulse: Position) {
        self.velocity = impulse;
    }

    fn heal(&mut self, amount: i32) {
        if amount > 0 {
            self.life = (self.life + amount).min(self.life_max);
        }
    }

    fn kill(&mut self, inert: bool) {
        self.life = 0;
        self.alive = false;
        self.inert = inert;
    }

    fn apply_status(&mut self, status: StatusEffect, duration: i32) {
        if duration <= 0 {
            return;
        }
        let entry = self.statuses.entry(status).or_insert(0);
        *entry = (*entry).max(duration);
    }

    fn has_status(&self, status: StatusEffect) -> bool {
        self.status_duration(status) > 0
    }

    fn hit_effect(&self) -> Option<String> {
        self.hit_effect.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_builds_matching_actor() {
        let template = ActorTemplate {
            kind: EntityKind::Player,
            index: 2,
            name: "Ava".into(),
            life: 250,
            capacity: 3,
            hostile: true,
            ..ActorTemplate::default()
        };
        let actor = Actor::from_template(&template);
        assert_eq!(actor.id(), EntityId::player(2));
        assert_eq!(actor.life_max(), 250);
        assert_eq!(actor.capacity(), 3);
        assert!(actor.is_valid());
    }

    #[test]
    fn finishing_blow_kills_through_damage() {
        let mut actor = Actor::creature(1, "slime").with_life(40);
        actor.set_life(1);
        actor.damage(EntityId::player(0), 1, 0.0);
        assert_eq!(actor.life(), 0);
        assert!(!actor.is_valid());
        assert_eq!(actor.last_damage_source(), Some(EntityId::player(0)));
        assert!(!actor.is_inert());
    }

    #[test]
    fn kill_can_mark_inert() {
        let mut actor = Actor::creature(1, "slime");
        actor.kill(true);
        assert!(actor.is_inert());
        assert!(!actor.is_valid());
    }

    #[test]
    fn state_round_trips_around_containment() {
        let mut actor = Actor::player(0, "Ava").with_direction(-1);
        actor.backup_state();
        actor.set_state_contained();
        assert!(actor.is_hidden());
        actor.restore_state();
        assert!(!actor.is_hidden());
        assert_eq!(actor.direction(), -1);
    }

    #[test]
    fn statuses_keep_longest_duration() {
        let mut actor = Actor::player(0, "Ava");
        actor.apply_status(StatusEffect::Slowed, 300);
        actor.apply_status(StatusEffect::Slowed, 120);
        assert_eq!(actor.status_duration(StatusEffect::Slowed), 300);
        assert!(!actor.has_status(StatusEffect::Satiated));
    }

    #[test]
    fn hostility_never_targets_self() {
        let wolf = Actor::creature(1, "wolf").hostile();
        let twin = Actor::creature(1, "wolf");
        let rabbit = Actor::creature(2, "rabbit");
        assert!(wolf.is_hostile_to(&rabbit));
        assert!(!wolf.is_hostile_to(&twin));
        assert!(!rabbit.is_hostile_to(&wolf));
    }

    #[test]
    fn template_deserializes_with_defaults() {
        let template: ActorTemplate =
            serde_json::from_str(r#"{ "kind": "player", "index": 0, "modifiers": { "caustic": 2 } }"#)
                .expect("valid template");
        assert_eq!(template.kind, EntityKind::Player);
        assert_eq!(template.capacity, 1);
        assert_eq!(template.modifiers.caustic(), 2);
    }
}
