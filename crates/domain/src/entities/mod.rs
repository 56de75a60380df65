//! Entity capability contract and core-owned per-entity state.

pub mod entity;
pub mod entity_state;

pub use entity::Entity;
pub use entity_state::{
    EntityState, DIGEST_INTERVAL, GRACE_STEPS, REGEN_INTERVAL, STRUGGLE_INTERVAL,
};
