//! Adapters wrapping concrete world objects in the entity capability view.

pub mod actor;

pub use actor::{Actor, ActorTemplate};
