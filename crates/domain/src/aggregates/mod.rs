//! Aggregate roots
//!
//! Mutations go through methods and return outcome enums from
//! [`crate::events`]; fields stay private so invariants are enforced in one
//! place.

pub mod containment;

pub use containment::{ContainmentGraph, RemovedEdges};
