//! Domain Events
//!
//! Return types from graph mutations and the coarse-grained events the
//! simulation records for callers (presentation, logging, replication).

pub mod containment_events;

pub use containment_events::*;
